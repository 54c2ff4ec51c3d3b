use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Root folder for downloaded files
/// Read from DOWNLOAD_DIR environment variable, defaults to "./downloads".
/// Each download job gets its own subdirectory underneath (see `download::fetch::JobDir`),
/// so concurrent users never see each other's files.
pub static DOWNLOAD_DIR: Lazy<String> =
    Lazy::new(|| env::var("DOWNLOAD_DIR").unwrap_or_else(|_| "./downloads".to_string()));

/// External process configuration
pub mod download {
    use super::Duration;

    /// Timeout for metadata-only yt-dlp calls (preview, size estimate)
    pub const METADATA_TIMEOUT_SECS: u64 = 30;

    /// Timeout for the actual download. Playlists can be big; a hung
    /// yt-dlp must still be reaped eventually (single attempt, no retry).
    pub const FETCH_TIMEOUT_SECS: u64 = 30 * 60;

    /// Metadata call timeout duration
    pub fn metadata_timeout() -> Duration {
        Duration::from_secs(METADATA_TIMEOUT_SECS)
    }

    /// Download timeout duration
    pub fn fetch_timeout() -> Duration {
        Duration::from_secs(FETCH_TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Telegram API requests (in seconds)
    /// Generous because document uploads of large media files go through it.
    pub const REQUEST_TIMEOUT_SECS: u64 = 900; // 15 minutes

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Delivery configuration
pub mod delivery {
    /// Above this many output files, everything is packed into one zip
    /// instead of being sent file by file.
    pub const ARCHIVE_THRESHOLD: usize = 3;

    /// Name of the archive created inside the job directory.
    pub const ARCHIVE_NAME: &str = "all_files.zip";
}
