//! Format token to yt-dlp selector resolution
//!
//! The button set is closed and fixed at process start: five resolution
//! tokens plus audio-only. Playlists get special treatment: per-item
//! resolution filters on playlists produced inconsistent downloads, so any
//! non-audio token on a playlist resolves to the generic best-effort
//! selector instead.

use crate::download::error::DownloadError;

/// Generic best-effort selector used for every non-audio playlist download.
pub const PLAYLIST_BEST: &str = "bestvideo+bestaudio/best";

/// The closed set of format tokens, exactly as they appear in the keyboard
/// callback data.
pub const FORMAT_TOKENS: [&str; 6] = ["144p", "360p", "480p", "720p", "1080p", "audio-only"];

/// A user-selectable download format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    P144,
    P360,
    P480,
    P720,
    P1080,
    AudioOnly,
}

impl Format {
    /// Parses a callback token into a format, rejecting anything outside
    /// the closed set.
    pub fn from_token(token: &str) -> Result<Self, DownloadError> {
        match token {
            "144p" => Ok(Self::P144),
            "360p" => Ok(Self::P360),
            "480p" => Ok(Self::P480),
            "720p" => Ok(Self::P720),
            "1080p" => Ok(Self::P1080),
            "audio-only" => Ok(Self::AudioOnly),
            other => Err(DownloadError::UnknownFormat(other.to_string())),
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::P144 => "144p",
            Self::P360 => "360p",
            Self::P480 => "480p",
            Self::P720 => "720p",
            Self::P1080 => "1080p",
            Self::AudioOnly => "audio-only",
        }
    }

    /// The resolution-bounded yt-dlp selector for this format.
    pub fn selector(self) -> &'static str {
        match self {
            Self::P144 => "bestvideo[height<=144]+bestaudio/best",
            Self::P360 => "bestvideo[height<=360]+bestaudio/best",
            Self::P480 => "bestvideo[height<=480]+bestaudio/best",
            Self::P720 => "bestvideo[height<=720]+bestaudio/best",
            Self::P1080 => "bestvideo[height<=1080]+bestaudio/best",
            // Audio downloads use -x --audio-format mp3 rather than -f,
            // the selector is only used for the size estimate.
            Self::AudioOnly => "mp3",
        }
    }

    pub fn is_audio(self) -> bool {
        matches!(self, Self::AudioOnly)
    }
}

/// True when the URL carries the playlist query marker.
///
/// A `watch?v=..&list=..` link is not a playlist here: canonicalization
/// truncates it at the first `&` before this check runs.
pub fn is_playlist_url(url: &str) -> bool {
    url.contains("playlist?list=")
}

/// Resolves the final selector expression, applying the playlist override:
/// playlists always get best-effort quality except for the explicit audio
/// path, which stays format-specific.
pub fn resolve_selector(format: Format, is_playlist: bool) -> &'static str {
    if is_playlist && !format.is_audio() {
        PLAYLIST_BEST
    } else {
        format.selector()
    }
}
