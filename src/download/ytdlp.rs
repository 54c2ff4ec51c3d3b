//! yt-dlp binary probing
//!
//! Startup check that the configured external tool is actually runnable,
//! so a misconfigured YTDL_BIN shows up in the log at boot instead of on
//! the first user's download.

use tokio::process::Command;
use tokio::time::timeout;

use crate::core::config;
use crate::core::error::AppError;

/// Probes `<YTDL_BIN> --version` and returns the reported version string.
pub async fn ytdlp_version() -> Result<String, AppError> {
    let ytdl_bin = &*config::YTDL_BIN;

    let output = timeout(
        std::time::Duration::from_secs(10),
        Command::new(ytdl_bin).arg("--version").output(),
    )
    .await
    .map_err(|_| AppError::Download("yt-dlp --version timed out".to_string()))?
    .map_err(|e| AppError::Download(format!("failed to run {}: {}", ytdl_bin, e)))?;

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if version.is_empty() {
        return Err(AppError::Download(
            "yt-dlp is not installed or --version produced no output".to_string(),
        ));
    }

    Ok(version)
}

/// Logs the yt-dlp version at startup. Non-fatal: the bot still starts so
/// the operator can fix the binary without losing the Telegram session.
pub async fn check_ytdlp() {
    match ytdlp_version().await {
        Ok(version) => log::info!("yt-dlp version: {}", version),
        Err(e) => log::warn!("yt-dlp check failed: {}. Downloads will fail until this is fixed.", e),
    }
}
