//! Download execution
//!
//! Invokes yt-dlp to fetch media into a per-job working directory. Each job
//! gets a fresh unique subdirectory under the configured download root, so
//! concurrent users can never have their files swept into each other's
//! delivery batch.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::process::Command;

use crate::core::config;
use crate::core::process::{run_with_timeout, ProcessError};
use crate::download::error::{summarize_stderr, DownloadError};

static JOB_SEQ: AtomicU64 = AtomicU64::new(0);

/// A per-download working directory.
///
/// Created empty before the fetch, removed wholesale after delivery
/// (including any files a partial failure left behind).
#[derive(Debug)]
pub struct JobDir {
    path: PathBuf,
}

impl JobDir {
    /// Creates a fresh unique subdirectory under the configured download root.
    pub async fn create() -> Result<Self, std::io::Error> {
        Self::create_under(Path::new(&*config::DOWNLOAD_DIR)).await
    }

    /// Creates a fresh unique subdirectory under an explicit root.
    pub async fn create_under(root: &Path) -> Result<Self, std::io::Error> {
        let seq = JOB_SEQ.fetch_add(1, Ordering::Relaxed);
        let path = root.join(format!("job-{}-{}", std::process::id(), seq));
        fs_err::tokio::create_dir_all(&path).await?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the directory and everything left in it. Failures are logged,
    /// not propagated: cleanup problems must not mask the download result.
    pub async fn cleanup(self) {
        if let Err(e) = fs_err::tokio::remove_dir_all(&self.path).await {
            log::warn!("Failed to clean up job dir {}: {}", self.path.display(), e);
        }
    }
}

/// Runs yt-dlp to fetch the media into `dir`.
///
/// Command shape:
/// `yt-dlp -o <dir>/%(title)s.%(ext)s [-f <selector> | -x --audio-format mp3] --yes-playlist <url>`
///
/// `--yes-playlist` makes multi-item URLs expand into multiple output files
/// instead of failing. Audio-only downloads force mp3 extraction and ignore
/// the selector. Single attempt; a non-zero exit carries yt-dlp's
/// diagnostic output, a timeout is reported as its own error kind.
pub async fn fetch(url: &str, selector: &str, audio_only: bool, dir: &Path) -> Result<(), DownloadError> {
    let ytdl_bin = &*config::YTDL_BIN;
    let template = dir.join("%(title)s.%(ext)s");

    let mut cmd = Command::new(ytdl_bin);
    cmd.arg("-o").arg(&template);
    if audio_only {
        cmd.args(["-x", "--audio-format", "mp3"]);
    } else {
        cmd.args(["-f", selector]);
    }
    cmd.arg("--yes-playlist").arg(url);

    log::info!(
        "Starting yt-dlp fetch (url={}, selector={}, audio_only={}, dir={})",
        url,
        selector,
        audio_only,
        dir.display()
    );

    let output = run_with_timeout(&mut cmd, config::download::fetch_timeout())
        .await
        .map_err(|e| match e {
            ProcessError::Timeout(secs) => DownloadError::Timeout(secs),
            ProcessError::Io(io) => DownloadError::Execution(format!("failed to run {}: {}", ytdl_bin, io)),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::error!(
            "yt-dlp exited with {:?} for {}: {}",
            output.status.code(),
            url,
            stderr.trim()
        );
        return Err(DownloadError::Execution(summarize_stderr(&stderr)));
    }

    log::info!("yt-dlp fetch finished for {}", url);
    Ok(())
}
