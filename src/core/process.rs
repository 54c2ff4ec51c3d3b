//! Process execution utilities with timeout support
//!
//! Provides a helper for running external processes (yt-dlp) with a bounded
//! timeout so a hung process can never block a user's session indefinitely.

use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Errors from running an external process.
///
/// Timeout is its own kind (not folded into a generic message) so callers
/// can report it distinctly to the user.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to run process: {0}")]
    Io(#[from] std::io::Error),

    #[error("process timed out after {0}s")]
    Timeout(u64),
}

/// Run an async Command with a timeout.
///
/// Returns the process Output on success, or a ProcessError on timeout/IO failure.
/// The command is killed on timeout (`kill_on_drop` on the spawned child).
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<Output, ProcessError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(ProcessError::Io(e)),
        Err(_) => Err(ProcessError::Timeout(timeout.as_secs())),
    }
}
