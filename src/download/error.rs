//! Download-scoped error taxonomy
//!
//! Every variant here is recoverable at the session level: it becomes a chat
//! message to the user and the session returns to idle. Nothing in this
//! enum may take the process down or leak into another user's session.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    /// The user pressed a format button but no URL is stored for them.
    #[error("link expired, please send the URL again")]
    ExpiredSession,

    /// Callback token outside the closed format set. Should not happen with
    /// the fixed keyboard; fatal to the request only, not the process.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// yt-dlp exited non-zero; carries its diagnostic output.
    #[error("yt-dlp failed: {0}")]
    Execution(String),

    /// The external process exceeded its bounded timeout (single attempt,
    /// no retry).
    #[error("download timed out after {0}s")]
    Timeout(u64),

    /// A download finished successfully but wrote no files.
    #[error("download produced no output files")]
    NoOutput,
}

/// Picks a single user-presentable line out of yt-dlp's stderr.
///
/// yt-dlp prefixes real failures with "ERROR:"; prefer the last such line,
/// otherwise fall back to the last non-empty line. The full output still
/// goes to the operator log.
pub fn summarize_stderr(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summarize_prefers_error_lines() {
        let stderr = "[youtube] Extracting URL\nWARNING: something minor\nERROR: Video unavailable\n";
        assert_eq!(summarize_stderr(stderr), "ERROR: Video unavailable");
    }

    #[test]
    fn summarize_falls_back_to_last_line() {
        let stderr = "some diagnostic\nlast line here\n";
        assert_eq!(summarize_stderr(stderr), "last line here");
    }

    #[test]
    fn summarize_empty_output() {
        assert_eq!(summarize_stderr(""), "unknown error");
    }
}
