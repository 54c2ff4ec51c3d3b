//! Media metadata probing via yt-dlp
//!
//! Runs yt-dlp in metadata-only mode (`-j`, one JSON object per line on
//! stdout) and extracts the fields the bot shows: title, duration, channel,
//! thumbnail, and the size estimate for a given selector.
//!
//! Probe failures never abort a session: `preview` and `estimate_size`
//! always return displayable text, logging the real cause for operators.

use serde::Deserialize;
use tokio::process::Command;

use crate::core::config;
use crate::core::process::run_with_timeout;

/// Fixed fallback shown when the preview probe fails for any reason.
pub const PREVIEW_FALLBACK: &str = "⚠️ Couldn't fetch preview info";

/// Fallback shown when neither size field is present in the metadata.
pub const SIZE_UNAVAILABLE: &str = "⚠️ Size info not available";

/// Typed view of the fields consumed from a yt-dlp `-j` output line.
/// Everything is optional; defaults are applied at render time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub title: Option<String>,
    /// Duration in seconds. yt-dlp emits floats for some extractors.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub filesize: Option<f64>,
    #[serde(default)]
    pub filesize_approx: Option<f64>,
}

/// Ephemeral preview passed straight to the transport layer.
#[derive(Debug, Clone)]
pub struct MediaPreview {
    /// Markdown caption with title, duration, and channel.
    pub text: String,
    /// Thumbnail URL when the extractor provided one.
    pub thumbnail: Option<String>,
}

impl MediaPreview {
    fn fallback() -> Self {
        Self {
            text: PREVIEW_FALLBACK.to_string(),
            thumbnail: None,
        }
    }
}

/// Formats whole seconds as `H:MM:SS`.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parses the first JSON object line out of yt-dlp stdout.
///
/// Playlist probes emit one line per item; the preview only needs the
/// first one.
pub fn parse_info(stdout: &str) -> Result<MediaInfo, serde_json::Error> {
    let line = stdout.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    serde_json::from_str(line)
}

/// Renders the preview caption with the documented defaults for absent
/// fields: "N/A" title, zero duration, "Unknown Channel".
pub fn render_preview(info: &MediaInfo) -> MediaPreview {
    let title = info.title.as_deref().unwrap_or("N/A");
    let duration = format_duration(info.duration.unwrap_or(0.0) as u64);
    let channel = info.channel.as_deref().unwrap_or("Unknown Channel");

    MediaPreview {
        text: format!(
            "🎬 *Title:* {}\n⏱ *Duration:* {}\n📺 *Channel:* {}",
            title, duration, channel
        ),
        thumbnail: info.thumbnail.clone(),
    }
}

/// Renders the size estimate line: `filesize` preferred, `filesize_approx`
/// as fallback, bytes converted to MB rounded to 2 decimals.
pub fn render_size(info: &MediaInfo) -> String {
    match info.filesize.or(info.filesize_approx) {
        Some(bytes) => {
            let size_mb = bytes / (1024.0 * 1024.0);
            format!("💾 Estimated Size: {:.2} MB", size_mb)
        }
        None => SIZE_UNAVAILABLE.to_string(),
    }
}

/// Probes the URL without downloading and builds the preview.
///
/// Never fails: any process, timeout, or parse problem yields the fixed
/// fallback text with no thumbnail.
pub async fn preview(url: &str) -> MediaPreview {
    let ytdl_bin = &*config::YTDL_BIN;

    let output = match run_with_timeout(
        Command::new(ytdl_bin).args(["-j", url]),
        config::download::metadata_timeout(),
    )
    .await
    {
        Ok(output) => output,
        Err(e) => {
            log::warn!("Preview probe failed for {}: {}", url, e);
            return MediaPreview::fallback();
        }
    };

    if !output.status.success() {
        log::warn!(
            "Preview probe exited non-zero for {}: {}",
            url,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return MediaPreview::fallback();
    }

    match parse_info(&String::from_utf8_lossy(&output.stdout)) {
        Ok(info) => render_preview(&info),
        Err(e) => {
            log::warn!("Preview output unparseable for {}: {}", url, e);
            MediaPreview::fallback()
        }
    }
}

/// Probes the URL constrained to a selector and reports the estimated size.
///
/// Never fails: process errors become a descriptive message, absent size
/// fields become the unavailable fallback. The download proceeds either way.
pub async fn estimate_size(url: &str, selector: &str) -> String {
    let ytdl_bin = &*config::YTDL_BIN;

    let output = match run_with_timeout(
        Command::new(ytdl_bin).args(["-f", selector, "-j", url]),
        config::download::metadata_timeout(),
    )
    .await
    {
        Ok(output) => output,
        Err(e) => {
            log::warn!("Size probe failed for {}: {}", url, e);
            return format!("❌ Error fetching info: {}", e);
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::warn!("Size probe exited non-zero for {}: {}", url, stderr.trim());
        return format!(
            "❌ Error fetching info: {}",
            crate::download::error::summarize_stderr(&stderr)
        );
    }

    match parse_info(&String::from_utf8_lossy(&output.stdout)) {
        Ok(info) => render_size(&info),
        Err(e) => {
            log::warn!("Size probe output unparseable for {}: {}", url, e);
            format!("❌ Error fetching info: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "0:00:00");
        assert_eq!(format_duration(59), "0:00:59");
        assert_eq!(format_duration(61), "0:01:01");
        assert_eq!(format_duration(3661), "1:01:01");
        assert_eq!(format_duration(7325), "2:02:05");
    }

    #[test]
    fn preview_renders_all_fields() {
        let info: MediaInfo = serde_json::from_str(
            r#"{"title":"Some Video","duration":125,"channel":"Some Channel","thumbnail":"https://i.example/t.jpg"}"#,
        )
        .unwrap();
        let preview = render_preview(&info);
        assert_eq!(
            preview.text,
            "🎬 *Title:* Some Video\n⏱ *Duration:* 0:02:05\n📺 *Channel:* Some Channel"
        );
        assert_eq!(preview.thumbnail.as_deref(), Some("https://i.example/t.jpg"));
    }

    #[test]
    fn preview_applies_defaults_for_absent_fields() {
        let info = parse_info("{}").unwrap();
        let preview = render_preview(&info);
        assert_eq!(
            preview.text,
            "🎬 *Title:* N/A\n⏱ *Duration:* 0:00:00\n📺 *Channel:* Unknown Channel"
        );
        assert!(preview.thumbnail.is_none());
    }

    #[test]
    fn parse_takes_first_nonempty_line() {
        let stdout = "\n{\"title\":\"first\"}\n{\"title\":\"second\"}\n";
        let info = parse_info(stdout).unwrap();
        assert_eq!(info.title.as_deref(), Some("first"));
    }

    #[test]
    fn malformed_output_is_a_parse_error() {
        assert!(parse_info("not json at all").is_err());
        assert!(parse_info("").is_err());
    }

    #[test]
    fn size_prefers_exact_filesize() {
        let info: MediaInfo =
            serde_json::from_str(r#"{"filesize":10485760,"filesize_approx":99999999}"#).unwrap();
        assert_eq!(render_size(&info), "💾 Estimated Size: 10.00 MB");
    }

    #[test]
    fn size_falls_back_to_approx() {
        let info: MediaInfo = serde_json::from_str(r#"{"filesize_approx":5242880}"#).unwrap();
        assert_eq!(render_size(&info), "💾 Estimated Size: 5.00 MB");
    }

    #[test]
    fn size_unavailable_when_both_fields_absent() {
        let info = parse_info(r#"{"title":"x"}"#).unwrap();
        assert_eq!(render_size(&info), SIZE_UNAVAILABLE);
    }
}
