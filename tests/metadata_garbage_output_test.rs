//! Media inspector behavior on malformed tool output
//!
//! When the external tool exits successfully but its stdout is not the
//! expected JSON object line, the preview still falls back to the fixed
//! text with no thumbnail and the size estimate reports the parse problem.
//! `echo` stands in for yt-dlp here: it echoes the arguments back, which
//! is exactly the kind of garbage a broken extractor produces. This test
//! binary gets its own process, so setting YTDL_BIN before the config
//! lazy is first read is safe.
//!
//! Run with: cargo test --test metadata_garbage_output_test

use pretty_assertions::assert_eq;

use vidgrab::download::metadata::{estimate_size, preview, PREVIEW_FALLBACK};

#[tokio::test]
async fn garbage_tool_output_yields_fallbacks_not_panics() {
    // Single test in this binary: nothing has read YTDL_BIN yet.
    std::env::set_var("YTDL_BIN", "echo");

    let media_preview = preview("https://youtube.com/watch?v=ABC").await;
    assert_eq!(media_preview.text, PREVIEW_FALLBACK);
    assert!(media_preview.thumbnail.is_none());

    let size = estimate_size(
        "https://youtube.com/watch?v=ABC",
        "bestvideo[height<=720]+bestaudio/best",
    )
    .await;
    assert!(
        size.starts_with("❌ Error fetching info:"),
        "unexpected size message: {}",
        size
    );
}
