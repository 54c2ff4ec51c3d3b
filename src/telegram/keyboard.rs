//! Inline keyboard for format selection
//!
//! Fixed three-row layout; the callback data tokens are exactly the closed
//! format set the resolver accepts.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

fn cb(label: &str, token: &str) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.to_string(), token.to_string())
}

/// Builds the format-selection keyboard sent after every link preview.
pub fn format_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![cb("🎞 144p", "144p"), cb("📼 360p", "360p")],
        vec![cb("📺 480p", "480p"), cb("🎥 720p", "720p")],
        vec![cb("🎬 1080p", "1080p"), cb("🎵 MP3 (Audio Only)", "audio-only")],
    ])
}
