//! vidgrab - Telegram bot for downloading videos and playlists via yt-dlp
//!
//! This library provides the core functionality for the bot: per-user link
//! and counter state, format resolution, yt-dlp metadata probing and
//! download execution, delivery packaging, and the Telegram handler tree.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, process execution, per-user state
//! - `download`: format resolution, metadata probing, fetch, delivery
//! - `telegram`: bot integration and handlers

pub mod cli;
pub mod core;
pub mod download;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{AppError, DownloadCounter, LinkRegistry};
pub use crate::download::DownloadError;
pub use crate::telegram::{create_bot, schema, HandlerDeps};
