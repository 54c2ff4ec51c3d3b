//! Command-line interface

use clap::{Parser, Subcommand};

/// Telegram bot that downloads videos and playlists via yt-dlp
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bot (default when no subcommand is given)
    Run,
    /// Print the configured yt-dlp version and exit
    CheckYtdlp,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
