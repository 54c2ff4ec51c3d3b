use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;

use vidgrab::cli::{Cli, Commands};
use vidgrab::core::config;
use vidgrab::download::ytdlp;
use vidgrab::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (bot creation, download root).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env if present, before config is read
    let _ = dotenv();

    pretty_env_logger::init();

    let cli = Cli::parse_args();
    match cli.command {
        Some(Commands::CheckYtdlp) => {
            let version = ytdlp::ytdlp_version().await?;
            println!("yt-dlp version: {}", version);
            Ok(())
        }
        Some(Commands::Run) | None => run_bot().await,
    }
}

/// Run the Telegram bot in long-polling mode.
async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    // The download root must exist before the first job directory is made
    fs_err::create_dir_all(&*config::DOWNLOAD_DIR)?;
    log::info!("Download root: {}", &*config::DOWNLOAD_DIR);

    // Probe the external tool; misconfiguration is an operator problem,
    // not a startup failure
    ytdlp::check_ytdlp().await;

    let bot = create_bot()?;
    setup_bot_commands(&bot).await?;

    let handler = schema(HandlerDeps::new());

    log::info!("Starting bot in long polling mode");

    let listener = teloxide::update_listeners::Polling::builder(bot.clone())
        .drop_pending_updates()
        .build();

    Dispatcher::builder(bot, handler)
        .dependencies(DependencyMap::new())
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
