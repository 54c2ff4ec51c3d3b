//! Telegram handler tree and session flow
//!
//! Wires the download pipeline to incoming updates: a text message stores
//! the link and shows a preview with the format keyboard; a button press
//! resolves the format, reports the size estimate, and runs
//! fetch → deliver → tally on its own task so other users' updates keep
//! flowing while yt-dlp works.
//!
//! No error from a single user's session may escape a handler: every
//! failure becomes a chat message and the session falls back to idle.

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};

use crate::core::links::LinkRegistry;
use crate::core::stats::DownloadCounter;
use crate::download::error::DownloadError;
use crate::download::fetch::JobDir;
use crate::download::format::{is_playlist_url, resolve_selector, Format};
use crate::download::{deliver, estimate_size, fetch, preview};
use crate::telegram::bot::Command;
use crate::telegram::keyboard::format_keyboard;
use crate::telegram::Bot;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Shared state the handlers need: the pending-link map and the per-user
/// download tally.
#[derive(Clone)]
pub struct HandlerDeps {
    pub links: Arc<LinkRegistry>,
    pub counter: Arc<DownloadCounter>,
}

impl HandlerDeps {
    pub fn new() -> Self {
        Self {
            links: Arc::new(LinkRegistry::new()),
            counter: Arc::new(DownloadCounter::new()),
        }
    }
}

impl Default for HandlerDeps {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates the dispatcher handler tree.
///
/// The same schema is used in production and in integration tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler())
        .branch(message_handler(deps_messages))
        .branch(callback_handler(deps_callback))
}

/// Handler for `/start`.
fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(|bot: Bot, msg: Message, cmd: Command| async move {
            match cmd {
                Command::Start => {
                    bot.send_message(msg.chat.id, "👋 Send me a YouTube link (video or playlist)!")
                        .await?;
                }
            }
            Ok(())
        })
}

/// Handler for plain text messages: treats the text as a media link.
///
/// Stores the canonical link (overwriting any previous one for this user),
/// sends the preview (as a photo with caption when a thumbnail is
/// available), and offers the format keyboard.
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        // Commands are handled by their own branch; everything else that
        // has text is treated as a link submission.
        .filter(|msg: Message| msg.text().is_some_and(|t| !t.starts_with('/')))
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let Some(text) = msg.text() else {
                    return Ok(());
                };
                let chat_id = msg.chat.id;
                let link = deps.links.submit(chat_id, text);
                log::info!("Chat {} submitted link {}", chat_id, link);

                let media_preview = preview(&link).await;
                send_preview(&bot, chat_id, &media_preview.text, media_preview.thumbnail.as_deref()).await?;

                bot.send_message(chat_id, "Choose format to download:")
                    .reply_markup(format_keyboard())
                    .await?;
                Ok(())
            }
        })
}

/// Sends the preview as photo-with-caption when a thumbnail URL parses,
/// falling back to plain text otherwise.
async fn send_preview(bot: &Bot, chat_id: ChatId, text: &str, thumbnail: Option<&str>) -> ResponseResult<()> {
    if let Some(thumb_url) = thumbnail.and_then(|t| url::Url::parse(t).ok()) {
        let sent = bot
            .send_photo(chat_id, teloxide::types::InputFile::url(thumb_url))
            .caption(text)
            .parse_mode(ParseMode::Markdown)
            .await;
        if sent.is_ok() {
            return Ok(());
        }
        // Bad thumbnail must not cost the user their preview.
        log::warn!("Failed to send preview photo to chat {}, falling back to text", chat_id);
    }

    bot.send_message(chat_id, text).parse_mode(ParseMode::Markdown).await?;
    Ok(())
}

/// Handler for format-button presses: the download leg of the session.
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            // Clear the button spinner before any real work; a failure
            // here must not cost the user their download.
            if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                log::warn!("Failed to answer callback query: {}", e);
            }

            let Some(token) = q.data.as_deref() else {
                return Ok(());
            };
            let chat_id = q
                .message
                .as_ref()
                .map(|m| m.chat().id)
                .unwrap_or(ChatId(q.from.id.0 as i64));

            if let Err(e) = handle_format_choice(&bot, &deps, chat_id, token).await {
                bot.send_message(chat_id, user_message(&e)).await?;
            }
            Ok(())
        }
    })
}

/// Resolves the chosen format against the stored link, reports the size
/// estimate, and spawns the fetch → deliver → tally pipeline.
///
/// Returns an error only for the recoverable pre-download failures
/// (expired session, unknown format); everything after the spawn reports
/// to the user from inside the pipeline task.
async fn handle_format_choice(bot: &Bot, deps: &HandlerDeps, chat_id: ChatId, token: &str) -> Result<(), DownloadError> {
    let url = deps.links.resolve(chat_id)?;
    let format = Format::from_token(token)?;

    let is_playlist = is_playlist_url(&url);
    let selector = resolve_selector(format, is_playlist);
    log::info!(
        "Chat {} chose {} for {} (playlist={}, selector={})",
        chat_id,
        format.as_token(),
        url,
        is_playlist,
        selector
    );

    // Size estimate is best-effort and never blocks the download.
    let size_msg = if format.is_audio() {
        "🎵 MP3 selected".to_string()
    } else {
        estimate_size(&url, selector).await
    };
    if let Err(e) = bot.send_message(chat_id, size_msg).await {
        log::warn!("Failed to send size estimate to chat {}: {}", chat_id, e);
    }

    let bot = bot.clone();
    let counter = Arc::clone(&deps.counter);
    tokio::spawn(async move {
        run_download_pipeline(bot, counter, chat_id, url, selector, format.is_audio()).await;
    });

    Ok(())
}

/// The fetch → deliver → tally leg, run on its own task per download.
///
/// Every outcome ends in a chat message; the job directory is removed no
/// matter how the run went.
async fn run_download_pipeline(
    bot: Bot,
    counter: Arc<DownloadCounter>,
    chat_id: ChatId,
    url: String,
    selector: &'static str,
    audio_only: bool,
) {
    let job_dir = match JobDir::create().await {
        Ok(dir) => dir,
        Err(e) => {
            log::error!("Failed to create job dir for chat {}: {}", chat_id, e);
            let _ = bot
                .send_message(chat_id, "❌ Download failed: could not prepare working directory")
                .await;
            return;
        }
    };

    let result = fetch(&url, selector, audio_only, job_dir.path()).await;
    match result {
        Ok(()) => match deliver(&bot, chat_id, job_dir.path()).await {
            Ok(outcome) if outcome.is_complete() => {
                let total = counter.increment(chat_id);
                let _ = bot
                    .send_message(chat_id, format!("✅ Total downloads by you: {}", total))
                    .await;
            }
            Ok(outcome) => {
                // Partial delivery: no tally, tell the user what got stuck.
                let _ = bot
                    .send_message(
                        chat_id,
                        format!("⚠️ Failed to send {} file(s): {}", outcome.failed.len(), outcome.failed.join(", ")),
                    )
                    .await;
            }
            Err(e) => {
                let _ = bot.send_message(chat_id, user_message(&e)).await;
            }
        },
        Err(e) => {
            let _ = bot.send_message(chat_id, user_message(&e)).await;
        }
    }

    job_dir.cleanup().await;
}

/// Maps the error taxonomy to user-facing chat text. Raw diagnostics stay
/// in the operator log.
fn user_message(err: &DownloadError) -> String {
    match err {
        DownloadError::ExpiredSession => "❌ Link expired. Please send again.".to_string(),
        DownloadError::UnknownFormat(token) => format!("❌ Unknown format: {}", token),
        DownloadError::Execution(detail) => format!("❌ Download failed: {}", detail),
        DownloadError::Timeout(secs) => format!("⏳ Download timed out after {}s. Please try again.", secs),
        DownloadError::NoOutput => "⚠️ The download finished but produced no files.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn expired_session_prompts_resubmission() {
        assert_eq!(
            user_message(&DownloadError::ExpiredSession),
            "❌ Link expired. Please send again."
        );
    }

    #[test]
    fn execution_errors_carry_the_diagnostic() {
        let msg = user_message(&DownloadError::Execution("ERROR: Video unavailable".to_string()));
        assert!(msg.contains("Video unavailable"));
    }

    #[test]
    fn timeout_is_reported_distinctly() {
        let msg = user_message(&DownloadError::Timeout(1800));
        assert!(msg.contains("1800s"));
    }
}
