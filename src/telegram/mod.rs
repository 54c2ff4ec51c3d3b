//! Telegram transport: bot construction, keyboards, and the handler tree.

pub mod bot;
pub mod handlers;
pub mod keyboard;

use std::path::Path;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::InputFile;

use crate::core::error::AppError;
use crate::download::send::DeliverySink;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps};
pub use keyboard::format_keyboard;

/// The bot type used throughout the crate.
pub type Bot = teloxide::Bot;

/// The Telegram transport is the production delivery sink.
#[async_trait]
impl DeliverySink for Bot {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), AppError> {
        self.send_message(chat_id, text).await?;
        Ok(())
    }

    async fn send_document(&self, chat_id: ChatId, path: &Path) -> Result<(), AppError> {
        teloxide::prelude::Requester::send_document(self, chat_id, InputFile::file(path.to_path_buf())).await?;
        Ok(())
    }
}
