//! Command handler implementations (/start, /help, deep-link retrieval)

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Message, ParseMode};

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::channel_url;
use crate::telegram::links::parse_start_param;
use crate::telegram::Bot;

/// Callback data of the Help button.
pub(super) const HELP_CALLBACK: &str = "help";

pub(super) const WELCOME_TEXT: &str = indoc::indoc! {r"
    🎉 *Welcome to File Store Bot\!*

    I'm your personal file storage assistant\. Send me any file and I'll generate a shareable link instantly\!

    *Features:*
    📤 Store any type of file
    🔗 Get instant sharing links
    📨 Quick file retrieval
    🔐 Secure storage

    *Available Commands:*
    /help \- Show all commands 📚
    /logs \- View bot logs \(admin only\) 📊
    /users \- Show bot users \(admin only\) 👥

    _Simply send me any file to get started\!_ 🚀
"};

pub(super) const HELP_TEXT: &str = indoc::indoc! {r"
    📚 *Available Commands:*

    /start \- Start the bot 🎯
    /help \- Show this help message ℹ️
    /logs \- View bot logs \(admin only\) 📊
    /users \- Show bot users \(admin only\) 👥

    *How to use:*
    1️⃣ Send any file to the bot
    2️⃣ Get an instant sharing link
    3️⃣ Share the link with anyone
    4️⃣ Recipients get the file instantly\!

    *Supported File Types:*
    📄 Documents
    🎵 Audio files
    🎬 Video files
    📸 Images
    \.\.\.and more\!

    _Need help? Contact the admin_ 👨‍💻
"};

pub(super) const DELIVERED_TEXT: &str = "✅ Here's your file\\!\n\n_Feel free to send me more files to store and share\\!_ 🚀";

fn welcome_keyboard(deps: &HandlerDeps) -> InlineKeyboardMarkup {
    let mut row = vec![InlineKeyboardButton::callback("📚 Help", HELP_CALLBACK)];
    if let Some(url) = channel_url(&deps.channel).and_then(|u| url::Url::parse(&u).ok()) {
        row.push(InlineKeyboardButton::url("📢 Channel", url));
    }
    InlineKeyboardMarkup::new(vec![row])
}

/// Handle /start command, with or without a deep-link parameter
pub(super) async fn handle_start_command(
    bot: &Bot,
    msg: &Message,
    param: &str,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    if let Some(identifier) = parse_start_param(param) {
        return handle_file_request(bot, msg, identifier, deps).await;
    }

    bot.send_message(msg.chat.id, WELCOME_TEXT)
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(welcome_keyboard(deps))
        .await?;
    Ok(())
}

/// Handle /help command and the Help button
pub(super) async fn handle_help_command(bot: &Bot, chat_id: ChatId) -> Result<(), HandlerError> {
    bot.send_message(chat_id, HELP_TEXT).parse_mode(ParseMode::MarkdownV2).await?;
    Ok(())
}

/// Delivers the file behind a share link to the requesting chat
async fn handle_file_request(
    bot: &Bot,
    msg: &Message,
    identifier: &str,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    let chat_id = msg.chat.id;

    match deps.resolver.resolve_share(bot, chat_id, identifier).await {
        Ok(_) => {
            bot.send_message(chat_id, DELIVERED_TEXT)
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        Err(e) => {
            log::error!("Error handling file share '{}' for chat {}: {}", identifier, chat_id, e);
            bot.send_message(chat_id, e.user_message()).await?;
        }
    }
    Ok(())
}
