//! Upload handler: any message carrying a document, audio, video or photo

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Message, ParseMode};

use super::types::{track_sender, HandlerDeps, HandlerError};
use crate::core::utils::escape_markdown_v2;
use crate::telegram::attachment::{Attachment, UploadEvent};
use crate::telegram::registry::StoredFile;
use crate::telegram::Bot;

const PROCESSING_TEXT: &str = "🔄 Processing your file...";

pub(super) fn format_success_message(stored: &StoredFile) -> String {
    indoc::formatdoc! {"
        🎉 *File stored successfully\\!*

        📁 *File Name:* {name}
        📊 *Size:* {size}
        🔗 *Share Link:* [Click Here]({link})

        _Click the link to instantly receive the file_ 📨
        ",
        name = escape_markdown_v2(&stored.display_name),
        size = escape_markdown_v2(&stored.size_label),
        link = stored.record.share_link.replace('\\', "\\\\").replace(')', "\\)"),
    }
}

fn share_keyboard(stored: &StoredFile) -> Option<InlineKeyboardMarkup> {
    let url = url::Url::parse(&stored.record.share_link).ok()?;
    Some(InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
        "📎 Share Link",
        url,
    )]]))
}

/// Handler for media uploads (document/audio/video/photo)
pub(super) fn media_upload_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| Attachment::from_message(&msg).is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                track_sender(&deps, &msg);
                handle_upload(&bot, &msg, &deps).await
            }
        })
}

async fn handle_upload(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> Result<(), HandlerError> {
    let chat_id = msg.chat.id;
    let event = UploadEvent::from_message(msg);

    let status = bot.send_message(chat_id, PROCESSING_TEXT).await?;
    let result = deps.registry.register_upload(bot, &event).await;
    if let Err(e) = bot.delete_message(chat_id, status.id).await {
        log::warn!("Failed to delete status message in chat {}: {}", chat_id, e);
    }

    match result {
        Ok(stored) => {
            let mut reply = bot
                .send_message(chat_id, format_success_message(&stored))
                .parse_mode(ParseMode::MarkdownV2);
            if let Some(keyboard) = share_keyboard(&stored) {
                reply = reply.reply_markup(keyboard);
            }
            reply.await?;
        }
        Err(e) => {
            log::error!("Error handling file from user {} in chat {}: {}", event.owner_id, chat_id, e);
            bot.send_message(chat_id, e.user_message()).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::files::sample_file;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_success_message_escapes_metadata() {
        let stored = StoredFile {
            record: sample_file(42),
            display_name: "q3_report (final).pdf".to_string(),
            size_label: "2 KB".to_string(),
        };

        let text = format_success_message(&stored);

        assert_eq!(
            text,
            "🎉 *File stored successfully\\!*\n\
             \n\
             📁 *File Name:* q3\\_report \\(final\\)\\.pdf\n\
             📊 *Size:* 2 KB\n\
             🔗 *Share Link:* [Click Here](https://t.me/store_bot?start=file_42)\n\
             \n\
             _Click the link to instantly receive the file_ 📨\n"
        );
    }

    #[test]
    fn test_share_keyboard_links_to_record() {
        let stored = StoredFile {
            record: sample_file(7),
            display_name: "report.pdf".to_string(),
            size_label: "2 KB".to_string(),
        };

        let keyboard = share_keyboard(&stored).unwrap();
        assert_eq!(keyboard.inline_keyboard.len(), 1);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "📎 Share Link");
    }
}
