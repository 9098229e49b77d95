//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{handle_help_command, handle_start_command, HELP_CALLBACK};
use super::types::{track_sender, HandlerDeps, HandlerError};
use super::uploads::media_upload_handler;
use crate::storage::UserProfile;
use crate::telegram::admin::{handle_logs_command, handle_users_command};
use crate::telegram::attachment::sender_id;
use crate::telegram::bot::Command;
use crate::telegram::Bot;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same schema is used in production and in integration tests.
///
/// # Arguments
/// * `deps` - Handler dependencies (database pool, file registry, link resolver, etc.)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_media_upload = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        // Command handler
        .branch(command_handler(deps_commands))
        // Attachments are relayed into the storage channel
        .branch(media_upload_handler(deps_media_upload))
        // Anything else is only tracked
        .branch(message_handler(deps_messages))
        // Callback query handler
        .branch(callback_handler(deps_callback))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);
                track_sender(&deps, &msg);

                match cmd {
                    Command::Start(param) => {
                        handle_start_command(&bot, &msg, &param, &deps).await?;
                    }
                    Command::Help => {
                        handle_help_command(&bot, msg.chat.id).await?;
                    }
                    Command::Logs => {
                        handle_logs_command(
                            &bot,
                            msg.chat.id,
                            sender_id(&msg),
                            &deps.log_file_path,
                            &deps.admin_ids,
                        )
                        .await?;
                    }
                    Command::Users => {
                        handle_users_command(&bot, msg.chat.id, sender_id(&msg), &deps.users, &deps.admin_ids)
                            .await?;
                    }
                }
                Ok(())
            }
        },
    ))
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |msg: Message| {
        let deps = deps.clone();
        async move {
            track_sender(&deps, &msg);
            Ok(())
        }
    })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            if let Some(profile) = UserProfile::from_user(&q.from) {
                deps.users.record_interaction(profile);
            }

            let chat_id = q.message.as_ref().map(|m| m.chat().id);
            let result = match (q.data.as_deref(), chat_id) {
                (Some(HELP_CALLBACK), Some(chat_id)) => handle_help_command(&bot, chat_id).await,
                _ => Ok(()),
            };

            // Always answer, even if the action failed
            bot.answer_callback_query(q.id.clone()).await?;
            result
        }
    })
}
