//! Bot initialization and storage channel addressing
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Parsing of the configured storage channel

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "start the bot")]
    Start(String),
    #[command(description = "show this help message")]
    Help,
    #[command(description = "view bot logs (admin only)")]
    Logs,
    #[command(description = "show bot users (admin only)")]
    Users,
}

/// Creates a Bot instance with custom or default API URL
///
/// Every request is bounded by `REQUEST_TIMEOUT_SECS`.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - Missing token or invalid `BOT_API_URL`
pub fn create_bot() -> anyhow::Result<Bot> {
    if config::BOT_TOKEN.is_empty() {
        anyhow::bail!("BOT_TOKEN is not set");
    }
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    let bot = Bot::with_client(config::BOT_TOKEN.as_str(), client);

    // Check if local Bot API server is configured
    let bot = match config::BOT_API_URL.as_deref() {
        Some(bot_api_url) => {
            log::info!("Using custom Bot API URL: {}", bot_api_url);
            let url = url::Url::parse(bot_api_url).map_err(|e| anyhow::anyhow!("Invalid BOT_API_URL: {}", e))?;
            bot.set_api_url(url)
        }
        None => bot,
    };

    Ok(bot)
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

/// Parses the configured storage channel.
///
/// Numeric values are chat IDs (`-100...`); anything else is a public
/// username, with or without the leading `@`.
pub fn parse_channel(raw: &str) -> Option<Recipient> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(id) = raw.parse::<i64>() {
        return Some(Recipient::Id(ChatId(id)));
    }
    let username = raw.trim_start_matches('@');
    if username.is_empty() {
        return None;
    }
    Some(Recipient::ChannelUsername(format!("@{}", username)))
}

/// Public URL of the channel; `None` for channels addressed by ID.
pub fn channel_url(channel: &Recipient) -> Option<String> {
    match channel {
        Recipient::ChannelUsername(username) => Some(format!(
            "{}/{}",
            config::links::TELEGRAM_BASE_URL,
            username.trim_start_matches('@')
        )),
        Recipient::Id(_) => None,
    }
}
