//! Deep-links that hand a stored file to whoever opens them.
//!
//! Format: `https://t.me/<bot_username>?start=file_<channel_message_id>`.

use teloxide::types::MessageId;

use crate::core::config::links::{FILE_START_PREFIX, TELEGRAM_BASE_URL};

/// Builds the share link for a relayed copy in the storage channel.
pub fn share_link(bot_username: &str, channel_message_id: MessageId) -> String {
    format!(
        "{}/{}?start={}{}",
        TELEGRAM_BASE_URL,
        bot_username.trim_start_matches('@'),
        FILE_START_PREFIX,
        channel_message_id.0
    )
}

/// Extracts the share identifier from a `/start` parameter.
///
/// Returns `None` for a bare `/start` or any other start-parameter. The
/// identifier is returned unparsed; lookup decides whether it is valid.
pub fn parse_start_param(param: &str) -> Option<&str> {
    param.trim().strip_prefix(FILE_START_PREFIX)
}
