//! Startup check that the storage channel is usable before polling begins.

use teloxide::types::Recipient;

use super::messenger::{ChannelCapability, Messenger};
use crate::core::error::{AppError, AppResult};

/// Text of the message posted and immediately deleted by the access check.
pub const CHECK_MESSAGE_TEXT: &str = "Bot access verification";

/// Outcome of the permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionReport {
    pub missing: Vec<ChannelCapability>,
}

impl PermissionReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn missing_names(&self) -> String {
        self.missing
            .iter()
            .map(|capability| capability.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub struct ChannelAccessGuard<M> {
    messenger: M,
    channel: Recipient,
}

impl<M: Messenger> ChannelAccessGuard<M> {
    pub fn new(messenger: M, channel: Recipient) -> Self {
        Self { messenger, channel }
    }

    /// Checks that the channel resolves and that a check message can be
    /// posted and deleted.
    pub async fn verify_access(&self) -> bool {
        if let Err(e) = self.messenger.resolve_chat(self.channel.clone()).await {
            log::error!("Channel access verification failed: cannot resolve channel: {}", e);
            return false;
        }
        let check_message = match self.messenger.send_text(self.channel.clone(), CHECK_MESSAGE_TEXT.to_string()).await {
            Ok(id) => id,
            Err(e) => {
                log::error!("Channel access verification failed: cannot post: {}", e);
                return false;
            }
        };
        if let Err(e) = self.messenger.delete(self.channel.clone(), check_message).await {
            log::error!("Channel access verification failed: cannot delete check message: {}", e);
            return false;
        }
        true
    }

    /// Checks the bot's membership rights in the channel.
    ///
    /// If the rights cannot be fetched every capability is reported missing.
    pub async fn verify_permissions(&self) -> PermissionReport {
        let rights = async {
            let me = self.messenger.bot_identity().await?;
            self.messenger.member_rights(self.channel.clone(), me.id).await
        }
        .await;

        let missing = match rights {
            Ok(rights) => rights.missing(),
            Err(e) => {
                log::error!("Permission check failed: {}", e);
                ChannelCapability::ALL.to_vec()
            }
        };
        if !missing.is_empty() {
            log::error!("Missing channel permissions: {:?}", missing);
        }
        PermissionReport { missing }
    }

    /// Runs both checks; an error means the bot must not start.
    pub async fn ensure_ready(&self) -> AppResult<()> {
        let has_access = self.verify_access().await;
        let report = self.verify_permissions().await;

        match (has_access, report.is_complete()) {
            (true, true) => Ok(()),
            (false, true) => Err(AppError::ChannelAccess(
                "cannot post to and delete from the channel".to_string(),
            )),
            (true, false) => Err(AppError::ChannelAccess(format!(
                "missing permissions: {}",
                report.missing_names()
            ))),
            (false, false) => Err(AppError::ChannelAccess(format!(
                "cannot post to and delete from the channel; missing permissions: {}",
                report.missing_names()
            ))),
        }
    }
}

/// Setup instructions printed when the startup check fails.
pub fn setup_instructions(channel: &str) -> String {
    indoc::formatdoc! {"
        Please ensure:
        1. Bot is added to the channel ({channel})
        2. Bot is an admin in the channel
        3. Bot has the following permissions:
           - Can post messages
           - Can edit messages
           - Can delete messages
    "}
}
