//! The slice of the Bot API the file workflow depends on.
//!
//! `Messenger` is implemented for teloxide's [`Bot`]; tests substitute a
//! recording fake.

use std::fmt;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberKind, MessageId, Recipient, UserId};
use teloxide::RequestError;

/// Identity of the authenticated bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: UserId,
    pub username: String,
}

/// Administrative capabilities the bot needs in the storage channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelCapability {
    PostMessages,
    EditMessages,
    DeleteMessages,
}

impl ChannelCapability {
    pub const ALL: [ChannelCapability; 3] = [
        ChannelCapability::PostMessages,
        ChannelCapability::EditMessages,
        ChannelCapability::DeleteMessages,
    ];

    /// Bot API name of the permission flag.
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelCapability::PostMessages => "can_post_messages",
            ChannelCapability::EditMessages => "can_edit_messages",
            ChannelCapability::DeleteMessages => "can_delete_messages",
        }
    }
}

impl fmt::Display for ChannelCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rights of a chat member, reduced to what the storage channel requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelRights {
    pub can_post_messages: bool,
    pub can_edit_messages: bool,
    pub can_delete_messages: bool,
}

impl ChannelRights {
    pub fn all() -> Self {
        Self {
            can_post_messages: true,
            can_edit_messages: true,
            can_delete_messages: true,
        }
    }

    pub fn from_member_kind(kind: &ChatMemberKind) -> Self {
        Self {
            can_post_messages: kind.can_post_messages(),
            can_edit_messages: kind.can_edit_messages(),
            can_delete_messages: kind.can_delete_messages(),
        }
    }

    pub fn grants(&self, capability: ChannelCapability) -> bool {
        match capability {
            ChannelCapability::PostMessages => self.can_post_messages,
            ChannelCapability::EditMessages => self.can_edit_messages,
            ChannelCapability::DeleteMessages => self.can_delete_messages,
        }
    }

    /// Capabilities from [`ChannelCapability::ALL`] that are not granted.
    pub fn missing(&self) -> Vec<ChannelCapability> {
        ChannelCapability::ALL
            .into_iter()
            .filter(|capability| !self.grants(*capability))
            .collect()
    }
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Resolves a chat, failing if the bot cannot see it.
    async fn resolve_chat(&self, chat: Recipient) -> Result<(), RequestError>;

    /// Forwards a message and returns the ID of the copy in `to`.
    async fn forward(&self, to: Recipient, from: Recipient, message_id: MessageId) -> Result<MessageId, RequestError>;

    async fn send_text(&self, to: Recipient, text: String) -> Result<MessageId, RequestError>;

    async fn delete(&self, chat: Recipient, message_id: MessageId) -> Result<(), RequestError>;

    async fn bot_identity(&self) -> Result<BotIdentity, RequestError>;

    async fn member_rights(&self, chat: Recipient, user_id: UserId) -> Result<ChannelRights, RequestError>;
}

#[async_trait]
impl Messenger for Bot {
    async fn resolve_chat(&self, chat: Recipient) -> Result<(), RequestError> {
        self.get_chat(chat).await.map(|_| ())
    }

    async fn forward(&self, to: Recipient, from: Recipient, message_id: MessageId) -> Result<MessageId, RequestError> {
        self.forward_message(to, from, message_id).await.map(|msg| msg.id)
    }

    async fn send_text(&self, to: Recipient, text: String) -> Result<MessageId, RequestError> {
        self.send_message(to, text).await.map(|msg| msg.id)
    }

    async fn delete(&self, chat: Recipient, message_id: MessageId) -> Result<(), RequestError> {
        self.delete_message(chat, message_id).await.map(|_| ())
    }

    async fn bot_identity(&self) -> Result<BotIdentity, RequestError> {
        let me = self.get_me().await?;
        Ok(BotIdentity {
            id: me.user.id,
            username: me.username().to_string(),
        })
    }

    async fn member_rights(&self, chat: Recipient, user_id: UserId) -> Result<ChannelRights, RequestError> {
        let member = self.get_chat_member(chat, user_id).await?;
        Ok(ChannelRights::from_member_kind(&member.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_lists_only_denied_capabilities() {
        let rights = ChannelRights {
            can_post_messages: true,
            can_edit_messages: false,
            can_delete_messages: false,
        };
        assert_eq!(
            rights.missing(),
            vec![ChannelCapability::EditMessages, ChannelCapability::DeleteMessages]
        );
        assert!(ChannelRights::all().missing().is_empty());
        assert_eq!(ChannelRights::default().missing().len(), 3);
    }

    #[test]
    fn test_capability_display_uses_bot_api_names() {
        assert_eq!(ChannelCapability::PostMessages.to_string(), "can_post_messages");
        assert_eq!(ChannelCapability::DeleteMessages.to_string(), "can_delete_messages");
    }
}
