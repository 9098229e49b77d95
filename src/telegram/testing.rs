//! Recording [`Messenger`] fake for workflow tests.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use teloxide::types::{MessageId, Recipient, UserId};
use teloxide::{ApiError, RequestError};

use super::messenger::{BotIdentity, ChannelRights, Messenger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ResolveChat(Recipient),
    Forward {
        to: Recipient,
        from: Recipient,
        message_id: MessageId,
    },
    SendText(Recipient, String),
    Delete(Recipient, MessageId),
    BotIdentity,
    MemberRights(Recipient, UserId),
}

/// Hands out increasing message IDs and records every call.
pub struct FakeMessenger {
    pub username: String,
    pub rights: ChannelRights,
    pub fail_resolve: AtomicBool,
    pub fail_forward: AtomicBool,
    pub fail_send: AtomicBool,
    pub fail_rights: AtomicBool,
    next_id: AtomicI32,
    calls: Mutex<Vec<Call>>,
}

impl Default for FakeMessenger {
    fn default() -> Self {
        Self {
            username: "store_bot".to_string(),
            rights: ChannelRights::all(),
            fail_resolve: AtomicBool::new(false),
            fail_forward: AtomicBool::new(false),
            fail_send: AtomicBool::new(false),
            fail_rights: AtomicBool::new(false),
            next_id: AtomicI32::new(100),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rights(rights: ChannelRights) -> Self {
        Self {
            rights,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn forwards(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Forward { .. }))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_message_id(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

fn api_error(err: ApiError) -> RequestError {
    RequestError::Api(err)
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn resolve_chat(&self, chat: Recipient) -> Result<(), RequestError> {
        self.record(Call::ResolveChat(chat));
        if self.fail_resolve.load(Ordering::SeqCst) {
            return Err(api_error(ApiError::ChatNotFound));
        }
        Ok(())
    }

    async fn forward(&self, to: Recipient, from: Recipient, message_id: MessageId) -> Result<MessageId, RequestError> {
        self.record(Call::Forward { to, from, message_id });
        if self.fail_forward.load(Ordering::SeqCst) {
            return Err(api_error(ApiError::MessageToForwardNotFound));
        }
        Ok(self.next_message_id())
    }

    async fn send_text(&self, to: Recipient, text: String) -> Result<MessageId, RequestError> {
        self.record(Call::SendText(to, text));
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(api_error(ApiError::ChatNotFound));
        }
        Ok(self.next_message_id())
    }

    async fn delete(&self, chat: Recipient, message_id: MessageId) -> Result<(), RequestError> {
        self.record(Call::Delete(chat, message_id));
        Ok(())
    }

    async fn bot_identity(&self) -> Result<BotIdentity, RequestError> {
        self.record(Call::BotIdentity);
        Ok(BotIdentity {
            id: UserId(999),
            username: self.username.clone(),
        })
    }

    async fn member_rights(&self, chat: Recipient, user_id: UserId) -> Result<ChannelRights, RequestError> {
        self.record(Call::MemberRights(chat, user_id));
        if self.fail_rights.load(Ordering::SeqCst) {
            return Err(api_error(ApiError::ChatNotFound));
        }
        Ok(self.rights)
    }
}
