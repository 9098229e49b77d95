//! Link resolver: turns a share identifier back into the stored channel copy.

use std::sync::Arc;

use teloxide::types::{ChatId, MessageId, Recipient};

use super::messenger::Messenger;
use crate::core::error::ShareError;
use crate::storage::files::get_file_by_channel_message_id;
use crate::storage::{get_connection, DbPool, FileRecord};

pub struct LinkResolver {
    db_pool: Arc<DbPool>,
    channel: Recipient,
}

impl LinkResolver {
    pub fn new(db_pool: Arc<DbPool>, channel: Recipient) -> Self {
        Self { db_pool, channel }
    }

    /// Finds the record for a share identifier.
    ///
    /// Only the canonical form links are built with matches: plain ASCII
    /// digits, no sign, no leading zero, within `i32`.
    pub fn lookup(&self, identifier: &str) -> Result<Option<FileRecord>, ShareError> {
        let Some(channel_message_id) = canonical_message_id(identifier.trim()) else {
            return Ok(None);
        };
        let conn = get_connection(&self.db_pool)?;
        Ok(get_file_by_channel_message_id(&conn, channel_message_id)?)
    }

    /// Forwards the stored copy to `requester`. Nothing is written.
    pub async fn resolve_share<M>(
        &self,
        messenger: &M,
        requester: ChatId,
        identifier: &str,
    ) -> Result<FileRecord, ShareError>
    where
        M: Messenger + ?Sized,
    {
        let record = self
            .lookup(identifier)?
            .ok_or_else(|| ShareError::LinkExpired(identifier.to_string()))?;

        messenger
            .forward(
                Recipient::Id(requester),
                self.channel.clone(),
                MessageId(record.channel_message_id),
            )
            .await
            .map_err(ShareError::DeliveryFailed)?;

        log::info!(
            "Delivered channel message {} to chat {}",
            record.channel_message_id,
            requester
        );
        Ok(record)
    }
}

fn canonical_message_id(identifier: &str) -> Option<i32> {
    let digits_only = !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || identifier.starts_with('0') {
        return None;
    }
    identifier.parse().ok()
}
