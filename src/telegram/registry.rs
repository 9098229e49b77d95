//! File registry: relays uploads into the storage channel and records them.

use std::sync::Arc;

use chrono::Utc;
use teloxide::types::Recipient;
use tokio::sync::OnceCell;

use super::attachment::UploadEvent;
use super::links::share_link;
use super::messenger::Messenger;
use crate::core::error::ShareError;
use crate::core::utils::format_file_size;
use crate::storage::files::insert_file;
use crate::storage::{get_connection, DbPool, FileRecord};

/// Shown when the uploaded media carries no file name.
pub const UNNAMED_FILE: &str = "Unnamed file";

/// A registered upload together with its display metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub record: FileRecord,
    pub display_name: String,
    pub size_label: String,
}

pub struct FileRegistry {
    db_pool: Arc<DbPool>,
    channel: Recipient,
    bot_username: OnceCell<String>,
}

impl FileRegistry {
    pub fn new(db_pool: Arc<DbPool>, channel: Recipient) -> Self {
        Self {
            db_pool,
            channel,
            bot_username: OnceCell::new(),
        }
    }

    /// Seeds the username cache with a value already fetched at startup.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = OnceCell::new_with(Some(username.into()));
        self
    }

    async fn bot_username<M>(&self, messenger: &M) -> Result<&str, teloxide::RequestError>
    where
        M: Messenger + ?Sized,
    {
        let username = self
            .bot_username
            .get_or_try_init(|| async move { messenger.bot_identity().await.map(|me| me.username) })
            .await?;
        Ok(username.as_str())
    }

    /// Relays the upload into the storage channel and persists its record.
    ///
    /// Channel reachability is checked on every call. A relayed copy whose
    /// record could not be written stays in the channel unreferenced.
    pub async fn register_upload<M>(&self, messenger: &M, event: &UploadEvent) -> Result<StoredFile, ShareError>
    where
        M: Messenger + ?Sized,
    {
        let attachment = event.attachment.as_ref().ok_or(ShareError::NoAttachment)?;
        let media = attachment.media();

        messenger
            .resolve_chat(self.channel.clone())
            .await
            .map_err(ShareError::ChannelUnavailable)?;

        let channel_message_id = messenger
            .forward(self.channel.clone(), Recipient::Id(event.chat_id), event.message_id)
            .await
            .map_err(ShareError::RelayFailed)?;

        let username = match self.bot_username(messenger).await {
            Ok(username) => username,
            Err(e) => {
                log::error!(
                    "Orphaned channel message {} (owner {}): bot username unavailable: {}",
                    channel_message_id.0,
                    event.owner_id,
                    e
                );
                return Err(ShareError::RelayFailed(e));
            }
        };

        let record = FileRecord {
            source_file_id: media.file_id.clone(),
            owner_id: event.owner_id,
            channel_message_id: channel_message_id.0,
            display_name: media.file_name.clone(),
            size_bytes: media.file_size,
            mime_type: media.mime_type.clone(),
            share_link: share_link(username, channel_message_id),
            created_at: Utc::now(),
        };

        let persisted = get_connection(&self.db_pool)
            .map_err(ShareError::from)
            .and_then(|conn| insert_file(&conn, &record).map_err(ShareError::from));
        if let Err(e) = persisted {
            log::error!(
                "Orphaned channel message {} (owner {}): {}",
                record.channel_message_id,
                record.owner_id,
                e
            );
            return Err(e);
        }

        log::info!(
            "Stored {} from user {} as channel message {}",
            attachment.kind(),
            record.owner_id,
            record.channel_message_id
        );

        Ok(StoredFile {
            display_name: record.display_name.clone().unwrap_or_else(|| UNNAMED_FILE.to_string()),
            size_label: format_file_size(record.size_bytes),
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::db::test_support::temp_pool;
    use crate::storage::files::{count_files, get_file_by_channel_message_id};
    use crate::telegram::attachment::{Attachment, MediaFile};
    use crate::telegram::links::parse_start_param;
    use crate::telegram::resolver::LinkResolver;
    use crate::telegram::testing::{Call, FakeMessenger};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::Ordering;
    use teloxide::types::{ChatId, MessageId};

    fn channel() -> Recipient {
        Recipient::ChannelUsername("@file_vault".to_string())
    }

    fn upload(attachment: Option<Attachment>) -> UploadEvent {
        UploadEvent {
            chat_id: ChatId(501),
            message_id: MessageId(12),
            owner_id: 501,
            attachment,
        }
    }

    fn report_pdf() -> Attachment {
        Attachment::Document(MediaFile {
            file_id: "BQAC-report".to_string(),
            file_name: Some("report.pdf".to_string()),
            file_size: Some(2048),
            mime_type: Some("application/pdf".to_string()),
        })
    }

    #[tokio::test]
    async fn test_register_upload_relays_and_persists() {
        let (_dir, pool) = temp_pool();
        let pool = Arc::new(pool);
        let registry = FileRegistry::new(Arc::clone(&pool), channel());
        let messenger = FakeMessenger::new();

        let stored = registry.register_upload(&messenger, &upload(Some(report_pdf()))).await.unwrap();

        assert_eq!(stored.record.channel_message_id, 100);
        assert_eq!(stored.record.share_link, "https://t.me/store_bot?start=file_100");
        assert_eq!(stored.display_name, "report.pdf");
        assert_eq!(stored.size_label, "2 KB");
        assert_eq!(
            messenger.forwards(),
            vec![Call::Forward {
                to: channel(),
                from: Recipient::Id(ChatId(501)),
                message_id: MessageId(12),
            }]
        );

        let conn = get_connection(&pool).unwrap();
        let found = get_file_by_channel_message_id(&conn, 100).unwrap().unwrap();
        assert_eq!(found, stored.record);
    }

    #[tokio::test]
    async fn test_share_link_resolves_to_stored_record() {
        let (_dir, pool) = temp_pool();
        let pool = Arc::new(pool);
        let registry = FileRegistry::new(Arc::clone(&pool), channel());
        let resolver = LinkResolver::new(Arc::clone(&pool), channel());
        let messenger = FakeMessenger::new();

        let stored = registry.register_upload(&messenger, &upload(Some(report_pdf()))).await.unwrap();

        let link = url::Url::parse(&stored.record.share_link).unwrap();
        assert_eq!(link.path(), "/store_bot");
        let start = link
            .query_pairs()
            .find(|(key, _)| key == "start")
            .map(|(_, value)| value.into_owned())
            .unwrap();
        let identifier = parse_start_param(&start).unwrap();

        let delivered = resolver.resolve_share(&messenger, ChatId(902), identifier).await.unwrap();

        assert_eq!(delivered, stored.record);
        assert_eq!(
            messenger.forwards().last(),
            Some(&Call::Forward {
                to: Recipient::Id(ChatId(902)),
                from: channel(),
                message_id: MessageId(stored.record.channel_message_id),
            })
        );
        assert_eq!(count_files(&get_connection(&pool).unwrap()).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_no_attachment_is_rejected_without_side_effects() {
        let (_dir, pool) = temp_pool();
        let pool = Arc::new(pool);
        let registry = FileRegistry::new(Arc::clone(&pool), channel());
        let messenger = FakeMessenger::new();

        let err = registry.register_upload(&messenger, &upload(None)).await.unwrap_err();

        assert!(matches!(err, ShareError::NoAttachment));
        assert!(messenger.calls().is_empty());
        assert_eq!(count_files(&get_connection(&pool).unwrap()).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_channel_persists_nothing() {
        let (_dir, pool) = temp_pool();
        let pool = Arc::new(pool);
        let registry = FileRegistry::new(Arc::clone(&pool), channel());
        let messenger = FakeMessenger::new();
        messenger.fail_resolve.store(true, Ordering::SeqCst);

        let err = registry.register_upload(&messenger, &upload(Some(report_pdf()))).await.unwrap_err();

        assert!(matches!(err, ShareError::ChannelUnavailable(_)));
        assert!(messenger.forwards().is_empty());
        assert_eq!(count_files(&get_connection(&pool).unwrap()).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_forward_is_relay_failure() {
        let (_dir, pool) = temp_pool();
        let pool = Arc::new(pool);
        let registry = FileRegistry::new(Arc::clone(&pool), channel());
        let messenger = FakeMessenger::new();
        messenger.fail_forward.store(true, Ordering::SeqCst);

        let err = registry.register_upload(&messenger, &upload(Some(report_pdf()))).await.unwrap_err();

        assert!(matches!(err, ShareError::RelayFailed(_)));
        assert_eq!(count_files(&get_connection(&pool).unwrap()).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_persistence_failure_leaves_relayed_copy() {
        let (_dir, pool) = temp_pool();
        let pool = Arc::new(pool);
        get_connection(&pool).unwrap().execute_batch("DROP TABLE files").unwrap();
        let registry = FileRegistry::new(Arc::clone(&pool), channel());
        let messenger = FakeMessenger::new();

        let err = registry.register_upload(&messenger, &upload(Some(report_pdf()))).await.unwrap_err();

        assert!(matches!(err, ShareError::PersistenceFailed(_)));
        assert_eq!(messenger.forwards().len(), 1);
    }

    #[tokio::test]
    async fn test_bot_username_resolved_once() {
        let (_dir, pool) = temp_pool();
        let registry = FileRegistry::new(Arc::new(pool), channel());
        let messenger = FakeMessenger::new();

        registry.register_upload(&messenger, &upload(Some(report_pdf()))).await.unwrap();
        registry.register_upload(&messenger, &upload(Some(report_pdf()))).await.unwrap();

        let lookups = messenger.calls().into_iter().filter(|c| *c == Call::BotIdentity).count();
        assert_eq!(lookups, 1);
    }

    #[tokio::test]
    async fn test_seeded_username_skips_lookup() {
        let (_dir, pool) = temp_pool();
        let registry = FileRegistry::new(Arc::new(pool), channel()).with_bot_username("seeded_bot");
        let messenger = FakeMessenger::new();

        let stored = registry.register_upload(&messenger, &upload(Some(report_pdf()))).await.unwrap();

        assert!(stored.record.share_link.starts_with("https://t.me/seeded_bot?start=file_"));
        assert!(!messenger.calls().contains(&Call::BotIdentity));
    }

    #[tokio::test]
    async fn test_unnamed_photo_display_metadata() {
        let (_dir, pool) = temp_pool();
        let registry = FileRegistry::new(Arc::new(pool), channel());
        let messenger = FakeMessenger::new();
        let photo = Attachment::Image(MediaFile {
            file_id: "AgAC-photo".to_string(),
            file_name: None,
            file_size: None,
            mime_type: None,
        });

        let stored = registry.register_upload(&messenger, &upload(Some(photo))).await.unwrap();

        assert_eq!(stored.display_name, UNNAMED_FILE);
        assert_eq!(stored.size_label, "Unknown size");
        assert_eq!(stored.record.display_name, None);
    }
}
