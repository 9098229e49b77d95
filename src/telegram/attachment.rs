//! Attachment extraction from inbound messages.

use teloxide::types::{ChatId, Message, MessageId};

use crate::storage::UserProfile;

/// Metadata of one media object as reported by Telegram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_id: String,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
}

/// The media a message carries, detected once at the update boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Document(MediaFile),
    Audio(MediaFile),
    Video(MediaFile),
    Image(MediaFile),
}

// Telegram leaves file_size out for some media and teloxide reports that as 0.
fn known_size(size: u32) -> Option<u64> {
    (size > 0).then_some(u64::from(size))
}

impl Attachment {
    /// Detects the attachment, checking document, audio, video and photo in
    /// that order. Photos use the first size variant Telegram lists.
    pub fn from_message(msg: &Message) -> Option<Self> {
        if let Some(doc) = msg.document() {
            return Some(Attachment::Document(MediaFile {
                file_id: doc.file.id.0.clone(),
                file_name: doc.file_name.clone(),
                file_size: known_size(doc.file.size),
                mime_type: doc.mime_type.as_ref().map(|m| m.to_string()),
            }));
        }
        if let Some(audio) = msg.audio() {
            return Some(Attachment::Audio(MediaFile {
                file_id: audio.file.id.0.clone(),
                file_name: audio.file_name.clone(),
                file_size: known_size(audio.file.size),
                mime_type: audio.mime_type.as_ref().map(|m| m.to_string()),
            }));
        }
        if let Some(video) = msg.video() {
            return Some(Attachment::Video(MediaFile {
                file_id: video.file.id.0.clone(),
                file_name: video.file_name.clone(),
                file_size: known_size(video.file.size),
                mime_type: video.mime_type.as_ref().map(|m| m.to_string()),
            }));
        }
        let photo = msg.photo()?.first()?;
        Some(Attachment::Image(MediaFile {
            file_id: photo.file.id.0.clone(),
            file_name: None,
            file_size: known_size(photo.file.size),
            mime_type: None,
        }))
    }

    pub fn media(&self) -> &MediaFile {
        match self {
            Attachment::Document(media)
            | Attachment::Audio(media)
            | Attachment::Video(media)
            | Attachment::Image(media) => media,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Attachment::Document(_) => "document",
            Attachment::Audio(_) => "audio",
            Attachment::Video(_) => "video",
            Attachment::Image(_) => "image",
        }
    }
}

/// Telegram ID of the sender, falling back to the chat ID for anonymous senders.
pub fn sender_id(msg: &Message) -> i64 {
    msg.from
        .as_ref()
        .and_then(|u| i64::try_from(u.id.0).ok())
        .unwrap_or(msg.chat.id.0)
}

/// An inbound message as seen by the file registry.
#[derive(Debug, Clone)]
pub struct UploadEvent {
    /// Chat the upload was sent in
    pub chat_id: ChatId,
    /// Message carrying the attachment
    pub message_id: MessageId,
    /// Uploader, as reported by [`sender_id`]
    pub owner_id: i64,
    pub attachment: Option<Attachment>,
}

impl UploadEvent {
    pub fn from_message(msg: &Message) -> Self {
        Self {
            chat_id: msg.chat.id,
            message_id: msg.id,
            owner_id: sender_id(msg),
            attachment: Attachment::from_message(msg),
        }
    }
}

impl UserProfile {
    /// Captures the sender's profile; `None` for messages without a sender.
    pub fn from_message(msg: &Message) -> Option<Self> {
        let user = msg.from.as_ref()?;
        Self::from_user(user)
    }

    pub fn from_user(user: &teloxide::types::User) -> Option<Self> {
        Some(Self {
            user_id: i64::try_from(user.id.0).ok()?,
            username: user.username.clone(),
            first_name: Some(user.first_name.clone()),
            last_name: user.last_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn message(media: &str) -> Message {
        let json = format!(
            r#"{{
                "message_id": 77,
                "date": 1700000000,
                "chat": {{"id": 1001, "type": "private", "first_name": "Ada"}},
                "from": {{"id": 1001, "is_bot": false, "first_name": "Ada", "last_name": "L", "username": "ada"}},
                {}
            }}"#,
            media
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_document_attachment() {
        let msg = message(
            r#""document": {"file_id": "doc-1", "file_unique_id": "u1", "file_size": 2048,
                "file_name": "report.pdf", "mime_type": "application/pdf"}"#,
        );

        let attachment = Attachment::from_message(&msg).unwrap();
        assert_eq!(attachment.kind(), "document");
        assert_eq!(
            attachment.media(),
            &MediaFile {
                file_id: "doc-1".to_string(),
                file_name: Some("report.pdf".to_string()),
                file_size: Some(2048),
                mime_type: Some("application/pdf".to_string()),
            }
        );
    }

    #[test]
    fn test_photo_uses_first_variant() {
        let msg = message(
            r#""photo": [
                {"file_id": "small", "file_unique_id": "s", "file_size": 900, "width": 90, "height": 90},
                {"file_id": "large", "file_unique_id": "l", "file_size": 90000, "width": 900, "height": 900}
            ]"#,
        );

        let attachment = Attachment::from_message(&msg).unwrap();
        assert_eq!(attachment.kind(), "image");
        assert_eq!(attachment.media().file_id, "small");
        assert_eq!(attachment.media().file_name, None);
    }

    #[test]
    fn test_text_message_has_no_attachment() {
        let msg = message(r#""text": "hello""#);
        assert!(Attachment::from_message(&msg).is_none());

        let event = UploadEvent::from_message(&msg);
        assert!(event.attachment.is_none());
        assert_eq!(event.owner_id, 1001);
        assert_eq!(event.message_id, MessageId(77));
    }

    #[test]
    fn test_anonymous_upload_is_owned_by_chat() {
        let msg: Message = serde_json::from_str(
            r#"{
                "message_id": 78,
                "date": 1700000000,
                "chat": {"id": -1009, "type": "supergroup", "title": "Drop box"},
                "document": {"file_id": "doc-2", "file_unique_id": "u2", "file_size": 10}
            }"#,
        )
        .unwrap();

        assert_eq!(sender_id(&msg), -1009);
        assert_eq!(UploadEvent::from_message(&msg).owner_id, -1009);
        assert!(UserProfile::from_message(&msg).is_none());
    }

    #[test]
    fn test_profile_from_message() {
        let msg = message(r#""text": "hi""#);
        let profile = UserProfile::from_message(&msg).unwrap();

        assert_eq!(profile.user_id, 1001);
        assert_eq!(profile.username.as_deref(), Some("ada"));
        assert_eq!(profile.first_name.as_deref(), Some("Ada"));
        assert_eq!(profile.last_name.as_deref(), Some("L"));
    }
}
