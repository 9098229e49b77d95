//! Stored files: the mapping from a storage channel message to the original upload.
//!
//! Rows are inserted once per successful relay and never updated or deleted.

use chrono::{DateTime, Utc};
use rusqlite::Result;

use super::db::{format_timestamp, timestamp_column, DbConnection};

/// One file relayed into the storage channel.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Telegram file_id of the original media object
    pub source_file_id: String,
    /// Telegram ID of the uploader
    pub owner_id: i64,
    /// Message ID of the relayed copy in the storage channel; the share key
    pub channel_message_id: i32,
    pub display_name: Option<String>,
    pub size_bytes: Option<u64>,
    pub mime_type: Option<String>,
    /// Deep-link that resolves back to this record
    pub share_link: String,
    pub created_at: DateTime<Utc>,
}

/// Inserts a new file record.
///
/// Fails with a constraint violation if `channel_message_id` is already
/// registered.
pub fn insert_file(conn: &DbConnection, file: &FileRecord) -> Result<()> {
    let size_bytes = file.size_bytes.and_then(|s| i64::try_from(s).ok());
    conn.execute(
        "INSERT INTO files (
            source_file_id, owner_id, channel_message_id, display_name,
            size_bytes, mime_type, share_link, created_at
         )
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            file.source_file_id,
            file.owner_id,
            file.channel_message_id,
            file.display_name,
            size_bytes,
            file.mime_type,
            file.share_link,
            format_timestamp(&file.created_at),
        ],
    )?;
    Ok(())
}

fn file_from_row(row: &rusqlite::Row<'_>) -> Result<FileRecord> {
    let size_bytes: Option<i64> = row.get(4)?;
    Ok(FileRecord {
        source_file_id: row.get(0)?,
        owner_id: row.get(1)?,
        channel_message_id: row.get(2)?,
        display_name: row.get(3)?,
        size_bytes: size_bytes.and_then(|s| u64::try_from(s).ok()),
        mime_type: row.get(5)?,
        share_link: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
    })
}

/// Finds the file registered under a storage channel message ID.
///
/// Returns `Ok(None)` if nothing was registered under that ID.
pub fn get_file_by_channel_message_id(conn: &DbConnection, channel_message_id: i32) -> Result<Option<FileRecord>> {
    let mut stmt = conn.prepare(
        "SELECT source_file_id, owner_id, channel_message_id, display_name,
                size_bytes, mime_type, share_link, created_at
         FROM files WHERE channel_message_id = ?",
    )?;
    let mut rows = stmt.query([channel_message_id])?;

    match rows.next()? {
        Some(row) => Ok(Some(file_from_row(row)?)),
        None => Ok(None),
    }
}

/// Counts every registered file.
pub fn count_files(conn: &DbConnection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))
}

#[cfg(test)]
pub(crate) fn sample_file(channel_message_id: i32) -> FileRecord {
    FileRecord {
        source_file_id: format!("BQACAgI-{}", channel_message_id),
        owner_id: 42,
        channel_message_id,
        display_name: Some("report.pdf".to_string()),
        size_bytes: Some(2048),
        mime_type: Some("application/pdf".to_string()),
        share_link: format!("https://t.me/store_bot?start=file_{}", channel_message_id),
        created_at: Utc::now(),
    }
}
