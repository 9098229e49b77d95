//! Known users: one row per Telegram user, refreshed on every interaction.

use chrono::{DateTime, Utc};
use rusqlite::Result;

use super::db::{format_timestamp, timestamp_column, DbConnection};

/// A user the bot has seen at least once.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    /// Telegram user ID (primary key)
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// First interaction; never rewritten
    pub join_date: DateTime<Utc>,
    /// Most recent interaction
    pub last_active: DateTime<Utc>,
}

/// Profile fields captured from an inbound update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Inserts the user or refreshes an existing row.
///
/// Profile fields and `last_active` are overwritten; `join_date` is only
/// written on insert.
pub fn upsert_user(conn: &DbConnection, profile: &UserProfile, now: DateTime<Utc>) -> Result<()> {
    let now = format_timestamp(&now);
    conn.execute(
        "INSERT INTO users (user_id, username, first_name, last_name, join_date, last_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)
         ON CONFLICT(user_id) DO UPDATE SET
            username = excluded.username,
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            last_active = excluded.last_active",
        rusqlite::params![
            profile.user_id,
            profile.username,
            profile.first_name,
            profile.last_name,
            now
        ],
    )?;
    Ok(())
}

fn user_from_row(row: &rusqlite::Row<'_>) -> Result<UserRecord> {
    Ok(UserRecord {
        user_id: row.get(0)?,
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        join_date: timestamp_column(row, 4)?,
        last_active: timestamp_column(row, 5)?,
    })
}

/// Gets a user by Telegram ID.
///
/// Returns `Ok(None)` if the user has never interacted with the bot.
pub fn get_user(conn: &DbConnection, user_id: i64) -> Result<Option<UserRecord>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, username, first_name, last_name, join_date, last_active
         FROM users WHERE user_id = ?",
    )?;
    let mut rows = stmt.query([user_id])?;

    match rows.next()? {
        Some(row) => Ok(Some(user_from_row(row)?)),
        None => Ok(None),
    }
}

/// Gets every known user, oldest first.
pub fn get_all_users(conn: &DbConnection) -> Result<Vec<UserRecord>> {
    let mut stmt = conn.prepare(
        "SELECT user_id, username, first_name, last_name, join_date, last_active
         FROM users ORDER BY join_date, user_id",
    )?;
    let rows = stmt.query_map([], user_from_row)?;

    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}
