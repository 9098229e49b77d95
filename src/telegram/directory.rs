//! User directory: best-effort bookkeeping of everyone who talks to the bot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::core::error::AppResult;
use crate::storage::users::{get_all_users, upsert_user};
use crate::storage::{get_connection, DbPool, UserProfile, UserRecord};

#[derive(Clone)]
pub struct UserDirectory {
    db_pool: Arc<DbPool>,
}

impl UserDirectory {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Records an interaction in the background.
    ///
    /// The caller never waits on this; failures only reach the log.
    pub fn record_interaction(&self, profile: UserProfile) -> JoinHandle<()> {
        let directory = self.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = directory.upsert(&profile, Utc::now()) {
                log::error!("Failed to track user {}: {}", profile.user_id, e);
            }
        })
    }

    pub fn upsert(&self, profile: &UserProfile, now: DateTime<Utc>) -> AppResult<()> {
        let conn = get_connection(&self.db_pool)?;
        upsert_user(&conn, profile, now)?;
        Ok(())
    }

    pub fn all_users(&self) -> AppResult<Vec<UserRecord>> {
        let conn = get_connection(&self.db_pool)?;
        Ok(get_all_users(&conn)?)
    }
}
