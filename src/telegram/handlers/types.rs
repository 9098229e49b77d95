//! Handler types, dependencies, and user tracking helpers

use std::sync::Arc;

use teloxide::types::{Message, Recipient};

use crate::storage::{DbPool, UserProfile};
use crate::telegram::directory::UserDirectory;
use crate::telegram::registry::FileRegistry;
use crate::telegram::resolver::LinkResolver;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<DbPool>,
    pub registry: Arc<FileRegistry>,
    pub resolver: Arc<LinkResolver>,
    pub users: UserDirectory,
    pub channel: Recipient,
    pub admin_ids: Arc<Vec<i64>>,
    pub log_file_path: String,
}

impl HandlerDeps {
    /// Wires the file workflow around one pool and one storage channel.
    pub fn new(db_pool: Arc<DbPool>, channel: Recipient, admin_ids: Vec<i64>, log_file_path: String) -> Self {
        Self {
            registry: Arc::new(FileRegistry::new(Arc::clone(&db_pool), channel.clone())),
            resolver: Arc::new(LinkResolver::new(Arc::clone(&db_pool), channel.clone())),
            users: UserDirectory::new(Arc::clone(&db_pool)),
            db_pool,
            channel,
            admin_ids: Arc::new(admin_ids),
            log_file_path,
        }
    }

    /// Seeds the registry with the username fetched at startup.
    pub fn with_bot_username(mut self, username: &str) -> Self {
        let registry = FileRegistry::new(Arc::clone(&self.db_pool), self.channel.clone()).with_bot_username(username);
        self.registry = Arc::new(registry);
        self
    }
}

/// Records the sender in the user directory without waiting for it.
pub fn track_sender(deps: &HandlerDeps, msg: &Message) {
    if let Some(profile) = UserProfile::from_message(msg) {
        deps.users.record_interaction(profile);
    }
}
