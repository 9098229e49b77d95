//! File Store Bot - Telegram bot that keeps uploads in a storage channel
//!
//! Every file sent to the bot is forwarded into a channel, recorded in SQLite
//! and answered with a deep-link; opening the link forwards the stored copy
//! back to whoever clicked it.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging and formatting helpers
//! - `storage`: Database pool, users and stored files
//! - `telegram`: Telegram bot integration and handlers

pub mod cli;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use self::core::{config, AppError, ShareError};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
pub use telegram::{schema, HandlerDeps};
