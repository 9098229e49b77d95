//! Database access: connection pool, users and stored files

pub mod db;
pub mod files;
pub mod users;

// Re-exports for convenience
pub use db::{create_pool, get_connection, DbConnection, DbPool};
pub use files::FileRecord;
pub use users::{UserProfile, UserRecord};
