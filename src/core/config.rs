//! Configuration constants for the bot

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Storage channel where uploaded files are relayed
/// Read from CHANNEL environment variable
/// Accepts `@username`, a bare username or a numeric chat id (`-100...`)
pub static CHANNEL: Lazy<String> = Lazy::new(|| env::var("CHANNEL").unwrap_or_else(|_| String::new()));

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: filestore.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "filestore.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: combined.log (also the file shipped by /logs)
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "combined.log".to_string()));

/// Custom Bot API server URL (local Bot API server)
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_API_URL").ok());

/// Network configuration
pub mod network {
    use super::{env, Duration, Lazy};

    /// Default request timeout for Bot API calls (in seconds)
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout for Bot API calls
    /// Read from REQUEST_TIMEOUT_SECS environment variable
    pub static REQUEST_TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    });

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(*REQUEST_TIMEOUT_SECS)
    }
}

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    pub(crate) fn parse_admin_ids(raw: &str) -> Vec<i64> {
        raw.split([',', ' ', '\n', '\t'])
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect()
    }

    /// Admin user IDs
    /// Read from ADMIN_ID and ADMIN_IDS (comma-separated) environment variables
    pub static ADMIN_IDS: Lazy<Vec<i64>> = Lazy::new(|| {
        let mut ids = env::var("ADMIN_ID")
            .ok()
            .map(|raw| parse_admin_ids(&raw))
            .unwrap_or_default();
        if let Ok(raw) = env::var("ADMIN_IDS") {
            for id in parse_admin_ids(&raw) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    });
}

/// Link configuration
pub mod links {
    /// Start-parameter prefix marking a file share deep-link
    pub const FILE_START_PREFIX: &str = "file_";

    /// Base URL for t.me links
    pub const TELEGRAM_BASE_URL: &str = "https://t.me";
}
