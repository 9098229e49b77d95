use thiserror::Error;

/// Centralized error types for the application
///
/// Infrastructure failures (database, Bot API, IO) are converted to this enum.
/// Uses `thiserror` for automatic error conversion and display formatting.
///
/// # Example
///
/// ```no_run
/// use filestore_bot::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Database connection pool errors
    #[error("Database pool error: {0}")]
    DatabasePool(#[from] r2d2::Error),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage channel cannot be used by the bot
    #[error("Channel access check failed: {0}")]
    ChannelAccess(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Failures of the file sharing workflow.
///
/// Every variant maps to exactly one short message shown to the user; the
/// underlying cause is logged at the handler boundary and not propagated.
#[derive(Error, Debug)]
pub enum ShareError {
    /// The message carries no document, audio, video or photo
    #[error("message has no attachment")]
    NoAttachment,

    /// The storage channel could not be resolved
    #[error("storage channel unavailable: {0}")]
    ChannelUnavailable(#[source] teloxide::RequestError),

    /// Forwarding the upload into the storage channel failed
    #[error("relay to storage channel failed: {0}")]
    RelayFailed(#[source] teloxide::RequestError),

    /// The file record could not be read or written
    #[error("persistence failed: {0}")]
    PersistenceFailed(#[source] AppError),

    /// No file is registered under the requested identifier
    #[error("no file registered under '{0}'")]
    LinkExpired(String),

    /// Forwarding the stored copy to the requester failed
    #[error("delivery failed: {0}")]
    DeliveryFailed(#[source] teloxide::RequestError),

    /// A non-admin invoked an admin-only command
    #[error("user {0} is not an admin")]
    PermissionDenied(i64),
}

impl ShareError {
    /// Short chat message shown to the user for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            ShareError::NoAttachment => "❌ Please send a valid file",
            ShareError::ChannelUnavailable(_) => {
                "❌ Sorry, there was an error accessing the storage channel. Please contact the admin."
            }
            ShareError::RelayFailed(_) | ShareError::PersistenceFailed(_) => {
                "❌ Error processing your file. Please try again."
            }
            ShareError::LinkExpired(_) => "❌ Sorry, this file is no longer available.",
            ShareError::DeliveryFailed(_) => "❌ Error retrieving the file. Please try again.",
            ShareError::PermissionDenied(_) => "⛔ This command is only available to admin",
        }
    }
}

impl From<rusqlite::Error> for ShareError {
    fn from(err: rusqlite::Error) -> Self {
        ShareError::PersistenceFailed(AppError::Database(err))
    }
}

impl From<r2d2::Error> for ShareError {
    fn from(err: r2d2::Error) -> Self {
        ShareError::PersistenceFailed(AppError::DatabasePool(err))
    }
}
