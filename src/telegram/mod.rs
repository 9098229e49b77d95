//! Telegram bot integration and handlers

pub mod admin;
pub mod attachment;
pub mod bot;
pub mod directory;
pub mod guard;
pub mod handlers;
pub mod links;
pub mod messenger;
pub mod registry;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use teloxide::Bot;

// Re-exports for convenience
pub use bot::{create_bot, parse_channel, setup_bot_commands, Command};
pub use guard::ChannelAccessGuard;
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use messenger::Messenger;
