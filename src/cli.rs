use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "filestore-bot")]
#[command(author, version, about = "Telegram bot that stores files in a channel and shares them by link", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Only verify access to the storage channel, then exit
    CheckChannel,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
