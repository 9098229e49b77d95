use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use teloxide::update_listeners::Polling;

use filestore_bot::cli::{Cli, Commands};
use filestore_bot::core::{config, init_logger};
use filestore_bot::storage::create_pool;
use filestore_bot::telegram::guard::setup_instructions;
use filestore_bot::telegram::{
    create_bot, parse_channel, schema, setup_bot_commands, Bot, ChannelAccessGuard, HandlerDeps, Messenger,
};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation)
/// or the storage channel is not usable.
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env before any config is read
    let _ = dotenv();

    let cli = Cli::parse_args();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_bot().await,
        Commands::CheckChannel => check_channel().await,
    }
}

fn configured_channel() -> Result<Recipient> {
    parse_channel(&config::CHANNEL).ok_or_else(|| anyhow::anyhow!("CHANNEL is not set"))
}

/// Runs the startup guard; logs and prints setup instructions on failure
async fn ensure_channel_ready(bot: &Bot, channel: &Recipient) -> Result<()> {
    let guard = ChannelAccessGuard::new(bot.clone(), channel.clone());
    if let Err(e) = guard.ensure_ready().await {
        log::error!("Bot startup failed: {}", e);
        eprintln!("{}", setup_instructions(&config::CHANNEL));
        return Err(e.into());
    }
    log::info!("Channel access verified for {}", *config::CHANNEL);
    Ok(())
}

async fn check_channel() -> Result<()> {
    let bot = create_bot()?;
    let channel = configured_channel()?;
    ensure_channel_ready(&bot, &channel).await?;
    println!("✅ Storage channel {} is ready", *config::CHANNEL);
    Ok(())
}

async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    let bot = create_bot()?;
    let channel = configured_channel()?;

    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH)?);
    log::info!("Database ready at {}", *config::DATABASE_PATH);

    let me = bot.bot_identity().await?;
    log::info!("Authorized as @{} ({})", me.username, me.id.0);

    ensure_channel_ready(&bot, &channel).await?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    if config::admin::ADMIN_IDS.is_empty() {
        log::warn!("No ADMIN_ID configured; /logs and /users are disabled");
    }

    let deps = HandlerDeps::new(
        db_pool,
        channel,
        config::admin::ADMIN_IDS.clone(),
        config::LOG_FILE_PATH.clone(),
    )
    .with_bot_username(&me.username);

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    log::info!("🚀 Bot started successfully");
    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
