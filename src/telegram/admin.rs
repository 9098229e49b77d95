//! Admin-only commands: /users and /logs

use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};

use crate::core::error::ShareError;
use crate::storage::UserRecord;
use crate::telegram::directory::UserDirectory;

pub const USERS_REPORT_FILE_NAME: &str = "users_list.txt";
pub const LOGS_REPORT_FILE_NAME: &str = "bot_logs.txt";

pub fn is_admin(user_id: i64, admin_ids: &[i64]) -> bool {
    admin_ids.contains(&user_id)
}

pub fn ensure_admin(user_id: i64, admin_ids: &[i64]) -> Result<(), ShareError> {
    if is_admin(user_id, admin_ids) {
        Ok(())
    } else {
        Err(ShareError::PermissionDenied(user_id))
    }
}

/// Plain-text listing of every known user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReport {
    pub total: usize,
    pub body: String,
}

impl UserReport {
    pub fn caption(&self) -> String {
        format!("📋 Total Users: {}", self.total)
    }
}

pub fn format_user_report(users: &[UserRecord]) -> String {
    users
        .iter()
        .map(|user| {
            format!(
                "👤 User Details:\nID: {}\nUsername: @{}\nName: {} {}\nJoined: {}\n",
                user.user_id,
                user.username.as_deref().unwrap_or("N/A"),
                user.first_name.as_deref().unwrap_or_default(),
                user.last_name.as_deref().unwrap_or_default(),
                user.join_date.format("%Y-%m-%d")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the user report; non-admins are refused before the database is read.
pub fn load_user_report(
    users: &UserDirectory,
    requester: i64,
    admin_ids: &[i64],
) -> Result<UserReport, ShareError> {
    ensure_admin(requester, admin_ids)?;
    let users = users.all_users().map_err(ShareError::PersistenceFailed)?;
    Ok(UserReport {
        total: users.len(),
        body: format_user_report(&users),
    })
}

/// Handle /users command
pub async fn handle_users_command(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    users: &UserDirectory,
    admin_ids: &[i64],
) -> ResponseResult<()> {
    let report = match load_user_report(users, user_id, admin_ids) {
        Ok(report) => report,
        Err(e @ ShareError::PermissionDenied(_)) => {
            log::warn!("User {} tried to access /users without permission", user_id);
            bot.send_message(chat_id, e.user_message()).await?;
            return Ok(());
        }
        Err(e) => {
            log::error!("Error fetching users: {}", e);
            bot.send_message(chat_id, "❌ Error retrieving users list").await?;
            return Ok(());
        }
    };

    bot.send_message(chat_id, "📊 *Generating users report\\.\\.\\.*")
        .parse_mode(ParseMode::MarkdownV2)
        .await?;

    let body = if report.body.is_empty() {
        "No users yet\n".to_string()
    } else {
        report.body.clone()
    };
    bot.send_document(
        chat_id,
        InputFile::memory(body.into_bytes()).file_name(USERS_REPORT_FILE_NAME),
    )
    .caption(report.caption())
    .await?;

    log::info!("Sent users report ({} users) to admin {}", report.total, user_id);
    Ok(())
}

/// Handle /logs command
pub async fn handle_logs_command(
    bot: &Bot,
    chat_id: ChatId,
    user_id: i64,
    log_file_path: &str,
    admin_ids: &[i64],
) -> ResponseResult<()> {
    if let Err(e) = ensure_admin(user_id, admin_ids) {
        log::warn!("User {} tried to access /logs without permission", user_id);
        bot.send_message(chat_id, e.user_message()).await?;
        return Ok(());
    }

    let logs = match tokio::fs::read(log_file_path).await {
        Ok(bytes) if !bytes.is_empty() => bytes,
        Ok(_) => {
            bot.send_message(chat_id, "📭 Log file is empty").await?;
            return Ok(());
        }
        Err(e) => {
            log::error!("Error reading log file {}: {}", log_file_path, e);
            bot.send_message(chat_id, "❌ Error retrieving logs").await?;
            return Ok(());
        }
    };

    bot.send_message(chat_id, "📊 *Generating logs report\\.\\.\\.*")
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    bot.send_document(chat_id, InputFile::memory(logs).file_name(LOGS_REPORT_FILE_NAME))
        .caption("📋 Here are the bot logs")
        .await?;

    log::info!("Sent log file to admin {}", user_id);
    Ok(())
}
