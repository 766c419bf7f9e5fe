//! Help commands.

use std::sync::Arc;

use super::render::{format_help, format_pref_help};
use super::{BotContext, CommandError};

pub async fn handle_help(
    ctx: &Arc<BotContext>,
    user_id: &str,
    channel: &str,
) -> Result<(), CommandError> {
    let prefs = ctx.prefs.load(user_id);
    ctx.transport
        .send_message(channel, &format_help(&ctx.command_prefix, &prefs))
        .await?;
    Ok(())
}

pub async fn handle_pref_help(
    ctx: &Arc<BotContext>,
    channel: &str,
) -> Result<(), CommandError> {
    ctx.transport
        .send_message(channel, &format_pref_help(&ctx.command_prefix))
        .await?;
    Ok(())
}
