//! Single-call asset command handlers: `.get`, `.favorite`, `.unfavorite`,
//! `.delete`, `.stats`.

use std::sync::Arc;

use tracing::warn;

use crate::metrics;
use crate::policy::format_size;
use crate::state::LastAsset;
use crate::transport::Attachment;

use super::render::{format_asset_details, format_stats};
use super::{BotContext, CommandError};

/// Resolve an `<asset_id|last>` argument.
fn resolve_target(
    ctx: &BotContext,
    user_id: &str,
    target: &str,
) -> Result<LastAsset, CommandError> {
    if target.eq_ignore_ascii_case("last") {
        ctx.last_assets.get(user_id).ok_or_else(|| {
            CommandError::Rejected("No asset has been fetched yet".to_string())
        })
    } else {
        Ok(LastAsset {
            asset_id: target.to_string(),
            message_id: None,
        })
    }
}

/// Fetch and display a specific asset by id.
pub async fn handle_get(
    ctx: &Arc<BotContext>,
    user_id: &str,
    channel: &str,
    id: &str,
) -> Result<(), CommandError> {
    let asset = ctx.catalog.fetch_asset(id).await?;
    let details = format_asset_details(&asset);

    let ceiling = ctx.prefs.load(user_id).account_tier.max_bytes();
    let message_id = if asset.size_bytes > ceiling {
        let text = format!(
            "{}\n\n⚠️ File too large to upload (Size: {}, Limit: {})",
            details,
            format_size(asset.size_bytes),
            format_size(ceiling),
        );
        ctx.transport.send_message(channel, &text).await?
    } else {
        let bytes = ctx.catalog.fetch_asset_data(&asset.id).await?;
        let id = ctx
            .transport
            .send_attachment(
                channel,
                &details,
                Attachment {
                    file_name: asset.file_name.clone(),
                    bytes,
                },
            )
            .await?;
        metrics::ASSETS_SERVED.inc();
        id
    };

    ctx.last_assets.set(user_id, &asset.id, Some(message_id));
    Ok(())
}

/// Mark or unmark an asset as favorite. Accepts `last`.
pub async fn handle_favorite(
    ctx: &Arc<BotContext>,
    user_id: &str,
    channel: &str,
    target: &str,
    favorite: bool,
) -> Result<(), CommandError> {
    let resolved = resolve_target(ctx, user_id, target)?;
    ctx.catalog.set_favorite(&resolved.asset_id, favorite).await?;

    let text = if favorite {
        format!("Asset {} has been marked as favorite.", resolved.asset_id)
    } else {
        format!("Asset {} has been removed from favorites.", resolved.asset_id)
    };
    ctx.transport.send_message(channel, &text).await?;
    Ok(())
}

/// Delete an asset from the catalog. Accepts `last`, in which case the
/// chat message that carried the asset is removed as well.
pub async fn handle_delete(
    ctx: &Arc<BotContext>,
    user_id: &str,
    channel: &str,
    target: &str,
) -> Result<(), CommandError> {
    let resolved = resolve_target(ctx, user_id, target)?;

    if let Some(message_id) = &resolved.message_id {
        if let Err(e) = ctx.transport.delete_message(channel, message_id).await {
            warn!("Failed to delete chat message {}: {}", message_id, e);
        }
    }

    ctx.catalog.delete_asset(&resolved.asset_id).await?;
    ctx.last_assets.clear_if(user_id, &resolved.asset_id);

    let text = format!("Asset {} has been deleted.", resolved.asset_id);
    ctx.transport.send_message(channel, &text).await?;
    Ok(())
}

/// Display server statistics.
pub async fn handle_stats(ctx: &Arc<BotContext>, channel: &str) -> Result<(), CommandError> {
    let stats = ctx.catalog.server_stats().await?;
    ctx.transport
        .send_message(channel, &format_stats(&stats))
        .await?;
    Ok(())
}
