//! The `.random` and `.cancel` handlers.

use std::sync::Arc;

use tracing::{info, warn};

use crate::metrics;
use crate::policy::effective_max_bytes;
use crate::search::{
    CatalogFetcher, ProgressReporter, SearchEngine, SearchReport, SearchSession, SearchStatus,
    SessionLimits,
};
use crate::transport::Attachment;

use super::parse::parse_random_args;
use super::render::format_asset_details;
use super::{BotContext, CommandError};

/// Start a randomized asset search.
///
/// Filters come from the arguments, falling back to the user's stored
/// preferences; the effective size ceiling is the account tier's. The
/// search itself runs on its own task so the chat loop stays responsive
/// and `.cancel` can reach it.
pub async fn handle_random(
    ctx: &Arc<BotContext>,
    user_id: &str,
    channel: &str,
    args: &[String],
) -> Result<(), CommandError> {
    let parsed = parse_random_args(args)?;
    let prefs = ctx.prefs.load(user_id);

    let filters = crate::search::SearchFilters {
        media: parsed.media.or(prefs.default_media_type),
        min_size_bytes: parsed.min_size_bytes.or(prefs.min_size_bytes),
        max_size_bytes: parsed.max_size_bytes.or(prefs.max_size_bytes),
        count: parsed.count.unwrap_or(1),
    }
    .clamp_count();

    let effective_max = effective_max_bytes(filters.max_size_bytes, prefs.account_tier);
    filters
        .validate(effective_max)
        .map_err(|e| CommandError::Parse(e.to_string()))?;

    let guard = ctx.searches.begin(user_id).ok_or_else(|| {
        CommandError::Rejected(format!(
            "A search is already running — use {}cancel first",
            ctx.command_prefix
        ))
    })?;

    let session = SearchSession::new(
        user_id,
        filters,
        effective_max,
        SessionLimits {
            max_fetch_failures: prefs.max_attempts.max(1),
            max_rejections: ctx.max_rejections,
        },
        guard.cancel_flag(),
    );

    let ctx = Arc::clone(ctx);
    let channel = channel.to_string();
    let user_id = user_id.to_string();
    let interval = prefs.progress_update_interval;

    tokio::spawn(async move {
        // The guard lives for the whole task; dropping it (normal return
        // or panic unwind) unregisters the search.
        let _guard = guard;

        let fetcher = Arc::new(CatalogFetcher::new(Arc::clone(&ctx.catalog)));
        let engine = SearchEngine::new(fetcher, ctx.engine_config);
        let mut reporter =
            ProgressReporter::new(Arc::clone(&ctx.transport), channel.clone(), interval);

        let report = engine.run(session, &mut reporter).await;
        deliver_results(&ctx, &user_id, &channel, &report).await;
    });

    Ok(())
}

/// Cancel the user's running search, if any.
pub async fn handle_cancel(
    ctx: &Arc<BotContext>,
    user_id: &str,
    channel: &str,
) -> Result<(), CommandError> {
    if !ctx.searches.cancel(user_id) {
        return Err(CommandError::Rejected(
            "No active search to cancel".to_string(),
        ));
    }
    info!(user = user_id, "Cancellation requested");
    ctx.transport
        .send_message(channel, "🛑 Cancelling search...")
        .await?;
    Ok(())
}

/// Upload the accepted assets to the channel.
///
/// Partial results from exhausted or cancelled searches are delivered
/// too; an aborted search delivers nothing (the terminal report already
/// told the user it could not run).
async fn deliver_results(
    ctx: &Arc<BotContext>,
    user_id: &str,
    channel: &str,
    report: &SearchReport,
) {
    if matches!(report.status, SearchStatus::Aborted { .. }) {
        return;
    }

    for asset in &report.assets {
        let details = format_asset_details(asset);

        let message_id = match ctx.catalog.fetch_asset_data(&asset.id).await {
            Ok(bytes) => {
                let attachment = Attachment {
                    file_name: asset.file_name.clone(),
                    bytes,
                };
                match ctx
                    .transport
                    .send_attachment(channel, &details, attachment)
                    .await
                {
                    Ok(id) => {
                        metrics::ASSETS_SERVED.inc();
                        Some(id)
                    }
                    Err(e) => {
                        warn!(asset = %asset.id, "Failed to upload asset: {}", e);
                        None
                    }
                }
            }
            Err(e) => {
                warn!(asset = %asset.id, "Failed to download asset: {}", e);
                let text = format!("{}\n\n⚠️ Could not download the file: {}", details, e);
                ctx.transport.send_message(channel, &text).await.ok()
            }
        };

        ctx.last_assets.set(user_id, &asset.id, message_id);
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::harness;
    use crate::testing::fixtures;
    use std::time::Duration;

    async fn wait_until_idle(h: &super::super::tests::Harness, user: &str) {
        for _ in 0..200 {
            if !h.ctx.searches.is_active(user) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("search never finished");
    }

    #[tokio::test]
    async fn test_random_delivers_assets() {
        let h = harness();
        let a = fixtures::image_asset(1_000_000);
        let b = fixtures::image_asset(2_000_000);
        h.catalog.insert_asset(a.clone());
        h.catalog.insert_asset(b.clone());
        h.catalog.push_random(Ok(a.clone()));
        h.catalog.push_random(Ok(b.clone()));

        h.router.dispatch("alice", "chan", ".random count:2").await;
        wait_until_idle(&h, "alice").await;

        let sent = h.transport.sent();
        let attachments: Vec<_> = sent.iter().filter(|m| m.attachment.is_some()).collect();
        assert_eq!(attachments.len(), 2);
        // Last-asset tracking points at the final delivery.
        assert_eq!(h.ctx.last_assets.get("alice").unwrap().asset_id, b.id);
    }

    #[tokio::test]
    async fn test_random_rejects_concurrent_search() {
        let h = harness();
        // Hold a registration for alice, as a running search would.
        let _guard = h.ctx.searches.begin("alice").unwrap();

        h.router.dispatch("alice", "chan", ".random").await;

        let text = h.transport.last_text().unwrap();
        assert!(text.contains("already running"));
    }

    #[tokio::test]
    async fn test_random_invalid_filters_never_start() {
        let h = harness();
        h.router
            .dispatch("alice", "chan", ".random min:5mb max:2mb")
            .await;

        assert!(h.transport.last_text().unwrap().contains("❌"));
        // Nothing was registered or fetched.
        assert!(!h.ctx.searches.is_active("alice"));
    }

    #[tokio::test]
    async fn test_random_applies_media_filter() {
        let h = harness();
        let video = fixtures::video_asset(1_000_000);
        let image = fixtures::image_asset(1_000_000);
        h.catalog.insert_asset(video.clone());
        h.catalog.insert_asset(image.clone());
        h.catalog.push_random(Ok(video));
        h.catalog.push_random(Ok(image.clone()));

        h.router.dispatch("alice", "chan", ".random image").await;
        wait_until_idle(&h, "alice").await;

        // Only the image was delivered.
        let attachments: Vec<_> = h
            .transport
            .sent()
            .into_iter()
            .filter(|m| m.attachment.is_some())
            .collect();
        assert_eq!(attachments.len(), 1);
        assert!(attachments[0].text.contains(&image.id));
    }

    #[tokio::test]
    async fn test_random_uses_preference_defaults() {
        let h = harness();
        h.router
            .dispatch("alice", "chan", ".prefs set mt video")
            .await;

        let image = fixtures::image_asset(1_000_000);
        let video = fixtures::video_asset(2_000_000);
        h.catalog.insert_asset(image.clone());
        h.catalog.insert_asset(video.clone());
        h.catalog.push_random(Ok(image));
        h.catalog.push_random(Ok(video.clone()));

        h.router.dispatch("alice", "chan", ".random").await;
        wait_until_idle(&h, "alice").await;

        let attachments: Vec<_> = h
            .transport
            .sent()
            .into_iter()
            .filter(|m| m.attachment.is_some())
            .collect();
        assert_eq!(attachments.len(), 1);
        assert!(attachments[0].text.contains(&video.id));
        assert!(attachments[0].text.contains("Type: video"));
    }
}
