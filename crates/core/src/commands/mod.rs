//! Chat command surface.
//!
//! The router parses prefixed lines and dispatches to handlers. Only
//! `.random`/`.cancel` carry real machinery (the search engine); the
//! remaining commands are single-call wrappers around the catalog client.

mod asset;
mod help;
mod parse;
mod prefs;
mod random;
mod render;

pub use parse::{parse_line, parse_random_args, CommandLine, RandomArgs};
pub use render::{format_asset_details, format_stats};

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::catalog::{CatalogClient, CatalogError};
use crate::metrics;
use crate::prefs::{PreferenceStore, PrefsError};
use crate::search::{ActiveSearches, EngineConfig};
use crate::state::LastAssetTracker;
use crate::transport::{ChatTransport, TransportError};

/// Errors surfaced to the user by command handlers.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid input: {0}")]
    Parse(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to save preferences: {0}")]
    Prefs(#[from] PrefsError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Everything command handlers need, injected once at startup.
pub struct BotContext {
    pub catalog: Arc<dyn CatalogClient>,
    pub transport: Arc<dyn ChatTransport>,
    pub prefs: Arc<dyn PreferenceStore>,
    pub searches: Arc<ActiveSearches>,
    pub last_assets: Arc<LastAssetTracker>,
    pub engine_config: EngineConfig,
    /// Non-matching-draw ceiling applied to every search.
    pub max_rejections: u32,
    pub command_prefix: String,
}

/// Parses incoming chat lines and runs the matching handler.
pub struct CommandRouter {
    ctx: Arc<BotContext>,
}

impl CommandRouter {
    pub fn new(ctx: Arc<BotContext>) -> Self {
        Self { ctx }
    }

    /// Handle one incoming chat line. Lines without the command prefix
    /// are ignored; handler errors become a chat reply, never a crash.
    pub async fn dispatch(&self, user_id: &str, channel: &str, line: &str) {
        let Some(cmd) = parse_line(&self.ctx.command_prefix, line) else {
            return;
        };

        let result = self.route(&cmd, user_id, channel).await;

        let status = match &result {
            Ok(()) => "ok",
            Err(CommandError::Rejected(_)) => "rejected",
            Err(_) => "error",
        };
        metrics::COMMANDS_TOTAL
            .with_label_values(&[&cmd.name, status])
            .inc();

        if let Err(err) = result {
            warn!(command = %cmd.name, user = user_id, "Command failed: {}", err);
            let text = format!("❌ {}", err);
            if let Err(e) = self.ctx.transport.send_message(channel, &text).await {
                warn!("Failed to report command error: {}", e);
            }
        }
    }

    async fn route(
        &self,
        cmd: &CommandLine,
        user_id: &str,
        channel: &str,
    ) -> Result<(), CommandError> {
        match cmd.name.as_str() {
            "random" => random::handle_random(&self.ctx, user_id, channel, &cmd.args).await,
            "cancel" => random::handle_cancel(&self.ctx, user_id, channel).await,
            "get" => {
                let id = cmd
                    .args
                    .first()
                    .ok_or(CommandError::MissingArgument("asset id"))?;
                asset::handle_get(&self.ctx, user_id, channel, id).await
            }
            "favorite" => {
                let target = cmd
                    .args
                    .first()
                    .ok_or(CommandError::MissingArgument("asset id or 'last'"))?;
                asset::handle_favorite(&self.ctx, user_id, channel, target, true).await
            }
            "unfavorite" => {
                let target = cmd
                    .args
                    .first()
                    .ok_or(CommandError::MissingArgument("asset id or 'last'"))?;
                asset::handle_favorite(&self.ctx, user_id, channel, target, false).await
            }
            "delete" => {
                let target = cmd
                    .args
                    .first()
                    .ok_or(CommandError::MissingArgument("asset id or 'last'"))?;
                asset::handle_delete(&self.ctx, user_id, channel, target).await
            }
            "stats" => asset::handle_stats(&self.ctx, channel).await,
            "prefs" => prefs::handle_prefs(&self.ctx, user_id, channel, &cmd.args).await,
            "help" => help::handle_help(&self.ctx, user_id, channel).await,
            "helppref" => help::handle_pref_help(&self.ctx, channel).await,
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MediaType, ServerStats};
    use crate::prefs::Preferences;
    use crate::testing::{fixtures, MockCatalogClient, MockTransport};

    pub(super) struct Harness {
        pub catalog: Arc<MockCatalogClient>,
        pub transport: Arc<MockTransport>,
        pub router: CommandRouter,
        pub ctx: Arc<BotContext>,
        _temp_dir: tempfile::TempDir,
    }

    pub(super) fn harness() -> Harness {
        let catalog = Arc::new(MockCatalogClient::new());
        let transport = Arc::new(MockTransport::new());
        let prefs_dir = tempfile::TempDir::new().unwrap();
        let prefs = Arc::new(
            crate::prefs::JsonPreferenceStore::open(prefs_dir.path().join("prefs.json"))
                .unwrap(),
        );

        let ctx = Arc::new(BotContext {
            catalog: catalog.clone() as Arc<dyn CatalogClient>,
            transport: transport.clone() as Arc<dyn ChatTransport>,
            prefs,
            searches: Arc::new(ActiveSearches::new()),
            last_assets: Arc::new(LastAssetTracker::new()),
            engine_config: EngineConfig { backoff_base_ms: 1, backoff_cap_ms: 2 },
            max_rejections: 50,
            command_prefix: ".".to_string(),
        });

        Harness {
            catalog,
            transport,
            router: CommandRouter::new(ctx.clone()),
            ctx,
            _temp_dir: prefs_dir,
        }
    }

    #[tokio::test]
    async fn test_plain_chat_is_ignored() {
        let h = harness();
        h.router.dispatch("alice", "chan", "just chatting").await;
        assert!(h.transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_reports_error() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".frobnicate").await;
        let text = h.transport.last_text().unwrap();
        assert!(text.contains("Unknown command"));
    }

    #[tokio::test]
    async fn test_stats_command() {
        let h = harness();
        h.catalog.set_stats(ServerStats {
            photos: 10,
            videos: 2,
            usage_bytes: None,
        });

        h.router.dispatch("alice", "chan", ".stats").await;
        let text = h.transport.last_text().unwrap();
        assert!(text.contains("**Total Assets:** 12"));
    }

    #[tokio::test]
    async fn test_get_command_sends_attachment() {
        let h = harness();
        let asset = fixtures::asset_with_id(
            "11111111-2222-3333-4444-555555555555",
            MediaType::Image,
            1_000_000,
        );
        h.catalog.insert_asset(asset.clone());

        h.router
            .dispatch("alice", "chan", &format!(".get {}", asset.id))
            .await;

        let sent = h.transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].attachment.is_some());
        assert!(sent[0].text.contains(&asset.id));
        // The asset becomes the 'last' target.
        assert_eq!(
            h.ctx.last_assets.get("alice").unwrap().asset_id,
            asset.id
        );
    }

    #[tokio::test]
    async fn test_get_oversized_asset_sends_details_only() {
        let h = harness();
        // 30 MB against the default basic tier's 25 MB ceiling.
        let asset = fixtures::asset_with_id("big-1", MediaType::Video, 30_000_000);
        h.catalog.insert_asset(asset);

        h.router.dispatch("alice", "chan", ".get big-1").await;

        let sent = h.transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].attachment.is_none());
        assert!(sent[0].text.contains("too large"));
    }

    #[tokio::test]
    async fn test_favorite_last_without_history() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".favorite last").await;
        let text = h.transport.last_text().unwrap();
        assert!(text.contains("No asset has been fetched yet"));
        assert!(h.catalog.favorite_calls().is_empty());
    }

    #[tokio::test]
    async fn test_favorite_and_unfavorite_by_id() {
        let h = harness();
        h.catalog
            .insert_asset(fixtures::asset_with_id("a-1", MediaType::Image, 1_000));

        h.router.dispatch("alice", "chan", ".favorite a-1").await;
        h.router.dispatch("alice", "chan", ".unfavorite a-1").await;

        assert_eq!(
            h.catalog.favorite_calls(),
            vec![("a-1".to_string(), true), ("a-1".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_delete_last_clears_tracker() {
        let h = harness();
        h.catalog
            .insert_asset(fixtures::asset_with_id("a-1", MediaType::Image, 1_000));
        h.ctx
            .last_assets
            .set("alice", "a-1", Some("msg-7".to_string()));

        h.router.dispatch("alice", "chan", ".delete last").await;

        assert_eq!(h.catalog.deleted_ids(), vec!["a-1".to_string()]);
        assert!(h.ctx.last_assets.get("alice").is_none());
        // The chat message carrying the asset is deleted too.
        assert_eq!(h.transport.deleted(), vec!["msg-7".to_string()]);
    }

    #[tokio::test]
    async fn test_prefs_set_and_show() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".prefs set mt image").await;
        h.router.dispatch("alice", "chan", ".prefs set min 2mb").await;

        let stored = h.ctx.prefs.load("alice");
        assert_eq!(stored.default_media_type, Some(MediaType::Image));
        assert_eq!(stored.min_size_bytes, Some(2_000_000));

        h.router.dispatch("alice", "chan", ".prefs").await;
        let text = h.transport.last_text().unwrap();
        assert!(text.contains("2.00 MB"));
    }

    #[tokio::test]
    async fn test_prefs_reset() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".prefs set attempts 9").await;
        assert_eq!(h.ctx.prefs.load("alice").max_attempts, 9);

        h.router.dispatch("alice", "chan", ".prefs reset").await;
        assert_eq!(h.ctx.prefs.load("alice"), Preferences::default());
    }

    #[tokio::test]
    async fn test_help_commands() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".help").await;
        assert!(h.transport.last_text().unwrap().contains("SHUFFLEBOT HELP"));

        h.router.dispatch("alice", "chan", ".helppref").await;
        assert!(h
            .transport
            .last_text()
            .unwrap()
            .contains("Preference Settings Help"));
    }

    #[tokio::test]
    async fn test_cancel_without_search() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".cancel").await;
        let text = h.transport.last_text().unwrap();
        assert!(text.contains("No active search"));
    }
}
