mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shufflebot_core::{
    load_config, validate_config, ActiveSearches, BotContext, CatalogClient, ChatTransport,
    CommandRouter, EngineConfig, HttpCatalogClient, JsonPreferenceStore, LastAssetTracker,
    PreferenceStore, SanitizedConfig,
};

use console::ConsoleTransport;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User and channel identity of the local console session.
const CONSOLE_USER: &str = "console";
const CONSOLE_CHANNEL: &str = "console";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("shufflebot {}", VERSION);

    // Determine config path
    let config_path = std::env::var("SHUFFLEBOT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!("Configuration loaded successfully");
    info!("Catalog URL: {}", sanitized.catalog.base_url);
    info!(
        "Admin credential configured: {}",
        sanitized.catalog.admin_api_key_configured
    );

    // Create catalog client
    let catalog: Arc<dyn CatalogClient> = Arc::new(
        HttpCatalogClient::new(config.catalog.clone())
            .context("Failed to create catalog client")?,
    );
    info!("Catalog client initialized");

    // Open preference store (loads the document once at boot)
    let prefs: Arc<dyn PreferenceStore> = Arc::new(
        JsonPreferenceStore::open(&config.bot.preferences_path)
            .context("Failed to open preference store")?,
    );
    info!("Preference store: {:?}", config.bot.preferences_path);

    // Create the console transport
    let transport: Arc<dyn ChatTransport> =
        Arc::new(ConsoleTransport::new(&config.bot.downloads_dir));

    // Wire up the command router
    let ctx = Arc::new(BotContext {
        catalog,
        transport,
        prefs,
        searches: Arc::new(ActiveSearches::new()),
        last_assets: Arc::new(LastAssetTracker::new()),
        engine_config: EngineConfig {
            backoff_base_ms: config.search.backoff_base_ms,
            backoff_cap_ms: config.search.backoff_cap_ms,
        },
        max_rejections: config.search.max_rejections,
        command_prefix: config.bot.command_prefix.clone(),
    });
    let router = CommandRouter::new(ctx);

    println!(
        "shufflebot ready — type {}help for commands, Ctrl-C to quit",
        config.bot.command_prefix
    );

    // Read console lines until EOF or shutdown signal
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = shutdown_signal() => {
                info!("Shutdown signal received");
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        router.dispatch(CONSOLE_USER, CONSOLE_CHANNEL, &line).await;
                    }
                    Ok(None) => {
                        info!("Console input closed");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read console input: {}", e);
                        break;
                    }
                }
            }
        }
    }

    info!("Shutting down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
