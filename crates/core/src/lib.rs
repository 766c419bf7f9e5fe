pub mod catalog;
pub mod commands;
pub mod config;
pub mod metrics;
pub mod policy;
pub mod prefs;
pub mod search;
pub mod state;
pub mod testing;
pub mod transport;

pub use catalog::{
    AssetRef, CatalogClient, CatalogError, HttpCatalogClient, HttpCatalogConfig, MediaType,
    ServerStats,
};
pub use commands::{BotContext, CommandError, CommandRouter};
pub use config::{
    load_config, load_config_from_str, validate_config, BotConfig, Config, ConfigError,
    SanitizedConfig, SearchConfig,
};
pub use policy::{effective_max_bytes, format_size, parse_size, AccountTier, SizeParseError};
pub use prefs::{JsonPreferenceStore, PreferenceStore, Preferences, PrefsError};
pub use search::{
    ActiveSearches, CancelFlag, CandidateFetcher, CatalogFetcher, EngineConfig, FetchOutcome,
    ProgressReporter, SearchEngine, SearchFilters, SearchReport, SearchSession, SearchStatus,
    SessionLimits,
};
pub use state::LastAssetTracker;
pub use transport::{Attachment, ChatTransport, MessageId, TransportError};
