//! Types for the asset-catalog API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Media kind of a stored asset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

/// A stored media asset, immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetRef {
    /// Catalog identifier (UUID string).
    pub id: String,
    pub media_type: MediaType,
    pub size_bytes: u64,
    /// Original file name as uploaded.
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Pixel dimensions, when the server reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Server-wide asset statistics (requires the admin credential).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerStats {
    pub photos: u64,
    pub videos: u64,
    /// Total storage used in bytes, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_bytes: Option<u64>,
}

impl ServerStats {
    pub fn total_assets(&self) -> u64 {
        self.photos + self.videos
    }
}

/// Errors from catalog operations.
///
/// `is_retryable` is the contract the search engine depends on: transient
/// transport conditions count against the retry budget, everything else
/// aborts the session.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Catalog request timed out")]
    Timeout,

    #[error("Catalog rate limit exceeded")]
    RateLimited,

    #[error("Catalog server error: HTTP {status}")]
    ServerError { status: u16 },

    #[error("Catalog returned no assets")]
    Empty,

    #[error("Catalog authentication failed (check the API key)")]
    Unauthorized,

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Catalog API error: HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Malformed catalog response: {0}")]
    SchemaError(String),

    #[error("Admin credential not configured")]
    AdminKeyMissing,

    #[error("Catalog client not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// Whether a failed call may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::ConnectionFailed(_)
                | CatalogError::Timeout
                | CatalogError::RateLimited
                | CatalogError::ServerError { .. }
                | CatalogError::Empty
        )
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else {
            CatalogError::ConnectionFailed(err.to_string())
        }
    }
}

/// Trait for asset-catalog backends.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch one random asset from the catalog.
    async fn fetch_random(&self) -> Result<AssetRef, CatalogError>;

    /// Fetch an asset by id.
    async fn fetch_asset(&self, id: &str) -> Result<AssetRef, CatalogError>;

    /// Download the original file contents of an asset.
    async fn fetch_asset_data(&self, id: &str) -> Result<Vec<u8>, CatalogError>;

    /// Mark or unmark an asset as favorite.
    async fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), CatalogError>;

    /// Permanently delete an asset.
    async fn delete_asset(&self, id: &str) -> Result<(), CatalogError>;

    /// Fetch server-wide statistics. Requires the admin credential.
    async fn server_stats(&self) -> Result<ServerStats, CatalogError>;
}
