//! HTTP client for the photo-server catalog API.
//!
//! The server exposes no filtered random endpoint; the only sampling
//! primitive is `GET /api/assets/random`, which returns unfiltered assets.
//! All filtering happens client-side in the search engine.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::metrics;

use super::types::{AssetRef, CatalogClient, CatalogError, MediaType, ServerStats};

/// Configuration for the HTTP catalog client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpCatalogConfig {
    /// Server base URL (e.g. "https://photos.example.org").
    pub base_url: String,
    /// API key sent as `x-api-key`.
    pub api_key: String,
    /// Elevated API key for the statistics endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_api_key: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Reqwest-backed catalog client.
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    api_key: String,
    admin_api_key: Option<String>,
}

impl HttpCatalogClient {
    pub fn new(config: HttpCatalogConfig) -> Result<Self, CatalogError> {
        if config.base_url.is_empty() {
            return Err(CatalogError::NotConfigured(
                "catalog base URL is required".to_string(),
            ));
        }
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "catalog API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            admin_api_key: config.admin_api_key,
        })
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("x-api-key", &self.api_key)
            .header("Accept", "application/json")
    }

    /// Map a non-success HTTP status to a typed error.
    fn classify_status(status: StatusCode, message: String) -> CatalogError {
        match status.as_u16() {
            401 | 403 => CatalogError::Unauthorized,
            429 => CatalogError::RateLimited,
            s if s >= 500 => CatalogError::ServerError { status: s },
            s => CatalogError::ApiError { status: s, message },
        }
    }

    async fn error_from_response(response: reqwest::Response) -> CatalogError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::classify_status(status, body)
    }

    fn record(operation: &str, started: Instant, ok: bool) {
        let status = if ok { "success" } else { "error" };
        metrics::CATALOG_REQUESTS
            .with_label_values(&[operation, status])
            .inc();
        metrics::CATALOG_REQUEST_DURATION
            .with_label_values(&[operation])
            .observe(started.elapsed().as_secs_f64());
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_random(&self) -> Result<AssetRef, CatalogError> {
        let url = format!("{}/api/assets/random", self.base_url);
        debug!("Catalog random-asset fetch");

        let started = Instant::now();
        let result = async {
            let response = self
                .authed(self.client.get(&url))
                .query(&[("count", "1")])
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }

            let assets: Vec<ApiAsset> = response.json().await.map_err(|e| {
                CatalogError::SchemaError(format!("random-asset response: {}", e))
            })?;

            // An empty batch is a transient catalog condition, not a schema
            // violation; the engine retries it against the failure budget.
            let asset = assets.into_iter().next().ok_or(CatalogError::Empty)?;

            AssetRef::try_from(asset)
        }
        .await;

        Self::record("fetch_random", started, result.is_ok());
        result
    }

    async fn fetch_asset(&self, id: &str) -> Result<AssetRef, CatalogError> {
        let url = format!("{}/api/assets/{}", self.base_url, id);
        debug!("Catalog asset fetch: id={}", id);

        let started = Instant::now();
        let result = async {
            let response = self.authed(self.client.get(&url)).send().await?;

            if response.status() == StatusCode::NOT_FOUND {
                return Err(CatalogError::NotFound(id.to_string()));
            }
            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }

            let asset: ApiAsset = response
                .json()
                .await
                .map_err(|e| CatalogError::SchemaError(format!("asset response: {}", e)))?;

            AssetRef::try_from(asset)
        }
        .await;

        Self::record("fetch_asset", started, result.is_ok());
        result
    }

    async fn fetch_asset_data(&self, id: &str) -> Result<Vec<u8>, CatalogError> {
        let url = format!("{}/api/assets/{}/original", self.base_url, id);
        debug!("Catalog asset download: id={}", id);

        let started = Instant::now();
        let result = async {
            let response = self
                .client
                .get(&url)
                .header("x-api-key", &self.api_key)
                .header("Accept", "application/octet-stream")
                .send()
                .await?;

            if response.status() == StatusCode::NOT_FOUND {
                return Err(CatalogError::NotFound(id.to_string()));
            }
            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }

            let bytes = response.bytes().await?;
            Ok(bytes.to_vec())
        }
        .await;

        Self::record("fetch_asset_data", started, result.is_ok());
        result
    }

    async fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), CatalogError> {
        let url = format!("{}/api/assets/{}", self.base_url, id);
        debug!("Catalog set favorite: id={}, favorite={}", id, favorite);

        let started = Instant::now();
        let result = async {
            let response = self
                .authed(self.client.put(&url))
                .json(&json!({ "isFavorite": favorite }))
                .send()
                .await?;

            if response.status() == StatusCode::NOT_FOUND {
                return Err(CatalogError::NotFound(id.to_string()));
            }
            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }
            Ok(())
        }
        .await;

        Self::record("set_favorite", started, result.is_ok());
        result
    }

    async fn delete_asset(&self, id: &str) -> Result<(), CatalogError> {
        let url = format!("{}/api/assets", self.base_url);
        debug!("Catalog asset delete: id={}", id);

        let started = Instant::now();
        let result = async {
            let response = self
                .authed(self.client.delete(&url))
                .json(&json!({ "force": true, "ids": [id] }))
                .send()
                .await?;

            if response.status() == StatusCode::NOT_FOUND {
                return Err(CatalogError::NotFound(id.to_string()));
            }
            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }
            Ok(())
        }
        .await;

        Self::record("delete_asset", started, result.is_ok());
        result
    }

    async fn server_stats(&self) -> Result<ServerStats, CatalogError> {
        let admin_key = self
            .admin_api_key
            .as_ref()
            .ok_or(CatalogError::AdminKeyMissing)?;

        let url = format!("{}/api/server/statistics", self.base_url);
        debug!("Catalog server statistics fetch");

        let started = Instant::now();
        let result = async {
            let response = self
                .client
                .get(&url)
                .header("x-api-key", admin_key)
                .header("Accept", "application/json")
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Self::error_from_response(response).await);
            }

            let stats: ApiServerStats = response
                .json()
                .await
                .map_err(|e| CatalogError::SchemaError(format!("statistics response: {}", e)))?;

            Ok(stats.into())
        }
        .await;

        Self::record("server_stats", started, result.is_ok());
        result
    }
}

// ============================================================================
// Catalog API response types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiAsset {
    id: String,
    #[serde(rename = "type")]
    asset_type: String,
    original_file_name: Option<String>,
    checksum: Option<String>,
    file_created_at: Option<DateTime<Utc>>,
    exif_info: Option<ApiExifInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiExifInfo {
    file_size_in_byte: Option<u64>,
    exif_image_width: Option<u32>,
    exif_image_height: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiServerStats {
    photos: u64,
    videos: u64,
    usage: Option<u64>,
}

impl TryFrom<ApiAsset> for AssetRef {
    type Error = CatalogError;

    fn try_from(api: ApiAsset) -> Result<Self, Self::Error> {
        let media_type = match api.asset_type.to_ascii_uppercase().as_str() {
            "IMAGE" => MediaType::Image,
            "VIDEO" => MediaType::Video,
            other => {
                return Err(CatalogError::SchemaError(format!(
                    "unknown asset type '{}' for asset {}",
                    other, api.id
                )))
            }
        };

        let exif = api.exif_info;
        let size_bytes = exif
            .as_ref()
            .and_then(|e| e.file_size_in_byte)
            .ok_or_else(|| {
                CatalogError::SchemaError(format!("asset {} has no file size", api.id))
            })?;

        Ok(AssetRef {
            file_name: api
                .original_file_name
                .unwrap_or_else(|| format!("asset_{}", api.id)),
            id: api.id,
            media_type,
            size_bytes,
            checksum: api.checksum,
            created_at: api.file_created_at,
            width: exif.as_ref().and_then(|e| e.exif_image_width),
            height: exif.as_ref().and_then(|e| e.exif_image_height),
        })
    }
}

impl From<ApiServerStats> for ServerStats {
    fn from(api: ApiServerStats) -> Self {
        Self {
            photos: api.photos,
            videos: api.videos,
            usage_bytes: api.usage,
        }
    }
}
