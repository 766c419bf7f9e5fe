//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service
//! traits (catalog, transport, fetcher), allowing engine and command
//! tests without real infrastructure.

mod mock_catalog;
mod mock_transport;
mod scripted_fetcher;

pub use mock_catalog::MockCatalogClient;
pub use mock_transport::{EditedMessage, MockTransport, SentMessage};
pub use scripted_fetcher::ScriptedFetcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::catalog::{AssetRef, MediaType};

    /// Create a test asset with a fresh random id.
    pub fn asset(media_type: MediaType, size_bytes: u64) -> AssetRef {
        asset_with_id(&Uuid::new_v4().to_string(), media_type, size_bytes)
    }

    /// Create a test asset with a fixed id (useful for duplicate testing).
    pub fn asset_with_id(id: &str, media_type: MediaType, size_bytes: u64) -> AssetRef {
        let ext = match media_type {
            MediaType::Image => "jpg",
            MediaType::Video => "mp4",
        };
        AssetRef {
            id: id.to_string(),
            media_type,
            size_bytes,
            file_name: format!("asset_{}.{}", &id[..id.len().min(8)], ext),
            checksum: Some(format!("sha1:{}", &id[..id.len().min(8)])),
            created_at: Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()),
            width: Some(4032),
            height: Some(3024),
        }
    }

    /// Image asset of the given size with a fresh id.
    pub fn image_asset(size_bytes: u64) -> AssetRef {
        asset(MediaType::Image, size_bytes)
    }

    /// Video asset of the given size with a fresh id.
    pub fn video_asset(size_bytes: u64) -> AssetRef {
        asset(MediaType::Video, size_bytes)
    }
}
