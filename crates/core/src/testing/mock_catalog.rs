//! Mock catalog client for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::{AssetRef, CatalogClient, CatalogError, MediaType, ServerStats};

/// Mock implementation of the `CatalogClient` trait.
///
/// Random-asset draws replay a scripted queue of results; asset lookups
/// and downloads are served from an in-memory map. Favorite and delete
/// calls are recorded for assertions, with optional error injection.
#[derive(Default)]
pub struct MockCatalogClient {
    random_queue: Mutex<VecDeque<Result<AssetRef, CatalogError>>>,
    assets: Mutex<HashMap<String, AssetRef>>,
    data: Mutex<HashMap<String, Vec<u8>>>,
    favorites: Mutex<Vec<(String, bool)>>,
    deleted: Mutex<Vec<String>>,
    stats: Mutex<Option<ServerStats>>,
    next_error: Mutex<Option<CatalogError>>,
}

impl MockCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next random-asset draw.
    pub fn push_random(&self, result: Result<AssetRef, CatalogError>) {
        self.random_queue.lock().unwrap().push_back(result);
    }

    /// Register an asset so lookups and downloads can find it.
    pub fn insert_asset(&self, asset: AssetRef) {
        let id = asset.id.clone();
        // Default payload: one byte per simulated megabyte keeps tests light.
        self.data
            .lock()
            .unwrap()
            .entry(id.clone())
            .or_insert_with(|| vec![0u8; 16]);
        self.assets.lock().unwrap().insert(id, asset);
    }

    /// Set the raw payload returned for an asset download.
    pub fn set_asset_data(&self, id: &str, bytes: Vec<u8>) {
        self.data.lock().unwrap().insert(id.to_string(), bytes);
    }

    /// Set the statistics response.
    pub fn set_stats(&self, stats: ServerStats) {
        *self.stats.lock().unwrap() = Some(stats);
    }

    /// Configure the next mutating call to fail with the given error.
    pub fn set_next_error(&self, error: CatalogError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    /// Recorded `(asset_id, favorite)` calls.
    pub fn favorite_calls(&self) -> Vec<(String, bool)> {
        self.favorites.lock().unwrap().clone()
    }

    /// Recorded deleted asset ids.
    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn take_error(&self) -> Option<CatalogError> {
        self.next_error.lock().unwrap().take()
    }
}

#[async_trait]
impl CatalogClient for MockCatalogClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_random(&self) -> Result<AssetRef, CatalogError> {
        self.random_queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CatalogError::Empty))
    }

    async fn fetch_asset(&self, id: &str) -> Result<AssetRef, CatalogError> {
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.assets
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn fetch_asset_data(&self, id: &str) -> Result<Vec<u8>, CatalogError> {
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.data
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn set_favorite(&self, id: &str, favorite: bool) -> Result<(), CatalogError> {
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.favorites
            .lock()
            .unwrap()
            .push((id.to_string(), favorite));
        Ok(())
    }

    async fn delete_asset(&self, id: &str) -> Result<(), CatalogError> {
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.assets.lock().unwrap().remove(id);
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn server_stats(&self) -> Result<ServerStats, CatalogError> {
        if let Some(err) = self.take_error() {
            return Err(err);
        }
        self.stats
            .lock()
            .unwrap()
            .clone()
            .ok_or(CatalogError::AdminKeyMissing)
    }
}

/// Convenience: build a mock whose random draws cycle through the given
/// assets once, registering each for lookup as well.
impl MockCatalogClient {
    pub fn with_random_assets(assets: Vec<AssetRef>) -> Self {
        let mock = Self::new();
        for asset in assets {
            mock.insert_asset(asset.clone());
            mock.push_random(Ok(asset));
        }
        mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_random_queue_then_empty() {
        let mock = MockCatalogClient::new();
        mock.push_random(Ok(fixtures::image_asset(1_000)));

        assert!(mock.fetch_random().await.is_ok());
        assert!(matches!(
            mock.fetch_random().await,
            Err(CatalogError::Empty)
        ));
    }

    #[tokio::test]
    async fn test_asset_lookup_and_delete() {
        let mock = MockCatalogClient::new();
        let asset = fixtures::asset_with_id("a-1", MediaType::Image, 1_000);
        mock.insert_asset(asset);

        assert!(mock.fetch_asset("a-1").await.is_ok());
        assert!(mock.fetch_asset_data("a-1").await.is_ok());

        mock.delete_asset("a-1").await.unwrap();
        assert!(matches!(
            mock.fetch_asset("a-1").await,
            Err(CatalogError::NotFound(_))
        ));
        assert_eq!(mock.deleted_ids(), vec!["a-1".to_string()]);
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let mock = MockCatalogClient::new();
        mock.insert_asset(fixtures::asset_with_id("a-1", MediaType::Image, 1_000));
        mock.set_next_error(CatalogError::Unauthorized);

        assert!(mock.set_favorite("a-1", true).await.is_err());
        assert!(mock.set_favorite("a-1", true).await.is_ok());
        assert_eq!(mock.favorite_calls(), vec![("a-1".to_string(), true)]);
    }
}
