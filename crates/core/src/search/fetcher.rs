//! Candidate fetching and outcome classification.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::catalog::{AssetRef, CatalogClient};

/// Classified result of one random-asset draw.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Success(AssetRef),
    /// Transient condition; counts against the session's failure budget.
    Retryable(String),
    /// Permanent condition; aborts the session immediately.
    Fatal(String),
}

/// Trait for random-candidate sources.
#[async_trait]
pub trait CandidateFetcher: Send + Sync {
    /// Draw one random asset from the catalog.
    async fn fetch_random(&self) -> FetchOutcome;
}

/// Fetcher backed by a catalog client.
///
/// Classification follows `CatalogError::is_retryable`: timeouts, 5xx and
/// rate-limit responses are retryable; auth failures, schema violations
/// and other 4xx are fatal.
pub struct CatalogFetcher {
    catalog: Arc<dyn CatalogClient>,
}

impl CatalogFetcher {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CandidateFetcher for CatalogFetcher {
    async fn fetch_random(&self) -> FetchOutcome {
        match self.catalog.fetch_random().await {
            Ok(asset) => FetchOutcome::Success(asset),
            Err(err) if err.is_retryable() => {
                debug!("Retryable fetch failure: {}", err);
                FetchOutcome::Retryable(err.to_string())
            }
            Err(err) => FetchOutcome::Fatal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::testing::{fixtures, MockCatalogClient};

    #[tokio::test]
    async fn test_success_maps_to_success() {
        let catalog = Arc::new(MockCatalogClient::new());
        catalog.push_random(Ok(fixtures::image_asset(1_000_000)));

        let fetcher = CatalogFetcher::new(catalog);
        assert!(matches!(fetcher.fetch_random().await, FetchOutcome::Success(_)));
    }

    #[tokio::test]
    async fn test_retryable_classification() {
        let catalog = Arc::new(MockCatalogClient::new());
        catalog.push_random(Err(CatalogError::Timeout));
        catalog.push_random(Err(CatalogError::ServerError { status: 503 }));
        catalog.push_random(Err(CatalogError::RateLimited));

        let fetcher = CatalogFetcher::new(catalog);
        for _ in 0..3 {
            assert!(matches!(
                fetcher.fetch_random().await,
                FetchOutcome::Retryable(_)
            ));
        }
    }

    #[tokio::test]
    async fn test_fatal_classification() {
        let catalog = Arc::new(MockCatalogClient::new());
        catalog.push_random(Err(CatalogError::Unauthorized));
        catalog.push_random(Err(CatalogError::SchemaError("bad".into())));

        let fetcher = CatalogFetcher::new(catalog);
        for _ in 0..2 {
            assert!(matches!(fetcher.fetch_random().await, FetchOutcome::Fatal(_)));
        }
    }
}
