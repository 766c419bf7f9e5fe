//! Remote asset-catalog API.
//!
//! This module provides the `CatalogClient` trait for talking to the photo
//! server, plus the reqwest-backed `HttpCatalogClient` implementation.
//! Errors are classified into retryable and fatal outcomes; the search
//! engine relies on that classification for its retry budget.

mod http;
mod types;

pub use http::{HttpCatalogClient, HttpCatalogConfig};
pub use types::*;
