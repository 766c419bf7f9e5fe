//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Search engine (sessions, attempts, outcomes)
//! - Catalog API calls
//! - Command dispatch

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Search Engine Metrics
// =============================================================================

/// Searches started total.
pub static SEARCHES_STARTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("shufflebot_searches_started_total", "Total searches started").unwrap()
});

/// Searches finished total by terminal state.
pub static SEARCHES_FINISHED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shufflebot_searches_finished_total",
            "Total searches finished",
        ),
        &["result"], // "completed", "exhausted", "cancelled", "aborted"
    )
    .unwrap()
});

/// Fetch attempts per search.
pub static SEARCH_ATTEMPTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "shufflebot_search_attempts",
            "Fetch attempts made per search",
        )
        .buckets(vec![1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0]),
    )
    .unwrap()
});

/// Assets uploaded to the chat channel.
pub static ASSETS_SERVED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "shufflebot_assets_served_total",
        "Total assets sent to the chat channel",
    )
    .unwrap()
});

// =============================================================================
// Catalog API Metrics
// =============================================================================

/// Catalog requests total by operation and status.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shufflebot_catalog_requests_total",
            "Total catalog API requests",
        ),
        &["operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Catalog request duration in seconds.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "shufflebot_catalog_request_duration_seconds",
            "Duration of catalog API requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Command Metrics
// =============================================================================

/// Commands dispatched by name and outcome.
pub static COMMANDS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shufflebot_commands_total", "Total chat commands handled"),
        &["command", "status"], // status: "ok", "error", "rejected"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search engine
        Box::new(SEARCHES_STARTED.clone()),
        Box::new(SEARCHES_FINISHED.clone()),
        Box::new(SEARCH_ATTEMPTS.clone()),
        Box::new(ASSETS_SERVED.clone()),
        // Catalog
        Box::new(CATALOG_REQUESTS.clone()),
        Box::new(CATALOG_REQUEST_DURATION.clone()),
        // Commands
        Box::new(COMMANDS_TOTAL.clone()),
    ]
}
