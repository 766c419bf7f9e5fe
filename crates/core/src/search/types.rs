//! Types for the search subsystem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{AssetRef, MediaType};

/// Hard ceiling on how many assets one search may request.
pub const MAX_RESULT_COUNT: usize = 10;

/// User-specified constraints for one search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchFilters {
    /// Media type to accept; `None` accepts both images and videos.
    pub media: Option<MediaType>,
    /// Minimum asset size in bytes.
    pub min_size_bytes: Option<u64>,
    /// Maximum asset size in bytes; further capped by the account tier.
    pub max_size_bytes: Option<u64>,
    /// Number of assets requested, clamped to 1..=MAX_RESULT_COUNT.
    pub count: usize,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            media: None,
            min_size_bytes: None,
            max_size_bytes: None,
            count: 1,
        }
    }
}

/// Filter validation failure; reported to the user, search never starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error(
        "Minimum size ({min} bytes) exceeds maximum size ({max} bytes)"
    )]
    MinAboveMax { min: u64, max: u64 },

    #[error(
        "Minimum size ({min} bytes) exceeds the account's upload ceiling ({ceiling} bytes)"
    )]
    MinAboveCeiling { min: u64, ceiling: u64 },
}

impl SearchFilters {
    /// Clamp the requested count into the allowed range.
    pub fn clamp_count(mut self) -> Self {
        self.count = self.count.clamp(1, MAX_RESULT_COUNT);
        self
    }

    /// Check invariants against the effective size ceiling.
    pub fn validate(&self, effective_max_bytes: u64) -> Result<(), FilterError> {
        if let Some(min) = self.min_size_bytes {
            if let Some(max) = self.max_size_bytes {
                if min > max {
                    return Err(FilterError::MinAboveMax { min, max });
                }
            }
            if min > effective_max_bytes {
                return Err(FilterError::MinAboveCeiling {
                    min,
                    ceiling: effective_max_bytes,
                });
            }
        }
        Ok(())
    }

    /// Whether an asset satisfies these filters under the given ceiling.
    pub fn matches(&self, asset: &AssetRef, effective_max_bytes: u64) -> bool {
        if let Some(media) = self.media {
            if asset.media_type != media {
                return false;
            }
        }
        if let Some(min) = self.min_size_bytes {
            if asset.size_bytes < min {
                return false;
            }
        }
        asset.size_bytes <= effective_max_bytes
    }
}

/// Why a search stopped short of its target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionReason {
    /// Consecutive fetch failures reached the retry budget.
    FetchFailures,
    /// Non-matching draws (duplicates + filter misses) reached their ceiling.
    NonMatchingDraws,
}

/// Search state machine: `Running` until exactly one terminal state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchStatus {
    Running,
    /// Target count reached.
    Completed,
    /// A budget ran out; partial results returned.
    Exhausted { reason: ExhaustionReason },
    /// User-requested cancellation; partial results returned.
    Cancelled,
    /// Fatal catalog failure; the search could not run.
    Aborted { reason: String },
}

impl SearchStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchStatus::Running)
    }

    /// Metrics label for this terminal state.
    pub fn label(&self) -> &'static str {
        match self {
            SearchStatus::Running => "running",
            SearchStatus::Completed => "completed",
            SearchStatus::Exhausted { .. } => "exhausted",
            SearchStatus::Cancelled => "cancelled",
            SearchStatus::Aborted { .. } => "aborted",
        }
    }
}

/// Terminal outcome of one search, returned to the command handler.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub status: SearchStatus,
    /// Accepted assets in discovery order.
    pub assets: Vec<AssetRef>,
    /// Assets requested.
    pub requested: usize,
    /// Total fetch attempts made.
    pub attempts: u32,
    /// Total retryable fetch failures observed.
    pub fetch_failures: u32,
    /// Total non-matching draws (duplicates + filter misses).
    pub rejections: u32,
}
