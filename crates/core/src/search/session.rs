//! Search session state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::catalog::AssetRef;

use super::types::{ExhaustionReason, SearchFilters, SearchReport, SearchStatus};

/// Shared cooperative-cancellation flag.
///
/// The engine observes it at loop boundaries only; an in-flight catalog
/// call is allowed to complete before the flag is checked.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Budgets bounding one search.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    /// Consecutive retryable fetch failures tolerated.
    pub max_fetch_failures: u32,
    /// Total non-matching draws (duplicates + filter misses) tolerated.
    pub max_rejections: u32,
}

/// Verdict on one successfully fetched candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    /// Already in this session's results.
    Duplicate,
    /// Failed the session's filters.
    FilteredOut,
}

/// Mutable state of one in-flight search.
///
/// Owned by the engine driving it; discarded once a terminal report is
/// produced. One user has at most one live session at a time.
pub struct SearchSession {
    user_id: String,
    filters: SearchFilters,
    effective_max_bytes: u64,
    limits: SessionLimits,
    cancel: CancelFlag,

    results: Vec<AssetRef>,
    seen: HashSet<String>,
    attempts: u32,
    consecutive_failures: u32,
    total_failures: u32,
    rejections: u32,
    status: SearchStatus,
}

impl SearchSession {
    pub fn new(
        user_id: impl Into<String>,
        filters: SearchFilters,
        effective_max_bytes: u64,
        limits: SessionLimits,
        cancel: CancelFlag,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            filters: filters.clamp_count(),
            effective_max_bytes,
            limits,
            cancel,
            results: Vec::new(),
            seen: HashSet::new(),
            attempts: 0,
            consecutive_failures: 0,
            total_failures: 0,
            rejections: 0,
            status: SearchStatus::Running,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    pub fn effective_max_bytes(&self) -> u64 {
        self.effective_max_bytes
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn found(&self) -> usize {
        self.results.len()
    }

    pub fn target(&self) -> usize {
        self.filters.count
    }

    pub fn status(&self) -> &SearchStatus {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SearchStatus::Running
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn note_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Admit or reject one fetched candidate.
    ///
    /// Duplicates and filter misses consume the rejection budget, never
    /// the failure budget; an accepted asset resets the consecutive
    /// failure counter.
    pub fn admit(&mut self, asset: AssetRef) -> Admission {
        if self.seen.contains(&asset.id) {
            self.rejections += 1;
            return Admission::Duplicate;
        }
        if !self.filters.matches(&asset, self.effective_max_bytes) {
            self.rejections += 1;
            return Admission::FilteredOut;
        }

        self.seen.insert(asset.id.clone());
        self.results.push(asset);
        self.consecutive_failures = 0;
        Admission::Accepted
    }

    /// Record one retryable fetch failure; returns the consecutive count.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.total_failures += 1;
        self.consecutive_failures
    }

    pub fn failure_budget_spent(&self) -> bool {
        self.consecutive_failures >= self.limits.max_fetch_failures
    }

    pub fn rejection_budget_spent(&self) -> bool {
        self.rejections >= self.limits.max_rejections
    }

    pub fn target_reached(&self) -> bool {
        self.results.len() >= self.filters.count
    }

    /// Transition into a terminal state. No-op if already terminal.
    pub fn finish(&mut self, status: SearchStatus) {
        debug_assert!(status.is_terminal());
        if self.status == SearchStatus::Running {
            self.status = status;
        }
    }

    /// Consume the session into its terminal report.
    pub fn into_report(self) -> SearchReport {
        SearchReport {
            status: self.status,
            requested: self.filters.count,
            assets: self.results,
            attempts: self.attempts,
            fetch_failures: self.total_failures,
            rejections: self.rejections,
        }
    }
}

// Convenience constructors for terminal transitions, used by the engine.
impl SearchSession {
    pub(super) fn finish_exhausted(&mut self, reason: ExhaustionReason) {
        self.finish(SearchStatus::Exhausted { reason });
    }
}
