//! The search engine driving loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::metrics;

use super::fetcher::{CandidateFetcher, FetchOutcome};
use super::progress::ProgressReporter;
use super::session::{Admission, SearchSession};
use super::types::{ExhaustionReason, SearchReport, SearchStatus};

/// Engine tuning knobs, from the `[search]` config section.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// First backoff delay after a retryable failure.
    pub backoff_base_ms: u64,
    /// Backoff ceiling.
    pub backoff_cap_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backoff_base_ms: 250,
            backoff_cap_ms: 5_000,
        }
    }
}

/// Drives a `SearchSession` to a terminal state.
///
/// The loop body is one rejection-sampling step: draw, classify, admit or
/// reject, check budgets. Cancellation is observed at the top of the loop
/// only; a remote call already in flight completes first.
pub struct SearchEngine {
    fetcher: Arc<dyn CandidateFetcher>,
    config: EngineConfig,
}

impl SearchEngine {
    pub fn new(fetcher: Arc<dyn CandidateFetcher>, config: EngineConfig) -> Self {
        Self { fetcher, config }
    }

    /// Bounded-exponential delay keyed by the consecutive-failure count.
    fn backoff_delay(&self, consecutive_failures: u32) -> Duration {
        let exp = consecutive_failures.saturating_sub(1).min(16);
        let ms = self
            .config
            .backoff_base_ms
            .saturating_mul(1u64 << exp)
            .min(self.config.backoff_cap_ms);
        Duration::from_millis(ms)
    }

    /// Run the session to completion, exhaustion, cancellation or abort.
    pub async fn run(
        &self,
        mut session: SearchSession,
        reporter: &mut ProgressReporter,
    ) -> SearchReport {
        metrics::SEARCHES_STARTED.inc();
        info!(
            user = session.user_id(),
            target = session.target(),
            max_bytes = session.effective_max_bytes(),
            "Search started"
        );

        while session.is_running() {
            if session.cancel_requested() {
                info!(user = session.user_id(), "Search cancelled by user");
                session.finish(SearchStatus::Cancelled);
                break;
            }

            let outcome = self.fetcher.fetch_random().await;
            session.note_attempt();

            match outcome {
                FetchOutcome::Success(asset) => match session.admit(asset) {
                    Admission::Accepted => {
                        debug!(
                            user = session.user_id(),
                            found = session.found(),
                            target = session.target(),
                            "Candidate accepted"
                        );
                        if session.target_reached() {
                            session.finish(SearchStatus::Completed);
                        }
                    }
                    Admission::Duplicate | Admission::FilteredOut => {
                        if session.rejection_budget_spent() {
                            info!(
                                user = session.user_id(),
                                attempts = session.attempts(),
                                "Rejection budget spent, giving up"
                            );
                            session.finish_exhausted(ExhaustionReason::NonMatchingDraws);
                        }
                    }
                },
                FetchOutcome::Retryable(reason) => {
                    let consecutive = session.record_failure();
                    debug!(
                        user = session.user_id(),
                        consecutive, "Retryable fetch failure: {}", reason
                    );
                    if session.failure_budget_spent() {
                        info!(
                            user = session.user_id(),
                            attempts = session.attempts(),
                            "Fetch failure budget spent, giving up"
                        );
                        session.finish_exhausted(ExhaustionReason::FetchFailures);
                    } else {
                        tokio::time::sleep(self.backoff_delay(consecutive)).await;
                    }
                }
                FetchOutcome::Fatal(reason) => {
                    warn!(user = session.user_id(), "Fatal fetch failure: {}", reason);
                    session.finish(SearchStatus::Aborted { reason });
                }
            }

            if session.is_running() {
                reporter.maybe_report(&session).await;
            }
        }

        let report = session.into_report();
        metrics::SEARCHES_FINISHED
            .with_label_values(&[report.status.label()])
            .inc();
        metrics::SEARCH_ATTEMPTS.observe(report.attempts as f64);

        info!(
            status = report.status.label(),
            found = report.assets.len(),
            attempts = report.attempts,
            "Search finished"
        );

        reporter.report_terminal(&report).await;
        report
    }
}
