//! Throttled progress reporting.

use std::sync::Arc;

use tracing::warn;

use crate::transport::{ChatTransport, MessageId};

use super::session::SearchSession;
use super::types::{ExhaustionReason, SearchReport, SearchStatus};

/// Emits progress updates for one search through the chat transport.
///
/// One message is sent on the first update and edited thereafter, so a
/// long search occupies a single line in the channel. Updates are
/// throttled to every `interval` attempts; the transition into a terminal
/// state always reports. Transport failures are logged and swallowed — a
/// broken chat connection must never abort a running search.
pub struct ProgressReporter {
    transport: Arc<dyn ChatTransport>,
    channel: String,
    interval: u32,
    message: Option<MessageId>,
}

impl ProgressReporter {
    pub fn new(transport: Arc<dyn ChatTransport>, channel: impl Into<String>, interval: u32) -> Self {
        Self {
            transport,
            channel: channel.into(),
            interval: interval.max(1),
            message: None,
        }
    }

    /// Id of the progress message, once one has been sent.
    pub fn message_id(&self) -> Option<&MessageId> {
        self.message.as_ref()
    }

    /// Report if the session just crossed an update boundary.
    pub async fn maybe_report(&mut self, session: &SearchSession) {
        if session.attempts() % self.interval != 0 {
            return;
        }
        let text = format!(
            "🔍 Found {}/{} assets... (attempt {})",
            session.found(),
            session.target(),
            session.attempts(),
        );
        self.emit(&text).await;
    }

    /// Report the terminal outcome. Always emits.
    pub async fn report_terminal(&mut self, report: &SearchReport) {
        self.emit(&terminal_text(report)).await;
    }

    async fn emit(&mut self, text: &str) {
        match &self.message {
            Some(id) => {
                if let Err(e) = self.transport.edit_message(&self.channel, id, text).await {
                    warn!("Failed to edit progress message: {}", e);
                }
            }
            None => match self.transport.send_message(&self.channel, text).await {
                Ok(id) => self.message = Some(id),
                Err(e) => warn!("Failed to send progress message: {}", e),
            },
        }
    }
}

/// User-facing summary for a terminal search state.
fn terminal_text(report: &SearchReport) -> String {
    let found = report.assets.len();
    match &report.status {
        SearchStatus::Completed => format!(
            "✅ Found {}/{} assets in {} attempts",
            found, report.requested, report.attempts
        ),
        SearchStatus::Exhausted { reason: ExhaustionReason::FetchFailures } => format!(
            "❌ Stopped after {} attempts: the catalog kept failing. Found {}/{} assets.",
            report.attempts, found, report.requested
        ),
        SearchStatus::Exhausted { reason: ExhaustionReason::NonMatchingDraws } => format!(
            "❌ No matching assets after {} non-matching draws. Found {}/{} assets.",
            report.rejections, found, report.requested
        ),
        SearchStatus::Cancelled => format!(
            "✋ Search cancelled. Found {}/{} assets.",
            found, report.requested
        ),
        SearchStatus::Aborted { reason } => {
            format!("❌ Search aborted: {}", reason)
        }
        // Not reachable for a terminal report; render something honest.
        SearchStatus::Running => {
            format!("🔍 Found {}/{} assets...", found, report.requested)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{CancelFlag, SearchFilters, SessionLimits};
    use crate::testing::{fixtures, MockTransport};

    fn session_with_attempts(attempts: u32) -> SearchSession {
        let mut session = SearchSession::new(
            "alice",
            SearchFilters { count: 3, ..SearchFilters::default() },
            25_000_000,
            SessionLimits { max_fetch_failures: 5, max_rejections: 50 },
            CancelFlag::new(),
        );
        for _ in 0..attempts {
            session.note_attempt();
        }
        session
    }

    #[tokio::test]
    async fn test_throttles_to_interval() {
        let transport = Arc::new(MockTransport::new());
        let mut reporter = ProgressReporter::new(transport.clone(), "chan", 5);

        for attempts in 1..=14 {
            reporter.maybe_report(&session_with_attempts(attempts)).await;
        }

        // Attempts 5 and 10 cross the boundary: one send plus one edit.
        assert_eq!(transport.sent().len(), 1);
        assert_eq!(transport.edits().len(), 1);
    }

    #[tokio::test]
    async fn test_edits_one_message() {
        let transport = Arc::new(MockTransport::new());
        let mut reporter = ProgressReporter::new(transport.clone(), "chan", 1);

        reporter.maybe_report(&session_with_attempts(1)).await;
        reporter.maybe_report(&session_with_attempts(2)).await;
        reporter.maybe_report(&session_with_attempts(3)).await;

        assert_eq!(transport.sent().len(), 1);
        assert_eq!(transport.edits().len(), 2);
        assert!(reporter.message_id().is_some());
    }

    #[tokio::test]
    async fn test_terminal_always_reports() {
        let transport = Arc::new(MockTransport::new());
        let mut reporter = ProgressReporter::new(transport.clone(), "chan", 100);

        let mut session = session_with_attempts(7);
        session.finish(SearchStatus::Cancelled);
        reporter.report_terminal(&session.into_report()).await;

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("cancelled"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        let transport = Arc::new(MockTransport::new());
        transport.fail_next_send();
        let mut reporter = ProgressReporter::new(transport.clone(), "chan", 1);

        // Does not panic or propagate; the next report retries the send.
        reporter.maybe_report(&session_with_attempts(1)).await;
        assert!(reporter.message_id().is_none());

        reporter.maybe_report(&session_with_attempts(2)).await;
        assert!(reporter.message_id().is_some());
    }

    #[test]
    fn test_terminal_text_variants() {
        let mut session = session_with_attempts(12);
        session.admit(fixtures::image_asset(1_000_000));
        session.finish(SearchStatus::Exhausted { reason: ExhaustionReason::FetchFailures });
        let report = session.into_report();

        let text = terminal_text(&report);
        assert!(text.contains("12 attempts"));
        assert!(text.contains("1/3"));

        let mut session = session_with_attempts(2);
        session.finish(SearchStatus::Aborted { reason: "authentication failed".into() });
        assert!(terminal_text(&session.into_report()).contains("authentication failed"));
    }
}
