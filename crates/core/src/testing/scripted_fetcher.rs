//! Scripted candidate fetcher for engine tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::AssetRef;
use crate::search::{CancelFlag, CandidateFetcher, FetchOutcome};

/// Mock fetcher that replays a scripted sequence of outcomes.
///
/// When the script runs out, every further call returns a retryable
/// failure, which lets tests drive a session into `Exhausted` without
/// scripting each failure.
#[derive(Default)]
pub struct ScriptedFetcher {
    queue: Mutex<VecDeque<FetchOutcome>>,
    calls: AtomicU32,
    cancel_hook: Mutex<Option<(u32, CancelFlag)>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_success(&self, asset: AssetRef) {
        self.queue
            .lock()
            .unwrap()
            .push_back(FetchOutcome::Success(asset));
    }

    pub fn push_retryable(&self, reason: &str) {
        self.queue
            .lock()
            .unwrap()
            .push_back(FetchOutcome::Retryable(reason.to_string()));
    }

    pub fn push_fatal(&self, reason: &str) {
        self.queue
            .lock()
            .unwrap()
            .push_back(FetchOutcome::Fatal(reason.to_string()));
    }

    /// Trip the cancel flag once `after_calls` fetches have completed.
    ///
    /// Models a `.cancel` arriving while a draw is in flight: the engine
    /// must observe the flag before starting the next draw.
    pub fn cancel_after(&self, after_calls: u32, flag: CancelFlag) {
        *self.cancel_hook.lock().unwrap() = Some((after_calls, flag));
    }

    /// Number of fetches performed so far.
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CandidateFetcher for ScriptedFetcher {
    async fn fetch_random(&self) -> FetchOutcome {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        let outcome = self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| FetchOutcome::Retryable("script exhausted".to_string()));

        if let Some((after, flag)) = self.cancel_hook.lock().unwrap().as_ref() {
            if call >= *after {
                flag.cancel();
            }
        }

        outcome
    }
}
