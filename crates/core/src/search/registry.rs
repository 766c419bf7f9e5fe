//! Per-user active-search bookkeeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use super::session::CancelFlag;

/// Tracks the one search each user may have in flight.
///
/// `begin` hands out a guard that unregisters the search on drop, so a
/// panicking or aborted search task cannot leave a stale entry behind
/// that would block the user's next `.random`.
#[derive(Default)]
pub struct ActiveSearches {
    inner: Mutex<HashMap<String, CancelFlag>>,
}

impl ActiveSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new search for a user.
    ///
    /// Returns `None` if the user already has one in flight; the caller
    /// rejects the command in that case.
    pub fn begin(self: &Arc<Self>, user_id: &str) -> Option<SearchGuard> {
        let mut active = self.inner.lock().expect("search registry lock poisoned");
        if active.contains_key(user_id) {
            return None;
        }
        let flag = CancelFlag::new();
        active.insert(user_id.to_string(), flag.clone());
        debug!(user = user_id, "Search registered");
        Some(SearchGuard {
            registry: Arc::clone(self),
            user_id: user_id.to_string(),
            flag,
        })
    }

    /// Request cancellation of a user's active search.
    ///
    /// Returns whether there was one to cancel. The search task observes
    /// the flag at its next loop boundary and unregisters itself.
    pub fn cancel(&self, user_id: &str) -> bool {
        let active = self.inner.lock().expect("search registry lock poisoned");
        match active.get(user_id) {
            Some(flag) => {
                flag.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether a user currently has a search in flight.
    pub fn is_active(&self, user_id: &str) -> bool {
        self.inner
            .lock()
            .expect("search registry lock poisoned")
            .contains_key(user_id)
    }

    fn end(&self, user_id: &str) {
        self.inner
            .lock()
            .expect("search registry lock poisoned")
            .remove(user_id);
        debug!(user = user_id, "Search unregistered");
    }
}

/// Registration handle for one running search.
pub struct SearchGuard {
    registry: Arc<ActiveSearches>,
    user_id: String,
    flag: CancelFlag,
}

impl SearchGuard {
    /// Cancellation flag to hand to the session.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.flag.clone()
    }
}

impl Drop for SearchGuard {
    fn drop(&mut self) {
        self.registry.end(&self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_active_search_per_user() {
        let registry = Arc::new(ActiveSearches::new());

        let guard = registry.begin("alice").unwrap();
        assert!(registry.begin("alice").is_none());
        // Other users are unaffected.
        assert!(registry.begin("bob").is_some());

        drop(guard);
        assert!(registry.begin("alice").is_some());
    }

    #[test]
    fn test_cancel_sets_flag() {
        let registry = Arc::new(ActiveSearches::new());
        let guard = registry.begin("alice").unwrap();
        let flag = guard.cancel_flag();

        assert!(!flag.is_cancelled());
        assert!(registry.cancel("alice"));
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_cancel_without_active_search() {
        let registry = Arc::new(ActiveSearches::new());
        assert!(!registry.cancel("alice"));
    }

    #[test]
    fn test_guard_drop_unregisters() {
        let registry = Arc::new(ActiveSearches::new());
        {
            let _guard = registry.begin("alice").unwrap();
            assert!(registry.is_active("alice"));
        }
        assert!(!registry.is_active("alice"));
    }
}
