//! Per-user last-fetched-asset tracking.
//!
//! Lets `.favorite last`, `.unfavorite last` and `.delete last` target the
//! asset most recently shown to the user.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::transport::MessageId;

/// The asset most recently sent to a user, plus the chat message carrying
/// it so `.delete last` can also remove the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastAsset {
    pub asset_id: String,
    pub message_id: Option<MessageId>,
}

/// Tracks the last fetched asset for each user.
#[derive(Default)]
pub struct LastAssetTracker {
    inner: Mutex<HashMap<String, LastAsset>>,
}

impl LastAssetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user_id: &str, asset_id: &str, message_id: Option<MessageId>) {
        self.inner.lock().expect("last-asset lock poisoned").insert(
            user_id.to_string(),
            LastAsset {
                asset_id: asset_id.to_string(),
                message_id,
            },
        );
    }

    pub fn get(&self, user_id: &str) -> Option<LastAsset> {
        self.inner
            .lock()
            .expect("last-asset lock poisoned")
            .get(user_id)
            .cloned()
    }

    /// Forget the stored asset if it matches `asset_id` (e.g. after it was
    /// deleted from the catalog).
    pub fn clear_if(&self, user_id: &str, asset_id: &str) {
        let mut inner = self.inner.lock().expect("last-asset lock poisoned");
        if inner.get(user_id).is_some_and(|a| a.asset_id == asset_id) {
            inner.remove(user_id);
        }
    }
}
