//! JSON-file preference store.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

use super::types::{PreferenceStore, Preferences};
use super::PrefsError;

/// Preference store backed by a single JSON document on disk.
///
/// The whole document is loaded at construction and rewritten on every
/// change. All mutations go through one lock, which serializes writes
/// from overlapping preference commands.
pub struct JsonPreferenceStore {
    path: PathBuf,
    inner: Mutex<HashMap<String, Preferences>>,
}

impl JsonPreferenceStore {
    /// Open the store, loading the document if it exists.
    ///
    /// A corrupt document is treated as empty rather than fatal; the bot
    /// must come up even if the file was hand-edited badly.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let users = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| PrefsError::ReadFailed(e.to_string()))?;
            match serde_json::from_str(&raw) {
                Ok(users) => users,
                Err(e) => {
                    warn!("Preferences file {:?} is corrupt, starting empty: {}", path, e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        debug!("Loaded preferences for {} users from {:?}", users.len(), path);

        Ok(Self {
            path,
            inner: Mutex::new(users),
        })
    }

    fn flush(&self, users: &HashMap<String, Preferences>) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| PrefsError::WriteFailed(e.to_string()))?;
            }
        }
        let raw = serde_json::to_string_pretty(users)
            .map_err(|e| PrefsError::WriteFailed(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| PrefsError::WriteFailed(e.to_string()))
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self, user_id: &str) -> Preferences {
        self.inner
            .lock()
            .expect("preferences lock poisoned")
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    fn save(&self, user_id: &str, prefs: &Preferences) -> Result<(), PrefsError> {
        let mut users = self.inner.lock().expect("preferences lock poisoned");
        users.insert(user_id.to_string(), prefs.clone());
        self.flush(&users)
    }

    fn update(
        &self,
        user_id: &str,
        mutate: &mut dyn FnMut(&mut Preferences),
    ) -> Result<Preferences, PrefsError> {
        let mut users = self.inner.lock().expect("preferences lock poisoned");
        let prefs = users.entry(user_id.to_string()).or_default();
        mutate(prefs);
        let updated = prefs.clone();
        self.flush(&users)?;
        Ok(updated)
    }

    fn reset(&self, user_id: &str) -> Result<(), PrefsError> {
        let mut users = self.inner.lock().expect("preferences lock poisoned");
        users.insert(user_id.to_string(), Preferences::default());
        self.flush(&users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MediaType;
    use crate::policy::AccountTier;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonPreferenceStore {
        JsonPreferenceStore::open(dir.path().join("preferences.json")).unwrap()
    }

    #[test]
    fn test_unknown_user_gets_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load("nobody"), Preferences::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");

        let prefs = Preferences {
            default_media_type: Some(MediaType::Image),
            min_size_bytes: Some(2_000_000),
            account_tier: AccountTier::NitroBasic,
            ..Preferences::default()
        };

        {
            let store = JsonPreferenceStore::open(&path).unwrap();
            store.save("alice", &prefs).unwrap();
        }

        // Fresh store instance reads the flushed document.
        let store = JsonPreferenceStore::open(&path).unwrap();
        assert_eq!(store.load("alice"), prefs);
        assert_eq!(store.load("bob"), Preferences::default());
    }

    #[test]
    fn test_update_mutates_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let updated = store
            .update("alice", &mut |p| p.max_attempts = 10)
            .unwrap();
        assert_eq!(updated.max_attempts, 10);
        assert_eq!(store.load("alice").max_attempts, 10);
    }

    #[test]
    fn test_reset() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .update("alice", &mut |p| {
                p.max_attempts = 3;
                p.default_media_type = Some(MediaType::Video);
            })
            .unwrap();
        store.reset("alice").unwrap();
        assert_eq!(store.load("alice"), Preferences::default());
    }

    #[test]
    fn test_corrupt_document_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonPreferenceStore::open(&path).unwrap();
        assert_eq!(store.load("alice"), Preferences::default());
    }
}
