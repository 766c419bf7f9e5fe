//! Preference document types.

use serde::{Deserialize, Serialize};

use crate::catalog::MediaType;
use crate::policy::AccountTier;

use super::PrefsError;

/// Per-user preferences.
///
/// Unset filter fields fall back to these defaults when a search is
/// started; `max_attempts` and `progress_update_interval` bound the
/// engine's retry and reporting behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    /// Default media type filter; `None` means both images and videos.
    #[serde(default)]
    pub default_media_type: Option<MediaType>,
    /// Default minimum asset size in bytes.
    #[serde(default)]
    pub min_size_bytes: Option<u64>,
    /// Default maximum asset size in bytes (still capped by the tier).
    #[serde(default)]
    pub max_size_bytes: Option<u64>,
    /// Account tier, determines the upload size ceiling.
    #[serde(default)]
    pub account_tier: AccountTier,
    /// Consecutive fetch failures tolerated before a search gives up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Progress message update interval, in fetch attempts.
    #[serde(default = "default_update_interval")]
    pub progress_update_interval: u32,
}

fn default_max_attempts() -> u32 {
    50
}

fn default_update_interval() -> u32 {
    5
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_media_type: None,
            min_size_bytes: None,
            max_size_bytes: None,
            account_tier: AccountTier::default(),
            max_attempts: default_max_attempts(),
            progress_update_interval: default_update_interval(),
        }
    }
}

/// Trait for preference storage backends.
///
/// Loads return defaults for unknown users. Implementations serialize
/// writes so overlapping `.prefs set` commands cannot lose updates.
pub trait PreferenceStore: Send + Sync {
    /// Preferences for a user, defaults if none are stored.
    fn load(&self, user_id: &str) -> Preferences;

    /// Persist preferences for a user.
    fn save(&self, user_id: &str, prefs: &Preferences) -> Result<(), PrefsError>;

    /// Apply a mutation to a user's preferences and persist the result.
    fn update(
        &self,
        user_id: &str,
        mutate: &mut dyn FnMut(&mut Preferences),
    ) -> Result<Preferences, PrefsError>;

    /// Reset a user to defaults and persist.
    fn reset(&self, user_id: &str) -> Result<(), PrefsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.max_attempts, 50);
        assert_eq!(prefs.progress_update_interval, 5);
        assert_eq!(prefs.account_tier, AccountTier::Basic);
        assert!(prefs.default_media_type.is_none());
        assert!(prefs.min_size_bytes.is_none());
        assert!(prefs.max_size_bytes.is_none());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let json = r#"{ "default_media_type": "image", "max_attempts": 10 }"#;
        let prefs: Preferences = serde_json::from_str(json).unwrap();
        assert_eq!(prefs.default_media_type, Some(MediaType::Image));
        assert_eq!(prefs.max_attempts, 10);
        assert_eq!(prefs.progress_update_interval, 5);
    }

    #[test]
    fn test_round_trip() {
        let prefs = Preferences {
            default_media_type: Some(MediaType::Video),
            min_size_bytes: Some(500_000),
            max_size_bytes: Some(5_000_000),
            account_tier: AccountTier::Nitro,
            max_attempts: 25,
            progress_update_interval: 3,
        };
        let json = serde_json::to_string(&prefs).unwrap();
        let parsed: Preferences = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, prefs);
    }
}
