//! Per-user preference persistence.
//!
//! Preferences live in a flat JSON document keyed by user id, loaded once
//! at startup and rewritten on every change.

mod store;
mod types;

pub use store::JsonPreferenceStore;
pub use types::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("Failed to read preferences file: {0}")]
    ReadFailed(String),

    #[error("Failed to write preferences file: {0}")]
    WriteFailed(String),

    #[error("Preferences file is not valid JSON: {0}")]
    ParseFailed(String),
}
