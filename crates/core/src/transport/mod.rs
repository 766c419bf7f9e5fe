//! Chat transport abstraction.
//!
//! The bot core never talks to a chat network directly; command handlers
//! and the progress reporter go through the `ChatTransport` trait. The
//! binary provides a concrete implementation, tests use the mock in
//! `crate::testing`.

mod types;

pub use types::*;
