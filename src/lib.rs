//! Tiers
//!
//! Hierarchical per-user, per-channel and per-server settings for chat bots.
//! This crate re-exports [`tiers_sdk`]; the engine itself lives in
//! [`tiers_core`].

pub use tiers_core;
pub use tiers_sdk::*;
