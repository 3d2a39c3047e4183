//! Error types for Tiers
//!
//! Only genuine failures live here: configuration errors raised while a
//! settings tree is built, faults raised by user-supplied converter or
//! validator hooks, and persistence errors. Rejected updates are not errors;
//! they are returned as [`crate::update::UpdateOutcome::Rejected`].

mod category;
mod constructors;
mod conversions;
mod types;

pub use category::ErrorCategory;
pub use types::{HookError, HookKind, HookResult, StorageError, TiersError, TiersResult};
