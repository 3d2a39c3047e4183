//! Tiers Core Library
//!
//! A hierarchical settings engine for multi-tenant chat bots. Settings are
//! declared once as a tree of categories and leaves; each leaf may then be
//! overridden per server, per channel and per user, with the most specific
//! override winning.
//!
//! The engine never owns storage. It talks to a [`SettingsPersistence`]
//! backend that stores one document per user and one per server.

pub mod engine;
pub mod error;
pub mod hooks;
pub mod persistence;
pub mod resolve;
pub mod tree;
pub mod update;
pub mod validators;

// Re-export commonly used types
pub use engine::SettingsEngine;
pub use error::{ErrorCategory, HookError, HookResult, StorageError, TiersError, TiersResult};
pub use hooks::{ConverterParams, FnConverter, FnValidator, ValueConverter, ValueValidator};
pub use persistence::{InMemoryPersistence, ServerDocument, SettingsPersistence, UserDocument};
pub use resolve::{ResolvedValue, ValueSource};
pub use tree::{
    LeafHooks, RawSettingNode, SettingLeaf, SettingNode, SettingScope, SettingsTree, TreeConfig,
};
pub use update::{AcceptedUpdate, UpdateOutcome, UpdateRejection, UpdateRejectionReason};
