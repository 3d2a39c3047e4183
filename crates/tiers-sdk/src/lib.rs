//! Tiers SDK
//!
//! Everything an embedding bot needs to stand up the settings engine:
//! configuration loading, tracing setup and an [`EngineBuilder`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tiers_sdk::{EngineBuilder, EngineConfig, InMemoryPersistence, RawSettingNode, init_tracing};
//!
//! let config = EngineConfig::load("tiers.toml".as_ref())?;
//! init_tracing(&config.logging)?;
//!
//! let engine = EngineBuilder::new()
//!     .with_config(config)
//!     .with_persistence(Arc::new(InMemoryPersistence::new()))
//!     .with_node(RawSettingNode::leaf("prefix", "Command prefix", "k!"))
//!     .build()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod builder;
pub mod config;
pub mod logging;

pub use builder::EngineBuilder;
pub use config::{EngineConfig, LogFormat, LoggingConfig, load_from_file};
pub use logging::init_tracing;

// Re-export commonly used types from core
pub use tiers_core::{
    AcceptedUpdate, ConverterParams, FnConverter, FnValidator, HookError, HookResult,
    InMemoryPersistence, LeafHooks, RawSettingNode, ResolvedValue, ServerDocument, SettingLeaf,
    SettingNode, SettingScope, SettingsEngine, SettingsPersistence, SettingsTree, StorageError,
    TiersError, TiersResult, TreeConfig, UpdateOutcome, UpdateRejection, UpdateRejectionReason,
    UserDocument, ValueConverter, ValueSource, ValueValidator,
    validators::{
        BooleanValidator, DiscreteOptionValidator, RangeValidator, StringArrayValidator,
        TruthyValidator,
    },
};
