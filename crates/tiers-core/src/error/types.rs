//! Core error types

use std::fmt;
use thiserror::Error;

/// Result type alias for Tiers operations
pub type TiersResult<T> = Result<T, TiersError>;

/// Result type returned by converter and validator hooks
pub type HookResult<T> = Result<T, HookError>;

/// Main error type for Tiers
#[derive(Error, Debug, Clone)]
pub enum TiersError {
    /// The settings tree (or engine configuration) is malformed
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        unique_id: Option<String>,
        context: Option<String>,
    },

    /// A user-supplied hook failed while handling a setting value
    #[error("Setting '{setting_id}' failed in {hook}: {message}")]
    Converter {
        setting_id: String,
        hook: HookKind,
        message: String,
    },

    /// Persistence backend errors, passed through untouched
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },
}

/// Which hook of a leaf raised a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    ToInternal,
    ToUserFacing,
    IsValid,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToInternal => write!(f, "toInternal"),
            Self::ToUserFacing => write!(f, "toUserFacing"),
            Self::IsValid => write!(f, "isValid"),
        }
    }
}

/// Failure raised from inside a converter or validator hook
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HookError {
    pub message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Persistence collaborator errors
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Backend not available: {0}")]
    NotAvailable(String),
}
