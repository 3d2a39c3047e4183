//! Constructor methods for TiersError

use super::types::{HookError, HookKind, TiersError};

impl TiersError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            unique_id: None,
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            unique_id: None,
            context: Some(context.into()),
        }
    }

    /// Create a configuration error about a specific setting leaf
    pub fn invalid_setting(unique_id: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        let shown = unique_id.unwrap_or("undefined");
        Self::Config {
            message: format!("Error validating setting with uniqueId '{shown}': {message}"),
            unique_id: unique_id.map(str::to_string),
            context: None,
        }
    }

    /// Wrap a hook failure for the given setting
    pub fn converter(setting_id: impl Into<String>, hook: HookKind, error: HookError) -> Self {
        Self::Converter {
            setting_id: setting_id.into(),
            hook,
            message: error.message,
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error tied to a path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }
}
