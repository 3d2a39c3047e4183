//! Error classification for the command layer
//!
//! Callers render structured rejections themselves; everything that reaches
//! them as a [`TiersError`] is shown as a generic failure and logged. The
//! category decides the wording.

use super::types::TiersError;

/// Error category for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The settings tree or engine configuration is broken
    Configuration,
    /// A setting's own conversion or validation logic failed
    SettingLogic,
    /// The persistence backend failed
    Storage,
    /// Serialization and IO failures
    Internal,
}

impl ErrorCategory {
    /// Get a user-friendly category name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Configuration => "Configuration Error",
            Self::SettingLogic => "Setting Error",
            Self::Storage => "Storage Error",
            Self::Internal => "Internal Error",
        }
    }
}

impl TiersError {
    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } => ErrorCategory::Configuration,
            Self::Converter { .. } => ErrorCategory::SettingLogic,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Json { .. } | Self::Io { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether the operation faulted at runtime, as opposed to a bad build
    pub fn is_fault(&self) -> bool {
        !matches!(self, Self::Config { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HookError, HookKind, StorageError};

    #[test]
    fn test_categories() {
        assert_eq!(
            TiersError::config("bad tree").category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            TiersError::converter("volume", HookKind::IsValid, HookError::new("boom")).category(),
            ErrorCategory::SettingLogic
        );
        assert_eq!(
            TiersError::from(StorageError::Read("disk".into())).category(),
            ErrorCategory::Storage
        );
        assert_eq!(TiersError::json("eof").category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_config_errors_are_not_faults() {
        assert!(!TiersError::config("bad tree").is_fault());
        assert!(TiersError::from(StorageError::Write("locked".into())).is_fault());
    }

    #[test]
    fn test_storage_errors_keep_their_message() {
        let err = TiersError::from(StorageError::Connection("refused".into()));
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn test_invalid_setting_message() {
        let err = TiersError::invalid_setting(Some("volume"), "No defaultUserFacingValue property.");
        assert_eq!(
            err.to_string(),
            "Configuration error: Error validating setting with uniqueId 'volume': No defaultUserFacingValue property."
        );
        match err {
            TiersError::Config { unique_id, .. } => assert_eq!(unique_id.as_deref(), Some("volume")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
