//! Update outcomes returned to command handlers

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::hooks::stringify;
use crate::tree::{SettingLeaf, SettingScope};

/// Why an update was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateRejectionReason {
    NotAdmin,
    InvalidValue,
    SettingDoesNotExist,
    NotAllowedInServer,
    NotAllowedInChannel,
    NotAllowedForUser,
}

impl UpdateRejectionReason {
    /// Human-readable reason
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotAdmin => "not admin",
            Self::InvalidValue => "invalid value",
            Self::SettingDoesNotExist => "that setting doesn't exist",
            Self::NotAllowedInServer => "that setting cannot be set per-server",
            Self::NotAllowedInChannel => "that setting cannot be set per-channel",
            Self::NotAllowedForUser => "that setting cannot be set per-user",
        }
    }

    /// The reason used when a leaf's flag forbids `scope`
    pub fn not_allowed_in(scope: SettingScope) -> Self {
        match scope {
            SettingScope::Server => Self::NotAllowedInServer,
            SettingScope::Channel => Self::NotAllowedInChannel,
            SettingScope::User => Self::NotAllowedForUser,
        }
    }
}

impl fmt::Display for UpdateRejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A refused update with enough context to explain it
#[derive(Debug, Clone)]
pub struct UpdateRejection {
    pub reason: UpdateRejectionReason,
    /// The leaf, absent only for `SettingDoesNotExist`
    pub setting: Option<Arc<SettingLeaf>>,
    /// The user-facing value that failed validation
    pub rejected_user_facing_value: Option<Value>,
    /// The id that matched no leaf
    pub non_existent_unique_id: Option<String>,
}

impl UpdateRejection {
    pub fn new(reason: UpdateRejectionReason, setting: &Arc<SettingLeaf>) -> Self {
        Self {
            reason,
            setting: Some(Arc::clone(setting)),
            rejected_user_facing_value: None,
            non_existent_unique_id: None,
        }
    }

    pub fn invalid_value(setting: &Arc<SettingLeaf>, rejected_user_facing_value: Value) -> Self {
        Self {
            rejected_user_facing_value: Some(rejected_user_facing_value),
            ..Self::new(UpdateRejectionReason::InvalidValue, setting)
        }
    }

    pub fn no_such_setting(unique_id: impl Into<String>) -> Self {
        Self {
            reason: UpdateRejectionReason::SettingDoesNotExist,
            setting: None,
            rejected_user_facing_value: None,
            non_existent_unique_id: Some(unique_id.into()),
        }
    }
}

impl fmt::Display for UpdateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.setting, &self.rejected_user_facing_value) {
            (Some(setting), Some(value)) => write!(
                f,
                "{} for {}: {}",
                self.reason,
                setting.user_facing_name(),
                stringify(value)
            ),
            (Some(setting), None) => write!(f, "{} ({})", self.reason, setting.user_facing_name()),
            (None, _) => match &self.non_existent_unique_id {
                Some(unique_id) => write!(f, "{}: {}", self.reason, unique_id),
                None => write!(f, "{}", self.reason),
            },
        }
    }
}

/// A committed update
#[derive(Debug, Clone)]
pub struct AcceptedUpdate {
    pub new_user_facing_value: Value,
    pub new_internal_value: Value,
    pub setting: Arc<SettingLeaf>,
}

/// Result of an update attempt
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Accepted(AcceptedUpdate),
    Rejected(UpdateRejection),
}

impl UpdateOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn accepted(&self) -> Option<&AcceptedUpdate> {
        match self {
            Self::Accepted(accepted) => Some(accepted),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&UpdateRejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Accepted(_) => None,
        }
    }

    pub fn rejection_reason(&self) -> Option<UpdateRejectionReason> {
        self.rejection().map(|rejection| rejection.reason)
    }
}

impl From<UpdateRejection> for UpdateOutcome {
    fn from(rejection: UpdateRejection) -> Self {
        Self::Rejected(rejection)
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted(accepted) => write!(
                f,
                "{} set to {}",
                accepted.setting.user_facing_name(),
                stringify(&accepted.new_user_facing_value)
            ),
            Self::Rejected(rejection) => fmt::Display::fmt(rejection, f),
        }
    }
}
