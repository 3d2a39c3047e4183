//! Validated settings tree nodes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::{HookKind, TiersError, TiersResult};
use crate::hooks::{ConverterParams, SharedConverter, SharedValidator};

use super::raw::{RawCategory, RawLeaf, RawSettingNode};

/// Level at which a setting override applies
///
/// Precedence when resolving is `User` over `Channel` over `Server`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingScope {
    Server,
    Channel,
    User,
}

impl fmt::Display for SettingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Channel => write!(f, "channel"),
            Self::User => write!(f, "user"),
        }
    }
}

/// A node of the validated tree
#[derive(Debug, Clone)]
pub enum SettingNode {
    Category(SettingCategory),
    Leaf(Arc<SettingLeaf>),
}

impl SettingNode {
    pub fn user_facing_name(&self) -> &str {
        match self {
            Self::Category(category) => &category.user_facing_name,
            Self::Leaf(leaf) => &leaf.user_facing_name,
        }
    }

    pub fn as_leaf(&self) -> Option<&Arc<SettingLeaf>> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Category(_) => None,
        }
    }

    pub(crate) fn to_raw(&self) -> RawSettingNode {
        match self {
            Self::Category(category) => RawSettingNode::Category(RawCategory {
                user_facing_name: Some(category.user_facing_name.clone()),
                description: category.description.clone(),
                children: category.children.iter().map(SettingNode::to_raw).collect(),
            }),
            Self::Leaf(leaf) => RawSettingNode::Leaf(leaf.to_raw()),
        }
    }
}

/// A grouping node, used for display only
#[derive(Debug, Clone)]
pub struct SettingCategory {
    pub(crate) user_facing_name: String,
    pub(crate) description: Option<String>,
    pub(crate) children: Vec<SettingNode>,
}

impl SettingCategory {
    pub fn user_facing_name(&self) -> &str {
        &self.user_facing_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Children in display order
    pub fn children(&self) -> &[SettingNode] {
        &self.children
    }
}

/// A single configurable option with every default filled in
pub struct SettingLeaf {
    pub(crate) unique_id: String,
    pub(crate) user_facing_name: String,
    pub(crate) description: Option<String>,
    pub(crate) default_user_facing_value: Value,
    pub(crate) server_setting: bool,
    pub(crate) channel_setting: bool,
    pub(crate) user_setting: bool,
    pub(crate) to_internal: SharedConverter,
    pub(crate) to_user_facing: SharedConverter,
    pub(crate) is_valid: SharedValidator,
}

impl SettingLeaf {
    /// Storage key of this setting
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn user_facing_name(&self) -> &str {
        &self.user_facing_name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn default_user_facing_value(&self) -> &Value {
        &self.default_user_facing_value
    }

    pub fn server_setting(&self) -> bool {
        self.server_setting
    }

    pub fn channel_setting(&self) -> bool {
        self.channel_setting
    }

    pub fn user_setting(&self) -> bool {
        self.user_setting
    }

    /// Whether this leaf may be overridden at `scope`
    pub fn allows(&self, scope: SettingScope) -> bool {
        match scope {
            SettingScope::Server => self.server_setting,
            SettingScope::Channel => self.channel_setting,
            SettingScope::User => self.user_setting,
        }
    }

    /// Run the `to_internal` hook
    pub async fn to_internal(
        &self,
        user_facing_value: Value,
        params: &ConverterParams,
    ) -> TiersResult<Value> {
        self.to_internal
            .convert(user_facing_value, params)
            .await
            .map_err(|e| self.fault(HookKind::ToInternal, e))
    }

    /// Run the `to_user_facing` hook
    pub async fn to_user_facing(
        &self,
        internal_value: Value,
        params: &ConverterParams,
    ) -> TiersResult<Value> {
        self.to_user_facing
            .convert(internal_value, params)
            .await
            .map_err(|e| self.fault(HookKind::ToUserFacing, e))
    }

    /// Run the `is_valid` hook
    pub async fn is_valid(&self, internal_value: &Value, params: &ConverterParams) -> TiersResult<bool> {
        self.is_valid
            .is_valid(internal_value, params)
            .await
            .map_err(|e| self.fault(HookKind::IsValid, e))
    }

    /// The default value in its internal form
    pub async fn default_internal_value(&self, params: &ConverterParams) -> TiersResult<Value> {
        self.to_internal(self.default_user_facing_value.clone(), params)
            .await
    }

    fn fault(&self, hook: HookKind, error: crate::error::HookError) -> TiersError {
        tracing::warn!(
            setting = %self.unique_id,
            %hook,
            error = %error,
            "setting hook failed"
        );
        TiersError::converter(self.unique_id.clone(), hook, error)
    }

    fn to_raw(&self) -> RawLeaf {
        RawLeaf {
            unique_id: Some(self.unique_id.clone()),
            user_facing_name: Some(self.user_facing_name.clone()),
            description: self.description.clone(),
            default_user_facing_value: Some(self.default_user_facing_value.clone()),
            server_setting: Some(self.server_setting),
            channel_setting: Some(self.channel_setting),
            user_setting: Some(self.user_setting),
            to_internal: Some(Arc::clone(&self.to_internal)),
            to_user_facing: Some(Arc::clone(&self.to_user_facing)),
            is_valid: Some(Arc::clone(&self.is_valid)),
        }
    }
}

impl fmt::Debug for SettingLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingLeaf")
            .field("unique_id", &self.unique_id)
            .field("user_facing_name", &self.user_facing_name)
            .field("default_user_facing_value", &self.default_user_facing_value)
            .field("server_setting", &self.server_setting)
            .field("channel_setting", &self.channel_setting)
            .field("user_setting", &self.user_setting)
            .finish_non_exhaustive()
    }
}
