//! Raw (unvalidated) settings tree input
//!
//! Raw nodes mirror the configuration schema: every field a validator has to
//! check is optional here. They are cheap to clone since hooks are shared.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::hooks::{SharedConverter, SharedValidator, ValueConverter, ValueValidator};

/// A node of the raw settings tree
#[derive(Debug, Clone)]
pub enum RawSettingNode {
    Category(RawCategory),
    Leaf(RawLeaf),
}

impl RawSettingNode {
    /// Create a category node
    pub fn category(
        user_facing_name: impl Into<String>,
        children: impl IntoIterator<Item = RawSettingNode>,
    ) -> Self {
        Self::Category(RawCategory {
            user_facing_name: Some(user_facing_name.into()),
            description: None,
            children: children.into_iter().collect(),
        })
    }

    /// Create a leaf node with all optional fields unset
    pub fn leaf(
        unique_id: impl Into<String>,
        user_facing_name: impl Into<String>,
        default_user_facing_value: impl Into<Value>,
    ) -> RawLeaf {
        RawLeaf::new(unique_id, user_facing_name, default_user_facing_value)
    }
}

impl From<RawLeaf> for RawSettingNode {
    fn from(leaf: RawLeaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<RawCategory> for RawSettingNode {
    fn from(category: RawCategory) -> Self {
        Self::Category(category)
    }
}

/// A grouping node
#[derive(Debug, Clone, Default)]
pub struct RawCategory {
    pub user_facing_name: Option<String>,
    pub description: Option<String>,
    pub children: Vec<RawSettingNode>,
}

impl RawCategory {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A configurable option
#[derive(Clone, Default)]
pub struct RawLeaf {
    pub unique_id: Option<String>,
    pub user_facing_name: Option<String>,
    pub description: Option<String>,
    pub default_user_facing_value: Option<Value>,
    pub server_setting: Option<bool>,
    pub channel_setting: Option<bool>,
    pub user_setting: Option<bool>,
    pub to_internal: Option<SharedConverter>,
    pub to_user_facing: Option<SharedConverter>,
    pub is_valid: Option<SharedValidator>,
}

impl RawLeaf {
    pub fn new(
        unique_id: impl Into<String>,
        user_facing_name: impl Into<String>,
        default_user_facing_value: impl Into<Value>,
    ) -> Self {
        Self {
            unique_id: Some(unique_id.into()),
            user_facing_name: Some(user_facing_name.into()),
            default_user_facing_value: Some(default_user_facing_value.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the value may be overridden server-wide
    pub fn with_server_setting(mut self, allowed: bool) -> Self {
        self.server_setting = Some(allowed);
        self
    }

    /// Whether the value may be overridden per channel
    pub fn with_channel_setting(mut self, allowed: bool) -> Self {
        self.channel_setting = Some(allowed);
        self
    }

    /// Whether the value may be overridden per user
    pub fn with_user_setting(mut self, allowed: bool) -> Self {
        self.user_setting = Some(allowed);
        self
    }

    pub fn with_to_internal(mut self, converter: impl ValueConverter + 'static) -> Self {
        self.to_internal = Some(Arc::new(converter));
        self
    }

    pub fn with_to_user_facing(mut self, converter: impl ValueConverter + 'static) -> Self {
        self.to_user_facing = Some(Arc::new(converter));
        self
    }

    pub fn with_is_valid(mut self, validator: impl ValueValidator + 'static) -> Self {
        self.is_valid = Some(Arc::new(validator));
        self
    }

    /// Overwrite whichever hooks `hooks` carries, leaving the rest alone
    pub fn with_hooks(mut self, hooks: LeafHooks) -> Self {
        self.apply_hooks(hooks);
        self
    }

    pub(crate) fn apply_hooks(&mut self, hooks: LeafHooks) {
        if hooks.to_internal.is_some() {
            self.to_internal = hooks.to_internal;
        }
        if hooks.to_user_facing.is_some() {
            self.to_user_facing = hooks.to_user_facing;
        }
        if hooks.is_valid.is_some() {
            self.is_valid = hooks.is_valid;
        }
    }
}

impl fmt::Debug for RawLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawLeaf")
            .field("unique_id", &self.unique_id)
            .field("user_facing_name", &self.user_facing_name)
            .field("default_user_facing_value", &self.default_user_facing_value)
            .field("server_setting", &self.server_setting)
            .field("channel_setting", &self.channel_setting)
            .field("user_setting", &self.user_setting)
            .field("to_internal", &self.to_internal.is_some())
            .field("to_user_facing", &self.to_user_facing.is_some())
            .field("is_valid", &self.is_valid.is_some())
            .finish()
    }
}

/// A bundle of hooks to attach to a leaf after it was loaded from data
#[derive(Clone, Default)]
pub struct LeafHooks {
    pub to_internal: Option<SharedConverter>,
    pub to_user_facing: Option<SharedConverter>,
    pub is_valid: Option<SharedValidator>,
}

impl LeafHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_internal(mut self, converter: impl ValueConverter + 'static) -> Self {
        self.to_internal = Some(Arc::new(converter));
        self
    }

    pub fn to_user_facing(mut self, converter: impl ValueConverter + 'static) -> Self {
        self.to_user_facing = Some(Arc::new(converter));
        self
    }

    pub fn is_valid(mut self, validator: impl ValueValidator + 'static) -> Self {
        self.is_valid = Some(Arc::new(validator));
        self
    }
}

/// Find a raw leaf anywhere in `nodes` by its unique id
pub fn find_raw_leaf_mut<'a>(
    nodes: &'a mut [RawSettingNode],
    unique_id: &str,
) -> Option<&'a mut RawLeaf> {
    for node in nodes.iter_mut() {
        match node {
            RawSettingNode::Leaf(leaf) => {
                if leaf.unique_id.as_deref() == Some(unique_id) {
                    return Some(leaf);
                }
            }
            RawSettingNode::Category(category) => {
                if let Some(found) = find_raw_leaf_mut(&mut category.children, unique_id) {
                    return Some(found);
                }
            }
        }
    }

    None
}
