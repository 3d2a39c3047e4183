//! Settings tree validation
//!
//! One pass walks the raw forest depth-first, pre-order. Categories must be
//! named and non-empty; leaves must be named, carry a whitespace-free id that
//! no earlier leaf used, and have a default. Unset scope flags become `true`
//! and unset hooks become the stock defaults. Duplicate tracking is local to
//! the pass, so validating the same forest twice gives the same answer.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{TiersError, TiersResult};
use crate::hooks::{AlwaysValid, IdentityConverter, StringifyConverter};

use super::node::{SettingCategory, SettingLeaf, SettingNode};
use super::raw::{RawCategory, RawLeaf, RawSettingNode};
use super::{SettingsTree, TreeConfig};

/// Validate `raw` and build the tree with its id index
pub fn build_tree(raw: &[RawSettingNode], config: &TreeConfig) -> TiersResult<SettingsTree> {
    if raw.is_empty() && !config.allow_empty_tree {
        return Err(TiersError::config("The settings tree has no nodes"));
    }

    let mut pass = ValidationPass {
        index: HashMap::new(),
        max_depth: config.max_depth,
    };
    let roots = pass.validate_nodes(raw, 1)?;

    Ok(SettingsTree {
        roots,
        index: pass.index,
    })
}

struct ValidationPass {
    index: HashMap<String, Arc<SettingLeaf>>,
    max_depth: Option<usize>,
}

impl ValidationPass {
    fn validate_nodes(
        &mut self,
        nodes: &[RawSettingNode],
        depth: usize,
    ) -> TiersResult<Vec<SettingNode>> {
        if let Some(max_depth) = self.max_depth {
            if depth > max_depth {
                return Err(TiersError::config(format!(
                    "Settings are nested deeper than the configured limit of {max_depth} levels"
                )));
            }
        }

        nodes
            .iter()
            .map(|node| match node {
                RawSettingNode::Category(category) => self
                    .validate_category(category, depth)
                    .map(SettingNode::Category),
                RawSettingNode::Leaf(leaf) => self.validate_leaf(leaf).map(SettingNode::Leaf),
            })
            .collect()
    }

    fn validate_category(
        &mut self,
        category: &RawCategory,
        depth: usize,
    ) -> TiersResult<SettingCategory> {
        let user_facing_name = match category.user_facing_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(TiersError::config(
                    "A settings category does not have a user facing name.",
                ));
            }
        };

        if category.children.is_empty() {
            return Err(TiersError::config(format!(
                "The settings category '{user_facing_name}' has no children."
            )));
        }

        let children = self.validate_nodes(&category.children, depth + 1)?;

        Ok(SettingCategory {
            user_facing_name,
            description: category.description.clone(),
            children,
        })
    }

    fn validate_leaf(&mut self, leaf: &RawLeaf) -> TiersResult<Arc<SettingLeaf>> {
        let unique_id = leaf.unique_id.as_deref();
        let invalid = |message: &str| TiersError::invalid_setting(unique_id, message);

        let user_facing_name = match leaf.user_facing_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(invalid("Invalid or nonexistent userFacingName property")),
        };
        let unique_id = match unique_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(invalid("Invalid or nonexistent uniqueId property.")),
        };
        if self.index.contains_key(unique_id) {
            return Err(invalid("There is already a setting with that uniqueId"));
        }
        let Some(default_user_facing_value) = leaf.default_user_facing_value.clone() else {
            return Err(invalid("No defaultUserFacingValue property."));
        };
        if unique_id.chars().any(char::is_whitespace) {
            return Err(invalid("Setting unique IDs must not contain whitespace."));
        }

        let validated = Arc::new(SettingLeaf {
            unique_id: unique_id.to_string(),
            user_facing_name: user_facing_name.to_string(),
            description: leaf.description.clone(),
            default_user_facing_value,
            server_setting: leaf.server_setting.unwrap_or(true),
            channel_setting: leaf.channel_setting.unwrap_or(true),
            user_setting: leaf.user_setting.unwrap_or(true),
            to_internal: leaf
                .to_internal
                .clone()
                .unwrap_or_else(|| Arc::new(IdentityConverter)),
            to_user_facing: leaf
                .to_user_facing
                .clone()
                .unwrap_or_else(|| Arc::new(StringifyConverter)),
            is_valid: leaf.is_valid.clone().unwrap_or_else(|| Arc::new(AlwaysValid)),
        });

        self.index
            .insert(unique_id.to_string(), Arc::clone(&validated));
        Ok(validated)
    }
}
