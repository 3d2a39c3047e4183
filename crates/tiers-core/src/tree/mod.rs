//! Settings tree
//!
//! The tree is an ordered forest of categories (display grouping) and leaves
//! (configurable options). It is built from raw input in a single validation
//! pass and is immutable afterwards; changes go through [`TreeHandle`], which
//! rebuilds the whole forest and swaps it in atomically.
//!
//! # Example
//!
//! ```rust
//! use tiers_core::tree::{RawSettingNode, SettingsTree, TreeConfig};
//! use tiers_core::validators::RangeValidator;
//!
//! let raw = vec![RawSettingNode::category(
//!     "Quiz",
//!     [RawSettingNode::leaf("countdown_start", "Countdown start", 10)
//!         .with_is_valid(RangeValidator::new(1.0, 10.0)?)
//!         .into()],
//! )];
//!
//! let tree = SettingsTree::build(&raw, &TreeConfig::default())?;
//! assert!(tree.get("countdown_start").is_some());
//! # Ok::<(), tiers_core::TiersError>(())
//! ```

mod handle;
mod json;
mod node;
mod raw;
mod validate;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TiersResult;

pub use handle::TreeHandle;
pub use json::{attach_hooks, raw_tree_from_json};
pub use node::{SettingCategory, SettingLeaf, SettingNode, SettingScope};
pub use raw::{LeafHooks, RawCategory, RawLeaf, RawSettingNode, find_raw_leaf_mut};
pub use validate::build_tree;

/// Tree validation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Accept a tree with no nodes at all
    pub allow_empty_tree: bool,
    /// Deepest allowed nesting, counting root nodes as level 1
    pub max_depth: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            allow_empty_tree: true,
            max_depth: None,
        }
    }
}

impl TreeConfig {
    /// Merge with another tree config; the other side wins where it differs
    /// from the default
    pub fn merge(&mut self, other: TreeConfig) {
        if other.allow_empty_tree != TreeConfig::default().allow_empty_tree {
            self.allow_empty_tree = other.allow_empty_tree;
        }

        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
    }
}

/// A validated settings forest with a `unique_id -> leaf` index
#[derive(Debug, Clone, Default)]
pub struct SettingsTree {
    roots: Vec<SettingNode>,
    index: HashMap<String, Arc<SettingLeaf>>,
}

impl SettingsTree {
    /// Validate `raw` and build a tree from it
    pub fn build(raw: &[RawSettingNode], config: &TreeConfig) -> TiersResult<Self> {
        build_tree(raw, config)
    }

    /// A tree with no nodes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Root nodes in display order
    pub fn roots(&self) -> &[SettingNode] {
        &self.roots
    }

    /// Look up a leaf by its unique id
    pub fn get(&self, unique_id: &str) -> Option<&Arc<SettingLeaf>> {
        self.index.get(unique_id)
    }

    /// All leaves, depth-first in display order
    pub fn leaves(&self) -> impl Iterator<Item = &Arc<SettingLeaf>> {
        let mut leaves = Vec::with_capacity(self.index.len());
        collect_leaves(&self.roots, &mut leaves);
        leaves.into_iter()
    }

    /// Number of leaves
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Convert back into raw nodes, hooks included
    pub fn to_raw(&self) -> Vec<RawSettingNode> {
        self.roots.iter().map(SettingNode::to_raw).collect()
    }
}

fn collect_leaves<'a>(nodes: &'a [SettingNode], out: &mut Vec<&'a Arc<SettingLeaf>>) {
    for node in nodes {
        match node {
            SettingNode::Leaf(leaf) => out.push(leaf),
            SettingNode::Category(category) => collect_leaves(&category.children, out),
        }
    }
}
