//! Atomically replaceable tree snapshot

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::TiersResult;

use super::raw::RawSettingNode;
use super::{SettingsTree, TreeConfig};

/// Owns the live settings tree
///
/// Readers take an `Arc` snapshot and keep using it for the rest of their
/// operation, so a concurrent reload never shows them a half-built tree.
/// Writers rebuild a complete tree and swap it in only if validation passed.
#[derive(Debug)]
pub struct TreeHandle {
    current: RwLock<Arc<SettingsTree>>,
    config: TreeConfig,
}

impl TreeHandle {
    /// Validate `raw` and wrap the result
    pub fn new(raw: &[RawSettingNode], config: TreeConfig) -> TiersResult<Self> {
        let tree = SettingsTree::build(raw, &config)?;
        tracing::info!(settings = tree.len(), "settings tree built");

        Ok(Self {
            current: RwLock::new(Arc::new(tree)),
            config,
        })
    }

    /// The current tree
    pub fn snapshot(&self) -> Arc<SettingsTree> {
        self.current.read().clone()
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Rebuild from `raw` and swap it in. The old tree stays live on error.
    pub fn replace(&self, raw: &[RawSettingNode]) -> TiersResult<Arc<SettingsTree>> {
        let mut current = self.current.write();
        let tree = self.rebuild(raw)?;
        *current = Arc::clone(&tree);
        Ok(tree)
    }

    /// Put `node` in front of the current roots and rebuild everything
    pub fn prepend(&self, node: RawSettingNode) -> TiersResult<Arc<SettingsTree>> {
        let mut current = self.current.write();
        let mut raw = Vec::with_capacity(current.roots().len() + 1);
        raw.push(node);
        raw.extend(current.to_raw());

        let tree = self.rebuild(&raw)?;
        *current = Arc::clone(&tree);
        Ok(tree)
    }

    fn rebuild(&self, raw: &[RawSettingNode]) -> TiersResult<Arc<SettingsTree>> {
        match SettingsTree::build(raw, &self.config) {
            Ok(tree) => {
                tracing::info!(settings = tree.len(), "settings tree rebuilt");
                Ok(Arc::new(tree))
            }
            Err(e) => {
                tracing::warn!(error = %e, "settings tree rebuild rejected, keeping previous tree");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SettingNode;

    fn handle() -> TreeHandle {
        TreeHandle::new(
            &[
                RawSettingNode::leaf("prefix", "Prefix", "k!").into(),
                RawSettingNode::category(
                    "Quiz",
                    [RawSettingNode::leaf("countdown_start", "Countdown", 10).into()],
                ),
            ],
            TreeConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_prepend_puts_node_first() {
        let handle = handle();
        let tree = handle
            .prepend(RawSettingNode::leaf("volume", "Volume", 5).into())
            .unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.roots()[0].user_facing_name(), "Volume");
        assert!(handle.snapshot().get("volume").is_some());
    }

    #[test]
    fn test_invalid_prepend_keeps_old_tree() {
        let handle = handle();
        let before = handle.snapshot();
        let result = handle.prepend(RawSettingNode::category(
            "Plugin",
            [RawSettingNode::leaf("countdown_start", "Duplicate", 3).into()],
        ));
        assert!(result.is_err());

        let after = handle.snapshot();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let handle = handle();
        let old = handle.snapshot();
        handle
            .replace(&[RawSettingNode::leaf("fresh", "Fresh", true).into()])
            .unwrap();

        assert!(old.get("prefix").is_some());
        let new = handle.snapshot();
        assert!(new.get("prefix").is_none());
        assert!(matches!(new.roots()[0], SettingNode::Leaf(_)));
    }
}
