//! Engine builder

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tiers_core::error::TiersResult;
use tiers_core::persistence::{InMemoryPersistence, SettingsPersistence};
use tiers_core::tree::{LeafHooks, RawSettingNode, attach_hooks, raw_tree_from_json};
use tiers_core::SettingsEngine;

use crate::config::EngineConfig;

/// Wires a persistence backend, a raw tree and engine configuration into a
/// [`SettingsEngine`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use tiers_sdk::{EngineBuilder, InMemoryPersistence, LeafHooks, RangeValidator};
///
/// let tree = serde_json::json!([
///     { "userFacingName": "Quiz", "children": [
///         { "userFacingName": "Countdown start", "uniqueId": "countdown_start",
///           "defaultUserFacingValue": 10 }
///     ]}
/// ]);
///
/// let engine = EngineBuilder::new()
///     .with_persistence(Arc::new(InMemoryPersistence::new()))
///     .with_tree_json(&tree)?
///     .with_hooks(
///         "countdown_start",
///         LeafHooks::new().is_valid(RangeValidator::new(1.0, 10.0)?),
///     )?
///     .build()?;
/// assert!(engine.get_tree_node_for_unique_id("countdown_start").is_some());
/// # Ok::<(), tiers_sdk::TiersError>(())
/// ```
#[derive(Default)]
pub struct EngineBuilder {
    persistence: Option<Arc<dyn SettingsPersistence>>,
    tree: Vec<RawSettingNode>,
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_persistence(mut self, persistence: Arc<dyn SettingsPersistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Use code-defined nodes as the tree
    pub fn with_tree(mut self, tree: Vec<RawSettingNode>) -> Self {
        self.tree = tree;
        self
    }

    /// Append one node after the ones already given
    pub fn with_node(mut self, node: impl Into<RawSettingNode>) -> Self {
        self.tree.push(node.into());
        self
    }

    /// Replace the tree with nodes read from an already-parsed JSON document
    pub fn with_tree_json(mut self, tree: &Value) -> TiersResult<Self> {
        self.tree = raw_tree_from_json(tree)?;
        Ok(self)
    }

    /// Attach hooks to a leaf already present in the tree
    pub fn with_hooks(mut self, unique_id: &str, hooks: LeafHooks) -> TiersResult<Self> {
        attach_hooks(&mut self.tree, unique_id, hooks)?;
        Ok(self)
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Layer a config file and `TIERS_*` environment variables over the
    /// current configuration
    pub fn with_config_file(mut self, path: impl AsRef<Path>) -> TiersResult<Self> {
        let loaded = EngineConfig::load(path.as_ref())?;
        self.config.merge(loaded);
        Ok(self)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate the tree and build the engine.
    ///
    /// Falls back to [`InMemoryPersistence`] when no backend was given.
    pub fn build(self) -> TiersResult<SettingsEngine> {
        let persistence = self.persistence.unwrap_or_else(|| {
            tracing::warn!("no persistence backend configured, settings will not outlive the process");
            Arc::new(InMemoryPersistence::new())
        });

        SettingsEngine::new(persistence, &self.tree, self.config.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use tiers_core::validators::BooleanValidator;
    use tiers_core::{TiersError, UpdateRejectionReason};

    #[tokio::test]
    async fn test_build_from_nodes() {
        let engine = EngineBuilder::new()
            .with_node(RawSettingNode::leaf("prefix", "Prefix", "k!"))
            .with_node(
                RawSettingNode::leaf("reactions", "Reactions", true)
                    .with_is_valid(BooleanValidator),
            )
            .build()
            .unwrap();

        let outcome = engine
            .set_user_setting_value("reactions", "u1", json!("yes"), &Value::Null)
            .await
            .unwrap();
        assert_eq!(
            outcome.rejection_reason(),
            Some(UpdateRejectionReason::InvalidValue)
        );
        assert_eq!(engine.raw_settings_tree().len(), 2);
    }

    #[test]
    fn test_hooks_for_unknown_leaf() {
        let err = EngineBuilder::new()
            .with_tree_json(&json!([
                { "userFacingName": "Prefix", "uniqueId": "prefix", "defaultUserFacingValue": "k!" }
            ]))
            .unwrap()
            .with_hooks("volume", LeafHooks::new().is_valid(BooleanValidator))
            .err()
            .unwrap();
        assert!(matches!(err, TiersError::Config { .. }));
    }

    #[test]
    fn test_config_file_applies_tree_limits() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("tiers.toml");
        fs::write(&config_path, "[tree]\nallow_empty_tree = false\n").unwrap();

        let builder = EngineBuilder::new().with_config_file(&config_path).unwrap();
        assert!(!builder.config().tree.allow_empty_tree);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_config_file_layers_over_explicit_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("tiers.toml");
        fs::write(&config_path, "[tree]\nmax_depth = 3\n").unwrap();

        let mut config = EngineConfig::default();
        config.logging.format = LogFormat::Json;
        config.tree.allow_empty_tree = false;

        let builder = EngineBuilder::new()
            .with_config(config)
            .with_config_file(&config_path)
            .unwrap();
        assert_eq!(builder.config().logging.format, LogFormat::Json);
        assert!(!builder.config().tree.allow_empty_tree);
        assert_eq!(builder.config().tree.max_depth, Some(3));
    }
}
