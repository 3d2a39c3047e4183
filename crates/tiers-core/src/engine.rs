//! Settings engine facade
//!
//! [`SettingsEngine`] owns the live tree and a handle to the persistence
//! backend. Each call takes one tree snapshot up front and uses it until it
//! returns, so a concurrent [`SettingsEngine::replace_tree`] never changes the
//! tree underneath a running operation.

use serde_json::Value;
use std::sync::Arc;

use crate::error::TiersResult;
use crate::hooks::ConverterParams;
use crate::persistence::SettingsPersistence;
use crate::resolve::{ResolvedValue, SettingsResolver};
use crate::tree::{RawSettingNode, SettingLeaf, SettingsTree, TreeConfig, TreeHandle};
use crate::update::{SettingsUpdater, UpdateOutcome, value_is_valid_for_setting};

/// Tiered settings over a validated tree and a persistence backend
pub struct SettingsEngine {
    persistence: Arc<dyn SettingsPersistence>,
    tree: TreeHandle,
}

impl SettingsEngine {
    /// Validate `raw` and build an engine around it
    pub fn new(
        persistence: Arc<dyn SettingsPersistence>,
        raw: &[RawSettingNode],
        config: TreeConfig,
    ) -> TiersResult<Self> {
        Ok(Self {
            persistence,
            tree: TreeHandle::new(raw, config)?,
        })
    }

    pub fn persistence(&self) -> &Arc<dyn SettingsPersistence> {
        &self.persistence
    }

    pub fn tree_config(&self) -> &TreeConfig {
        self.tree.config()
    }

    // ---- tree ----

    /// The current validated tree, for display code
    pub fn raw_settings_tree(&self) -> Arc<SettingsTree> {
        self.tree.snapshot()
    }

    /// Prepend `node` to the root and revalidate the whole tree.
    ///
    /// On error the previous tree stays in place.
    pub fn add_node_to_root(&self, node: impl Into<RawSettingNode>) -> TiersResult<()> {
        self.tree.prepend(node.into()).map(|_| ())
    }

    /// Swap in a tree rebuilt from `raw`. On error the previous tree stays.
    pub fn replace_tree(&self, raw: &[RawSettingNode]) -> TiersResult<()> {
        self.tree.replace(raw).map(|_| ())
    }

    pub fn get_tree_node_for_unique_id(&self, unique_id: &str) -> Option<Arc<SettingLeaf>> {
        self.tree.snapshot().get(unique_id).cloned()
    }

    /// Run `to_internal` then `is_valid` on `value` without writing anything
    pub async fn user_facing_value_is_valid_for_setting(
        &self,
        setting: &SettingLeaf,
        value: Value,
        params: &ConverterParams,
    ) -> TiersResult<bool> {
        value_is_valid_for_setting(setting, value, params).await
    }

    // ---- reads ----

    pub async fn resolve_setting_value(
        &self,
        setting_id: &str,
        server_id: &str,
        channel_id: &str,
        user_id: &str,
        params: &ConverterParams,
    ) -> TiersResult<Option<ResolvedValue>> {
        let tree = self.tree.snapshot();
        SettingsResolver::new(&tree, self.persistence.as_ref())
            .resolve(setting_id, server_id, channel_id, user_id, params)
            .await
    }

    pub async fn get_internal_setting_value(
        &self,
        setting_id: &str,
        server_id: &str,
        channel_id: &str,
        user_id: &str,
        params: &ConverterParams,
    ) -> TiersResult<Option<Value>> {
        let tree = self.tree.snapshot();
        SettingsResolver::new(&tree, self.persistence.as_ref())
            .get_internal_value(setting_id, server_id, channel_id, user_id, params)
            .await
    }

    pub async fn get_user_facing_setting_value(
        &self,
        setting_id: &str,
        server_id: &str,
        channel_id: &str,
        user_id: &str,
        params: &ConverterParams,
    ) -> TiersResult<Option<Value>> {
        let tree = self.tree.snapshot();
        SettingsResolver::new(&tree, self.persistence.as_ref())
            .get_user_facing_value(setting_id, server_id, channel_id, user_id, params)
            .await
    }

    // ---- writes ----

    /// Set a server-wide value and drop that setting's channel overrides
    pub async fn set_server_wide_setting_value(
        &self,
        setting_id: &str,
        server_id: &str,
        new_user_facing_value: Value,
        user_is_server_admin: bool,
        params: &ConverterParams,
    ) -> TiersResult<UpdateOutcome> {
        let tree = self.tree.snapshot();
        SettingsUpdater::new(&tree, self.persistence.as_ref())
            .set_server_value(
                setting_id,
                server_id,
                new_user_facing_value,
                user_is_server_admin,
                params,
            )
            .await
    }

    pub async fn set_channel_setting_value(
        &self,
        setting_id: &str,
        server_id: &str,
        channel_id: &str,
        new_user_facing_value: Value,
        user_is_server_admin: bool,
        params: &ConverterParams,
    ) -> TiersResult<UpdateOutcome> {
        let tree = self.tree.snapshot();
        SettingsUpdater::new(&tree, self.persistence.as_ref())
            .set_channel_value(
                setting_id,
                server_id,
                channel_id,
                new_user_facing_value,
                user_is_server_admin,
                params,
            )
            .await
    }

    pub async fn set_user_setting_value(
        &self,
        setting_id: &str,
        user_id: &str,
        new_user_facing_value: Value,
        params: &ConverterParams,
    ) -> TiersResult<UpdateOutcome> {
        let tree = self.tree.snapshot();
        SettingsUpdater::new(&tree, self.persistence.as_ref())
            .set_user_value(setting_id, user_id, new_user_facing_value, params)
            .await
    }
}

impl std::fmt::Debug for SettingsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsEngine")
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}
