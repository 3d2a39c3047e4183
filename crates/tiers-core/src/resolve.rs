//! Effective value resolution
//!
//! The value of a leaf for a (server, channel, user) triple is the first
//! override found in this order:
//!
//! 1. user override (`UserDocument.settings.global`)
//! 2. channel override (`ServerDocument.settings.channelSettings[channel]`)
//! 3. server override (`ServerDocument.settings.serverSettings`)
//! 4. the leaf default, run through `to_internal`
//!
//! Exactly one scope supplies the value; scopes are never merged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TiersResult;
use crate::hooks::ConverterParams;
use crate::persistence::{ServerDocument, SettingsPersistence, UserDocument};
use crate::tree::SettingsTree;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    User,
    Channel,
    Server,
    Default,
}

/// An internal value together with the scope that supplied it
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    pub value: Value,
    pub source: ValueSource,
}

/// Read path over one tree snapshot
pub struct SettingsResolver<'a> {
    tree: &'a SettingsTree,
    persistence: &'a dyn SettingsPersistence,
}

impl<'a> SettingsResolver<'a> {
    pub fn new(tree: &'a SettingsTree, persistence: &'a dyn SettingsPersistence) -> Self {
        Self { tree, persistence }
    }

    /// Resolve the internal value and report its source.
    ///
    /// `Ok(None)` when no leaf has `setting_id`.
    pub async fn resolve(
        &self,
        setting_id: &str,
        server_id: &str,
        channel_id: &str,
        user_id: &str,
        params: &ConverterParams,
    ) -> TiersResult<Option<ResolvedValue>> {
        let Some(leaf) = self.tree.get(setting_id) else {
            tracing::debug!(setting = setting_id, "no such setting, nothing to resolve");
            return Ok(None);
        };

        let (user_data, server_data) = tokio::try_join!(
            self.persistence.get_data_for_user(user_id),
            self.persistence.get_data_for_server(server_id),
        )?;

        let resolved = match find_override(&user_data, &server_data, channel_id, setting_id) {
            Some(found) => found,
            None => ResolvedValue {
                value: leaf.default_internal_value(params).await?,
                source: ValueSource::Default,
            },
        };

        tracing::debug!(
            setting = setting_id,
            source = ?resolved.source,
            "resolved setting value"
        );
        Ok(Some(resolved))
    }

    /// The effective internal value, `None` for an unknown setting
    pub async fn get_internal_value(
        &self,
        setting_id: &str,
        server_id: &str,
        channel_id: &str,
        user_id: &str,
        params: &ConverterParams,
    ) -> TiersResult<Option<Value>> {
        Ok(self
            .resolve(setting_id, server_id, channel_id, user_id, params)
            .await?
            .map(|resolved| resolved.value))
    }

    /// The effective value mapped through the leaf's `to_user_facing` hook
    pub async fn get_user_facing_value(
        &self,
        setting_id: &str,
        server_id: &str,
        channel_id: &str,
        user_id: &str,
        params: &ConverterParams,
    ) -> TiersResult<Option<Value>> {
        let Some(leaf) = self.tree.get(setting_id) else {
            return Ok(None);
        };

        match self
            .get_internal_value(setting_id, server_id, channel_id, user_id, params)
            .await?
        {
            Some(internal) => leaf.to_user_facing(internal, params).await.map(Some),
            None => Ok(None),
        }
    }
}

/// The highest-precedence override stored for `setting_id`, if any
pub fn find_override(
    user_data: &UserDocument,
    server_data: &ServerDocument,
    channel_id: &str,
    setting_id: &str,
) -> Option<ResolvedValue> {
    let found = |value: &Value, source| ResolvedValue {
        value: value.clone(),
        source,
    };

    user_data
        .setting(setting_id)
        .map(|value| found(value, ValueSource::User))
        .or_else(|| {
            server_data
                .channel_setting(channel_id, setting_id)
                .map(|value| found(value, ValueSource::Channel))
        })
        .or_else(|| {
            server_data
                .server_setting(setting_id)
                .map(|value| found(value, ValueSource::Server))
        })
}
