//! Settings update pipeline
//!
//! Every update runs Resolve -> Validate -> Commit and stops at the first
//! failure:
//!
//! 1. **Resolve** the leaf by id (`SettingDoesNotExist` otherwise).
//! 2. **Check** admin status for server and channel scope (`NotAdmin`), then
//!    the leaf's flag for the requested scope (`NotAllowed*`).
//! 3. **Validate** by running `to_internal` and `is_valid` (`InvalidValue`).
//!    A hook that returns `Err` fails the whole operation instead.
//! 4. **Commit** with a single document edit through the persistence
//!    collaborator.
//!
//! A server-wide commit also removes that setting's override from every
//! channel of the server, in the same edit.

mod outcome;

use serde_json::Value;
use std::sync::Arc;

use crate::error::TiersResult;
use crate::hooks::ConverterParams;
use crate::persistence::{ServerDocument, SettingsPersistence, UserDocument};
use crate::tree::{SettingLeaf, SettingScope, SettingsTree};

pub use outcome::{AcceptedUpdate, UpdateOutcome, UpdateRejection, UpdateRejectionReason};

/// The document and slot an update writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateTarget<'a> {
    Server { server_id: &'a str },
    Channel { server_id: &'a str, channel_id: &'a str },
    User { user_id: &'a str },
}

impl UpdateTarget<'_> {
    pub fn scope(&self) -> SettingScope {
        match self {
            Self::Server { .. } => SettingScope::Server,
            Self::Channel { .. } => SettingScope::Channel,
            Self::User { .. } => SettingScope::User,
        }
    }
}

/// Write path over one tree snapshot
pub struct SettingsUpdater<'a> {
    tree: &'a SettingsTree,
    persistence: &'a dyn SettingsPersistence,
}

impl<'a> SettingsUpdater<'a> {
    pub fn new(tree: &'a SettingsTree, persistence: &'a dyn SettingsPersistence) -> Self {
        Self { tree, persistence }
    }

    /// Set a server-wide value. Requires admin.
    pub async fn set_server_value(
        &self,
        setting_id: &str,
        server_id: &str,
        new_user_facing_value: Value,
        user_is_server_admin: bool,
        params: &ConverterParams,
    ) -> TiersResult<UpdateOutcome> {
        self.update(
            setting_id,
            UpdateTarget::Server { server_id },
            new_user_facing_value,
            user_is_server_admin,
            params,
        )
        .await
    }

    /// Set a channel value. Requires admin.
    pub async fn set_channel_value(
        &self,
        setting_id: &str,
        server_id: &str,
        channel_id: &str,
        new_user_facing_value: Value,
        user_is_server_admin: bool,
        params: &ConverterParams,
    ) -> TiersResult<UpdateOutcome> {
        self.update(
            setting_id,
            UpdateTarget::Channel {
                server_id,
                channel_id,
            },
            new_user_facing_value,
            user_is_server_admin,
            params,
        )
        .await
    }

    /// Set a per-user value. Never requires admin.
    pub async fn set_user_value(
        &self,
        setting_id: &str,
        user_id: &str,
        new_user_facing_value: Value,
        params: &ConverterParams,
    ) -> TiersResult<UpdateOutcome> {
        self.update(
            setting_id,
            UpdateTarget::User { user_id },
            new_user_facing_value,
            false,
            params,
        )
        .await
    }

    /// Run the full pipeline against `target`
    #[tracing::instrument(
        name = "settings_update",
        skip_all,
        fields(setting = setting_id, scope = %target.scope())
    )]
    pub async fn update(
        &self,
        setting_id: &str,
        target: UpdateTarget<'_>,
        new_user_facing_value: Value,
        user_is_server_admin: bool,
        params: &ConverterParams,
    ) -> TiersResult<UpdateOutcome> {
        let outcome = self
            .check(
                setting_id,
                target.scope(),
                new_user_facing_value,
                user_is_server_admin,
                params,
            )
            .await?;

        match &outcome {
            UpdateOutcome::Accepted(accepted) => {
                self.commit(target, setting_id, accepted.new_internal_value.clone())
                    .await?;
                tracing::debug!("setting update committed");
            }
            UpdateOutcome::Rejected(rejection) => {
                tracing::debug!(reason = %rejection.reason, "setting update rejected");
            }
        }

        Ok(outcome)
    }

    /// Resolve and validate without writing anything
    pub async fn check(
        &self,
        setting_id: &str,
        scope: SettingScope,
        new_user_facing_value: Value,
        user_is_server_admin: bool,
        params: &ConverterParams,
    ) -> TiersResult<UpdateOutcome> {
        let Some(leaf) = self.tree.get(setting_id) else {
            return Ok(UpdateRejection::no_such_setting(setting_id).into());
        };

        if scope != SettingScope::User && !user_is_server_admin {
            return Ok(UpdateRejection::new(UpdateRejectionReason::NotAdmin, leaf).into());
        }
        if !leaf.allows(scope) {
            return Ok(
                UpdateRejection::new(UpdateRejectionReason::not_allowed_in(scope), leaf).into(),
            );
        }

        let new_internal_value = leaf
            .to_internal(new_user_facing_value.clone(), params)
            .await?;
        if !leaf.is_valid(&new_internal_value, params).await? {
            return Ok(UpdateRejection::invalid_value(leaf, new_user_facing_value).into());
        }

        Ok(UpdateOutcome::Accepted(AcceptedUpdate {
            new_user_facing_value,
            new_internal_value,
            setting: Arc::clone(leaf),
        }))
    }

    async fn commit(
        &self,
        target: UpdateTarget<'_>,
        setting_id: &str,
        new_internal_value: Value,
    ) -> TiersResult<()> {
        let setting_id = setting_id.to_string();

        match target {
            UpdateTarget::Server { server_id } => {
                self.persistence
                    .edit_data_for_server(
                        server_id,
                        Box::new(move |doc: &mut ServerDocument| {
                            let cleared = doc.clear_channel_overrides(&setting_id);
                            if cleared > 0 {
                                tracing::debug!(
                                    setting = %setting_id,
                                    cleared,
                                    "server-wide value replaced channel overrides"
                                );
                            }
                            doc.set_server_setting(setting_id, new_internal_value);
                        }),
                    )
                    .await?
            }
            UpdateTarget::Channel {
                server_id,
                channel_id,
            } => {
                let channel_id = channel_id.to_string();
                self.persistence
                    .edit_data_for_server(
                        server_id,
                        Box::new(move |doc: &mut ServerDocument| {
                            doc.set_channel_setting(channel_id, setting_id, new_internal_value);
                        }),
                    )
                    .await?
            }
            UpdateTarget::User { user_id } => {
                self.persistence
                    .edit_data_for_user(
                        user_id,
                        Box::new(move |doc: &mut UserDocument| {
                            doc.set_setting(setting_id, new_internal_value);
                        }),
                    )
                    .await?
            }
        }

        Ok(())
    }
}

/// Whether `user_facing_value` converts to a valid internal value for `leaf`.
///
/// Checks neither permissions nor scope flags and writes nothing.
pub async fn value_is_valid_for_setting(
    leaf: &SettingLeaf,
    user_facing_value: Value,
    params: &ConverterParams,
) -> TiersResult<bool> {
    let internal = leaf.to_internal(user_facing_value, params).await?;
    leaf.is_valid(&internal, params).await
}
