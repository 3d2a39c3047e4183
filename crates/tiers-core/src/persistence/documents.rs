//! Per-entity documents holding setting overrides
//!
//! Documents belong to the persistence backend and may carry data for other
//! subsystems; the settings engine only reads and writes the `settings`
//! sub-object and keeps everything else as it found it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// `setting id -> internal value`
pub type SettingValues = HashMap<String, Value>;

/// Data stored for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(default)]
    pub settings: UserSettings,

    /// Fields owned by other subsystems
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// User-scope overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub global: SettingValues,
}

impl UserDocument {
    pub fn setting(&self, setting_id: &str) -> Option<&Value> {
        self.settings.global.get(setting_id)
    }

    pub fn set_setting(&mut self, setting_id: impl Into<String>, value: Value) {
        self.settings.global.insert(setting_id.into(), value);
    }

    pub fn remove_setting(&mut self, setting_id: &str) -> Option<Value> {
        self.settings.global.remove(setting_id)
    }
}

/// Data stored for one server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerDocument {
    #[serde(default)]
    pub settings: ServerSettings,

    /// Fields owned by other subsystems
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Server-wide and per-channel overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettings {
    #[serde(default)]
    pub server_settings: SettingValues,

    /// `channel id -> (setting id -> internal value)`
    #[serde(default)]
    pub channel_settings: HashMap<String, SettingValues>,
}

impl ServerDocument {
    pub fn server_setting(&self, setting_id: &str) -> Option<&Value> {
        self.settings.server_settings.get(setting_id)
    }

    pub fn channel_setting(&self, channel_id: &str, setting_id: &str) -> Option<&Value> {
        self.settings
            .channel_settings
            .get(channel_id)
            .and_then(|values| values.get(setting_id))
    }

    pub fn set_server_setting(&mut self, setting_id: impl Into<String>, value: Value) {
        self.settings.server_settings.insert(setting_id.into(), value);
    }

    /// Set a channel override, creating the channel's map if needed
    pub fn set_channel_setting(
        &mut self,
        channel_id: impl Into<String>,
        setting_id: impl Into<String>,
        value: Value,
    ) {
        self.settings
            .channel_settings
            .entry(channel_id.into())
            .or_default()
            .insert(setting_id.into(), value);
    }

    pub fn remove_server_setting(&mut self, setting_id: &str) -> Option<Value> {
        self.settings.server_settings.remove(setting_id)
    }

    pub fn remove_channel_setting(&mut self, channel_id: &str, setting_id: &str) -> Option<Value> {
        let values = self.settings.channel_settings.get_mut(channel_id)?;
        let removed = values.remove(setting_id);
        if values.is_empty() {
            self.settings.channel_settings.remove(channel_id);
        }
        removed
    }

    /// Drop `setting_id` from every channel of this server.
    ///
    /// Channels left without overrides are removed. Returns how many channel
    /// overrides were dropped.
    pub fn clear_channel_overrides(&mut self, setting_id: &str) -> usize {
        let mut cleared = 0;
        self.settings.channel_settings.retain(|_, values| {
            if values.remove(setting_id).is_some() {
                cleared += 1;
            }
            !values.is_empty()
        });
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_server_document_storage_shape() {
        let mut doc = ServerDocument::default();
        doc.set_server_setting("prefix", json!("k!"));
        doc.set_channel_setting("chan-1", "volume", json!(3));

        let stored = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            stored,
            json!({
                "settings": {
                    "serverSettings": { "prefix": "k!" },
                    "channelSettings": { "chan-1": { "volume": 3 } }
                }
            })
        );
    }

    #[test]
    fn test_foreign_fields_survive() {
        let stored = json!({
            "blacklisted": true,
            "settings": { "global": { "volume": 4 } }
        });
        let doc: UserDocument = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(doc.setting("volume"), Some(&json!(4)));
        assert_eq!(doc.other.get("blacklisted"), Some(&json!(true)));
        assert_eq!(serde_json::to_value(&doc).unwrap(), stored);
    }

    #[test]
    fn test_missing_settings_object() {
        let doc: ServerDocument = serde_json::from_value(json!({})).unwrap();
        assert!(doc.server_setting("prefix").is_none());
        assert!(doc.channel_setting("chan", "prefix").is_none());
    }

    #[test]
    fn test_clear_channel_overrides() {
        let mut doc = ServerDocument::default();
        doc.set_channel_setting("a", "countdown_start", json!(3));
        doc.set_channel_setting("a", "prefix", json!("?"));
        doc.set_channel_setting("b", "countdown_start", json!(4));
        doc.set_channel_setting("c", "prefix", json!("!"));

        assert_eq!(doc.clear_channel_overrides("countdown_start"), 2);
        assert!(doc.channel_setting("a", "countdown_start").is_none());
        assert_eq!(doc.channel_setting("a", "prefix"), Some(&json!("?")));
        assert!(!doc.settings.channel_settings.contains_key("b"));
        assert_eq!(doc.channel_setting("c", "prefix"), Some(&json!("!")));
    }

    #[test]
    fn test_remove_channel_setting_drops_empty_channel() {
        let mut doc = ServerDocument::default();
        doc.set_channel_setting("a", "volume", json!(1));
        assert_eq!(doc.remove_channel_setting("a", "volume"), Some(json!(1)));
        assert!(doc.settings.channel_settings.is_empty());
        assert_eq!(doc.remove_channel_setting("a", "volume"), None);
    }
}
