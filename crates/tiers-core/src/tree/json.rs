//! Raw tree intake from already-parsed JSON
//!
//! Data-only trees carry no hooks; attach them afterwards with
//! [`attach_hooks`] before building.
//!
//! ```json,ignore
//! [
//!   { "userFacingName": "Quiz", "children": [
//!     { "userFacingName": "Countdown start", "uniqueId": "countdown_start",
//!       "defaultUserFacingValue": 10, "userSetting": false }
//!   ]}
//! ]
//! ```

use serde_json::{Map, Value};

use crate::error::{TiersError, TiersResult};

use super::raw::{LeafHooks, RawCategory, RawLeaf, RawSettingNode, find_raw_leaf_mut};

/// Turn a JSON array of node objects into raw nodes
pub fn raw_tree_from_json(value: &Value) -> TiersResult<Vec<RawSettingNode>> {
    parse_nodes(value)
}

/// Attach hooks to the raw leaf with `unique_id`
pub fn attach_hooks(
    nodes: &mut [RawSettingNode],
    unique_id: &str,
    hooks: LeafHooks,
) -> TiersResult<()> {
    let leaf = find_raw_leaf_mut(nodes, unique_id).ok_or_else(|| {
        TiersError::config_with_context(
            format!("No setting with uniqueId '{unique_id}' to attach hooks to"),
            "Attaching hooks to a raw settings tree",
        )
    })?;
    leaf.apply_hooks(hooks);
    Ok(())
}

fn parse_nodes(value: &Value) -> TiersResult<Vec<RawSettingNode>> {
    let items = value.as_array().ok_or_else(|| {
        TiersError::config("The settings, or a setting category's children property, is not an array")
    })?;
    items.iter().map(parse_node).collect()
}

fn parse_node(value: &Value) -> TiersResult<RawSettingNode> {
    let object = value
        .as_object()
        .ok_or_else(|| TiersError::config("Every settings tree entry must be an object"))?;

    if let Some(children) = object.get("children").filter(|children| !children.is_null()) {
        return Ok(RawSettingNode::Category(RawCategory {
            user_facing_name: string_field(object, "userFacingName")?,
            description: string_field(object, "description")?,
            children: parse_nodes(children)?,
        }));
    }

    Ok(RawSettingNode::Leaf(RawLeaf {
        unique_id: string_field(object, "uniqueId")?,
        user_facing_name: string_field(object, "userFacingName")?,
        description: string_field(object, "description")?,
        default_user_facing_value: object.get("defaultUserFacingValue").cloned(),
        server_setting: bool_field(object, "serverSetting")?,
        channel_setting: bool_field(object, "channelSetting")?,
        user_setting: bool_field(object, "userSetting")?,
        ..RawLeaf::default()
    }))
}

fn string_field(object: &Map<String, Value>, key: &str) -> TiersResult<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(other) => Err(TiersError::config(format!(
            "'{key}' must be a string, found {other}"
        ))),
    }
}

fn bool_field(object: &Map<String, Value>, key: &str) -> TiersResult<Option<bool>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(other) => Err(TiersError::config(format!(
            "'{key}' must be a boolean, found {other}"
        ))),
    }
}
