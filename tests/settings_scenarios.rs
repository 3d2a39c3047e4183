//! End-to-end settings scenarios
//!
//! Drives the engine through the SDK builder against the in-memory backend.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;
use tiers::{
    EngineBuilder, FnConverter, HookResult, InMemoryPersistence, RangeValidator, RawSettingNode,
    ServerDocument, SettingsEngine, SettingsPersistence, TiersError, UpdateRejectionReason,
    UserDocument, ValueConverter, ValueSource,
};

const SERVER: &str = "server-1";
const CHANNEL: &str = "channel-1";
const OTHER_CHANNEL: &str = "channel-2";
const USER: &str = "user-1";

/// Parses user input like "12" into a number and fails on anything else
struct StrictNumber;

#[async_trait]
impl ValueConverter for StrictNumber {
    async fn convert(&self, value: Value, _params: &Value) -> HookResult<Value> {
        match value {
            Value::Number(_) => Ok(value),
            Value::String(text) => text
                .trim()
                .parse::<f64>()
                .map(Value::from)
                .map_err(|e| format!("not a number: {e}").into()),
            other => Err(format!("cannot convert {other}").into()),
        }
    }
}

fn setup() -> (SettingsEngine, Arc<InMemoryPersistence>) {
    let persistence = Arc::new(InMemoryPersistence::new());
    let engine = EngineBuilder::new()
        .with_persistence(persistence.clone())
        .with_node(RawSettingNode::category(
            "Quiz",
            [
                RawSettingNode::leaf("countdown_start", "Countdown start", 10)
                    .with_is_valid(RangeValidator::new(1.0, 10.0).unwrap())
                    .into(),
                RawSettingNode::leaf("score_limit", "Score limit", "20")
                    .with_to_internal(StrictNumber)
                    .into(),
            ],
        ))
        .with_node(RawSettingNode::category(
            "General",
            [
                RawSettingNode::leaf("prefix", "Command prefix", "k!").into(),
                RawSettingNode::leaf("language", "Language", "en")
                    .with_server_setting(false)
                    .into(),
                RawSettingNode::leaf("theme", "Theme", "dark")
                    .with_user_setting(false)
                    .into(),
                RawSettingNode::leaf("shout", "Shout", "hi")
                    .with_to_user_facing(FnConverter::new(|value, _| {
                        Ok(json!(value.as_str().unwrap_or_default().to_uppercase()))
                    }))
                    .into(),
            ],
        ))
        .build()
        .unwrap();
    (engine, persistence)
}

async fn internal(engine: &SettingsEngine, setting_id: &str, channel_id: &str) -> Option<Value> {
    engine
        .get_internal_setting_value(setting_id, SERVER, channel_id, USER, &Value::Null)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_precedence_walks_down_as_overrides_are_removed() {
    let (engine, persistence) = setup();

    for (target, value) in [("server", 2), ("channel", 3), ("user", 4)] {
        let outcome = match target {
            "server" => {
                engine
                    .set_server_wide_setting_value("countdown_start", SERVER, json!(value), true, &Value::Null)
                    .await
            }
            "channel" => {
                engine
                    .set_channel_setting_value(
                        "countdown_start",
                        SERVER,
                        CHANNEL,
                        json!(value),
                        true,
                        &Value::Null,
                    )
                    .await
            }
            _ => {
                engine
                    .set_user_setting_value("countdown_start", USER, json!(value), &Value::Null)
                    .await
            }
        }
        .unwrap();
        assert!(outcome.is_accepted(), "{target} update: {outcome}");
    }
    assert_eq!(internal(&engine, "countdown_start", CHANNEL).await, Some(json!(4)));

    persistence
        .edit_data_for_user(
            USER,
            Box::new(|doc: &mut UserDocument| {
                doc.remove_setting("countdown_start");
            }),
        )
        .await
        .unwrap();
    assert_eq!(internal(&engine, "countdown_start", CHANNEL).await, Some(json!(3)));

    persistence
        .edit_data_for_server(
            SERVER,
            Box::new(|doc: &mut ServerDocument| {
                doc.remove_channel_setting(CHANNEL, "countdown_start");
            }),
        )
        .await
        .unwrap();
    assert_eq!(internal(&engine, "countdown_start", CHANNEL).await, Some(json!(2)));

    persistence
        .edit_data_for_server(
            SERVER,
            Box::new(|doc: &mut ServerDocument| {
                doc.remove_server_setting("countdown_start");
            }),
        )
        .await
        .unwrap();
    let resolved = engine
        .resolve_setting_value("countdown_start", SERVER, CHANNEL, USER, &Value::Null)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.value, json!(10));
    assert_eq!(resolved.source, ValueSource::Default);
}

#[tokio::test]
async fn test_countdown_example() {
    let (engine, persistence) = setup();

    let outcome = engine
        .set_channel_setting_value("countdown_start", SERVER, CHANNEL, json!(3), true, &Value::Null)
        .await
        .unwrap();
    assert!(outcome.is_accepted());
    assert_eq!(internal(&engine, "countdown_start", CHANNEL).await, Some(json!(3)));

    let outcome = engine
        .set_server_wide_setting_value("countdown_start", SERVER, json!(15), true, &Value::Null)
        .await
        .unwrap();
    let rejection = outcome.rejection().unwrap();
    assert_eq!(rejection.reason, UpdateRejectionReason::InvalidValue);
    assert_eq!(rejection.rejected_user_facing_value, Some(json!(15)));
    assert_eq!(internal(&engine, "countdown_start", CHANNEL).await, Some(json!(3)));

    let outcome = engine
        .set_server_wide_setting_value("countdown_start", SERVER, json!(7), true, &Value::Null)
        .await
        .unwrap();
    assert_eq!(outcome.accepted().unwrap().new_internal_value, json!(7));

    assert_eq!(internal(&engine, "countdown_start", CHANNEL).await, Some(json!(7)));
    assert_eq!(internal(&engine, "countdown_start", OTHER_CHANNEL).await, Some(json!(7)));

    let stored = persistence.get_data_for_server(SERVER).await.unwrap();
    assert!(stored.settings.channel_settings.is_empty());
}

#[tokio::test]
async fn test_server_wide_update_leaves_other_settings_alone() {
    let (engine, persistence) = setup();

    for (setting, value) in [("countdown_start", json!(3)), ("prefix", json!("?"))] {
        engine
            .set_channel_setting_value(setting, SERVER, CHANNEL, value, true, &Value::Null)
            .await
            .unwrap();
    }
    engine
        .set_channel_setting_value("countdown_start", SERVER, OTHER_CHANNEL, json!(5), true, &Value::Null)
        .await
        .unwrap();

    engine
        .set_server_wide_setting_value("countdown_start", SERVER, json!(8), true, &Value::Null)
        .await
        .unwrap();

    let stored = persistence.get_data_for_server(SERVER).await.unwrap();
    assert!(stored.channel_setting(CHANNEL, "countdown_start").is_none());
    assert!(stored.channel_setting(OTHER_CHANNEL, "countdown_start").is_none());
    assert_eq!(stored.channel_setting(CHANNEL, "prefix"), Some(&json!("?")));
    assert_eq!(internal(&engine, "prefix", CHANNEL).await, Some(json!("?")));
}

#[tokio::test]
async fn test_admin_rules() {
    let (engine, persistence) = setup();

    let outcome = engine
        .set_server_wide_setting_value("countdown_start", SERVER, json!(5), false, &Value::Null)
        .await
        .unwrap();
    assert_eq!(outcome.rejection_reason(), Some(UpdateRejectionReason::NotAdmin));

    let outcome = engine
        .set_channel_setting_value("countdown_start", SERVER, CHANNEL, json!(5), false, &Value::Null)
        .await
        .unwrap();
    assert_eq!(outcome.rejection_reason(), Some(UpdateRejectionReason::NotAdmin));
    assert!(!persistence.has_server(SERVER).await);

    let outcome = engine
        .set_user_setting_value("countdown_start", USER, json!(5), &Value::Null)
        .await
        .unwrap();
    assert!(outcome.is_accepted());
}

#[tokio::test]
async fn test_scope_flags_apply_to_admins() {
    let (engine, _) = setup();

    let outcome = engine
        .set_server_wide_setting_value("language", SERVER, json!("fr"), true, &Value::Null)
        .await
        .unwrap();
    assert_eq!(
        outcome.rejection_reason(),
        Some(UpdateRejectionReason::NotAllowedInServer)
    );

    let outcome = engine
        .set_user_setting_value("theme", USER, json!("light"), &Value::Null)
        .await
        .unwrap();
    assert_eq!(
        outcome.rejection_reason(),
        Some(UpdateRejectionReason::NotAllowedForUser)
    );
    assert_eq!(outcome.to_string(), "that setting cannot be set per-user (Theme)");
}

#[tokio::test]
async fn test_unknown_setting_never_fails() {
    let (engine, _) = setup();

    assert!(engine.get_tree_node_for_unique_id("nope").is_none());
    assert_eq!(internal(&engine, "nope", CHANNEL).await, None);
    assert_eq!(
        engine
            .get_user_facing_setting_value("nope", SERVER, CHANNEL, USER, &Value::Null)
            .await
            .unwrap(),
        None
    );

    let outcome = engine
        .set_server_wide_setting_value("nope", SERVER, json!(1), false, &Value::Null)
        .await
        .unwrap();
    assert_eq!(
        outcome.rejection_reason(),
        Some(UpdateRejectionReason::SettingDoesNotExist)
    );
    assert_eq!(
        outcome.rejection().unwrap().non_existent_unique_id.as_deref(),
        Some("nope")
    );
}

#[tokio::test]
async fn test_user_facing_conversion() {
    let (engine, _) = setup();

    assert_eq!(
        engine
            .get_user_facing_setting_value("shout", SERVER, CHANNEL, USER, &Value::Null)
            .await
            .unwrap(),
        Some(json!("HI"))
    );
    assert_eq!(
        engine
            .get_user_facing_setting_value("countdown_start", SERVER, CHANNEL, USER, &Value::Null)
            .await
            .unwrap(),
        Some(json!("10"))
    );
}

#[tokio::test]
async fn test_converter_fault_is_an_error() {
    let (engine, persistence) = setup();

    let outcome = engine
        .set_user_setting_value("score_limit", USER, json!("30"), &Value::Null)
        .await
        .unwrap();
    assert_eq!(outcome.accepted().unwrap().new_internal_value, json!(30.0));

    let err = engine
        .set_user_setting_value("score_limit", USER, json!("lots"), &Value::Null)
        .await
        .unwrap_err();
    assert!(matches!(err, TiersError::Converter { .. }));
    assert!(err.is_fault());

    let stored = persistence.get_data_for_user(USER).await.unwrap();
    assert_eq!(stored.setting("score_limit"), Some(&json!(30.0)));
}

#[test]
fn test_bad_trees_are_rejected() {
    let duplicate = EngineBuilder::new()
        .with_node(RawSettingNode::category(
            "A",
            [RawSettingNode::leaf("prefix", "Prefix", "!").into()],
        ))
        .with_node(RawSettingNode::category(
            "B",
            [RawSettingNode::leaf("prefix", "Prefix again", "?").into()],
        ))
        .build()
        .unwrap_err();
    assert!(
        duplicate
            .to_string()
            .contains("There is already a setting with that uniqueId")
    );

    let whitespace = EngineBuilder::new()
        .with_node(RawSettingNode::leaf("command prefix", "Prefix", "!"))
        .build()
        .unwrap_err();
    assert!(
        whitespace
            .to_string()
            .contains("Setting unique IDs must not contain whitespace.")
    );
}

#[test]
fn test_scope_flags_default_to_true() {
    let (engine, _) = setup();
    let prefix = engine.get_tree_node_for_unique_id("prefix").unwrap();
    assert!(prefix.server_setting());
    assert!(prefix.channel_setting());
    assert!(prefix.user_setting());
}
