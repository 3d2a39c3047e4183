//! Per-leaf conversion and validation hooks
//!
//! Every leaf carries three capabilities: `to_internal` (user-facing value to
//! stored value), `to_user_facing` (stored value back to display form) and
//! `is_valid` (checks a stored value). They are supplied when the raw node is
//! built and the tree validator fills the unset ones with the defaults below,
//! so nothing has to check for a missing hook at call time.
//!
//! Hooks are untrusted: an `Err` from any of them surfaces as
//! [`TiersError::Converter`](crate::error::TiersError::Converter) and is never
//! folded into a rejected update.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;

use crate::error::HookResult;

/// Caller-supplied context passed through to every hook (message metadata,
/// command prefix and so on). `Value::Null` when there is none.
pub type ConverterParams = Value;

/// Converts a value between its user-facing and internal form
#[async_trait]
pub trait ValueConverter: Send + Sync {
    async fn convert(&self, value: Value, params: &ConverterParams) -> HookResult<Value>;
}

/// Decides whether an internal value is acceptable for a leaf
#[async_trait]
pub trait ValueValidator: Send + Sync {
    async fn is_valid(&self, value: &Value, params: &ConverterParams) -> HookResult<bool>;
}

/// Shared converter handle as stored on a leaf
pub type SharedConverter = Arc<dyn ValueConverter>;

/// Shared validator handle as stored on a leaf
pub type SharedValidator = Arc<dyn ValueValidator>;

/// Default `to_internal`: stores exactly what the user supplied
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

#[async_trait]
impl ValueConverter for IdentityConverter {
    async fn convert(&self, value: Value, _params: &ConverterParams) -> HookResult<Value> {
        Ok(value)
    }
}

/// Default `to_user_facing`: renders the stored value as a string
#[derive(Debug, Clone, Copy, Default)]
pub struct StringifyConverter;

#[async_trait]
impl ValueConverter for StringifyConverter {
    async fn convert(&self, value: Value, _params: &ConverterParams) -> HookResult<Value> {
        Ok(Value::String(stringify(&value)))
    }
}

/// Default `is_valid`: accepts everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysValid;

#[async_trait]
impl ValueValidator for AlwaysValid {
    async fn is_valid(&self, _value: &Value, _params: &ConverterParams) -> HookResult<bool> {
        Ok(true)
    }
}

/// Plain string rendering of a value.
///
/// Strings come back without quotes and arrays are joined element-wise with
/// `,` (nulls inside arrays render empty). Anything else uses its JSON text.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Adapts a synchronous closure into a [`ValueConverter`]
pub struct FnConverter<F>(F);

impl<F> FnConverter<F>
where
    F: Fn(Value, &ConverterParams) -> HookResult<Value> + Send + Sync,
{
    pub fn new(convert: F) -> Self {
        Self(convert)
    }
}

#[async_trait]
impl<F> ValueConverter for FnConverter<F>
where
    F: Fn(Value, &ConverterParams) -> HookResult<Value> + Send + Sync,
{
    async fn convert(&self, value: Value, params: &ConverterParams) -> HookResult<Value> {
        (self.0)(value, params)
    }
}

/// Adapts a closure returning a boxed future into a [`ValueConverter`].
///
/// Use this when conversion needs I/O, e.g. resolving a channel mention
/// against the chat platform.
pub struct AsyncFnConverter<F>(F);

impl<F> AsyncFnConverter<F>
where
    F: Fn(Value, ConverterParams) -> BoxFuture<'static, HookResult<Value>> + Send + Sync,
{
    pub fn new(convert: F) -> Self {
        Self(convert)
    }
}

#[async_trait]
impl<F> ValueConverter for AsyncFnConverter<F>
where
    F: Fn(Value, ConverterParams) -> BoxFuture<'static, HookResult<Value>> + Send + Sync,
{
    async fn convert(&self, value: Value, params: &ConverterParams) -> HookResult<Value> {
        (self.0)(value, params.clone()).await
    }
}

/// Adapts a synchronous predicate into a [`ValueValidator`]
pub struct FnValidator<F>(F);

impl<F> FnValidator<F>
where
    F: Fn(&Value, &ConverterParams) -> HookResult<bool> + Send + Sync,
{
    pub fn new(validate: F) -> Self {
        Self(validate)
    }
}

#[async_trait]
impl<F> ValueValidator for FnValidator<F>
where
    F: Fn(&Value, &ConverterParams) -> HookResult<bool> + Send + Sync,
{
    async fn is_valid(&self, value: &Value, params: &ConverterParams) -> HookResult<bool> {
        (self.0)(value, params)
    }
}
