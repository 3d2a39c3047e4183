//! Stock validators for common setting shapes

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{HookResult, TiersError, TiersResult};
use crate::hooks::{ConverterParams, ValueValidator};

/// Accepts numbers within `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeValidator {
    min: f64,
    max: f64,
}

impl RangeValidator {
    pub fn new(min: f64, max: f64) -> TiersResult<Self> {
        if max < min {
            return Err(TiersError::config_with_context(
                "Maximum is less than minimum",
                format!("Creating a range validator for [{min}, {max}]"),
            ));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[async_trait]
impl ValueValidator for RangeValidator {
    async fn is_valid(&self, value: &Value, _params: &ConverterParams) -> HookResult<bool> {
        Ok(value
            .as_f64()
            .is_some_and(|number| number >= self.min && number <= self.max))
    }
}

/// Accepts `true` and `false`
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanValidator;

#[async_trait]
impl ValueValidator for BooleanValidator {
    async fn is_valid(&self, value: &Value, _params: &ConverterParams) -> HookResult<bool> {
        Ok(value.is_boolean())
    }
}

/// Accepts only values equal to one of a fixed list
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteOptionValidator {
    options: Vec<Value>,
}

impl DiscreteOptionValidator {
    pub fn new<I, V>(options: I) -> TiersResult<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let options: Vec<Value> = options.into_iter().map(Into::into).collect();
        if options.is_empty() {
            return Err(TiersError::config("No options array, or it is empty."));
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &[Value] {
        &self.options
    }
}

#[async_trait]
impl ValueValidator for DiscreteOptionValidator {
    async fn is_valid(&self, value: &Value, _params: &ConverterParams) -> HookResult<bool> {
        Ok(self.options.iter().any(|option| same_option(option, value)))
    }
}

/// Numbers compare by value so `1` and `1.0` match
fn same_option(option: &Value, value: &Value) -> bool {
    match (option.as_f64(), value.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => option == value,
    }
}

/// Accepts arrays whose elements are all strings, including the empty array
#[derive(Debug, Clone, Copy, Default)]
pub struct StringArrayValidator;

#[async_trait]
impl ValueValidator for StringArrayValidator {
    async fn is_valid(&self, value: &Value, _params: &ConverterParams) -> HookResult<bool> {
        Ok(value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)))
    }
}

/// Rejects `null`, `false`, zero and the empty string.
///
/// Useful after a converter that maps unrecognized input to `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruthyValidator;

#[async_trait]
impl ValueValidator for TruthyValidator {
    async fn is_valid(&self, value: &Value, _params: &ConverterParams) -> HookResult<bool> {
        Ok(is_truthy(value))
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
