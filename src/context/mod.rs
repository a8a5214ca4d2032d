//! Evaluation context passed alongside each flag evaluation.

use std::collections::HashMap;
use std::num::TryFromIntError;

use serde::Deserialize;

/// Key under which the targeting key is stored in a [`FlattenedContext`].
pub const TARGETING_KEY: &str = "targetingKey";

/// Attribute map handed to providers: targeting key and attributes collapsed together.
pub type FlattenedContext = HashMap<String, ContextValue>;

/// Runtime-typed value of a context attribute.
///
/// Deserializes from any TOML value; tables, arrays and datetimes land in
/// [`ContextValue::Other`] carrying the TOML type name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "toml::Value")]
pub enum ContextValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Other(String),
}

impl ContextValue {
    /// Name of the runtime type, used in log output.
    pub fn type_name(&self) -> &str {
        match self {
            ContextValue::Bool(_) => "boolean",
            ContextValue::Int(_) => "integer",
            ContextValue::Float(_) => "float",
            ContextValue::String(_) => "string",
            ContextValue::Other(name) => name,
        }
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ContextValue {
                fn from(value: $ty) -> Self {
                    ContextValue::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

// Wider integers convert only when the value fits in an i64.
macro_rules! impl_try_from_int {
    ($($ty:ty),*) => {
        $(
            impl TryFrom<$ty> for ContextValue {
                type Error = TryFromIntError;

                fn try_from(value: $ty) -> Result<Self, Self::Error> {
                    i64::try_from(value).map(ContextValue::Int)
                }
            }
        )*
    };
}

impl_try_from_int!(u64, usize, isize, i128, u128);

impl From<f32> for ContextValue {
    fn from(value: f32) -> Self {
        ContextValue::Float(f64::from(value))
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Float(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::String(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::String(value)
    }
}

impl From<toml::Value> for ContextValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::Boolean(b) => ContextValue::Bool(b),
            toml::Value::Integer(i) => ContextValue::Int(i),
            toml::Value::Float(f) => ContextValue::Float(f),
            toml::Value::String(s) => ContextValue::String(s),
            other => ContextValue::Other(other.type_str().to_string()),
        }
    }
}

/// Per-call context: an optional targeting key plus free-form attributes.
///
/// ## Example
///
/// ```
/// use simple_env_flags::{ContextValue, EvaluationContext};
///
/// let ctx = EvaluationContext::new()
///     .with_targeting_key("user-123")
///     .with_attribute("my_feature", true)
///     .with_attribute("count", 1000);
///
/// let flat = ctx.flatten();
/// assert_eq!(flat.get("count"), Some(&ContextValue::Int(1000)));
/// assert_eq!(flat.get("targetingKey"), Some(&ContextValue::from("user-123")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EvaluationContext {
    #[serde(default)]
    targeting_key: Option<String>,
    #[serde(default)]
    attributes: HashMap<String, ContextValue>,
}

impl EvaluationContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key identifying the subject of the evaluation.
    pub fn with_targeting_key(mut self, key: impl Into<String>) -> Self {
        self.targeting_key = Some(key.into());
        self
    }

    /// Adds or replaces an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns the targeting key, if set.
    pub fn targeting_key(&self) -> Option<&str> {
        self.targeting_key.as_deref()
    }

    /// Returns an attribute by exact (case-sensitive) name.
    pub fn attribute(&self, key: &str) -> Option<&ContextValue> {
        self.attributes.get(key)
    }

    /// Merges `other` over `self`. Attributes and the targeting key from
    /// `other` take precedence.
    pub fn merge(&self, other: &EvaluationContext) -> EvaluationContext {
        let mut merged = self.clone();
        if other.targeting_key.is_some() {
            merged.targeting_key.clone_from(&other.targeting_key);
        }
        for (key, value) in &other.attributes {
            merged.attributes.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Collapses the targeting key and attributes into a single map.
    ///
    /// The targeting key is stored under [`TARGETING_KEY`] and overrides an
    /// attribute of the same name.
    pub fn flatten(&self) -> FlattenedContext {
        let mut flat = self.attributes.clone();
        if let Some(key) = &self.targeting_key {
            flat.insert(TARGETING_KEY.to_string(), ContextValue::String(key.clone()));
        }
        flat
    }
}
