//! Per-type coercion of context values and parsing of environment strings.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::context::ContextValue;

/// Why an environment value could not be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseValueError {
    #[error("invalid boolean {0:?}")]
    InvalidBoolean(String),

    #[error("invalid integer {raw:?}: {source}")]
    InvalidInteger { raw: String, source: ParseIntError },

    #[error("invalid float {raw:?}: {source}")]
    InvalidFloat { raw: String, source: ParseFloatError },

    #[error("invalid float {0:?}: value out of range")]
    FloatOutOfRange(String),
}

/// A scalar type a flag can resolve to.
pub trait FlagValue: Sized {
    /// Noun used in type-mismatch messages ("context value for x is not a <noun>").
    const TYPE_NOUN: &'static str;

    /// Coerces a context attribute, or `None` if its runtime type is not accepted.
    fn from_context(value: &ContextValue) -> Option<Self>;

    /// Parses an environment variable value.
    fn parse_env(raw: &str) -> Result<Self, ParseValueError>;
}

impl FlagValue for bool {
    const TYPE_NOUN: &'static str = "boolean";

    fn from_context(value: &ContextValue) -> Option<Self> {
        match value {
            ContextValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn parse_env(raw: &str) -> Result<Self, ParseValueError> {
        match raw.to_ascii_lowercase().as_str() {
            "1" | "t" | "true" => Ok(true),
            "0" | "f" | "false" => Ok(false),
            _ => Err(ParseValueError::InvalidBoolean(raw.to_string())),
        }
    }
}

impl FlagValue for String {
    const TYPE_NOUN: &'static str = "string";

    fn from_context(value: &ContextValue) -> Option<Self> {
        match value {
            ContextValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn parse_env(raw: &str) -> Result<Self, ParseValueError> {
        Ok(raw.to_string())
    }
}

impl FlagValue for i64 {
    const TYPE_NOUN: &'static str = "number";

    fn from_context(value: &ContextValue) -> Option<Self> {
        match value {
            ContextValue::Int(i) => Some(*i),
            // Truncates toward zero; out-of-range values saturate and NaN maps to 0.
            ContextValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    fn parse_env(raw: &str) -> Result<Self, ParseValueError> {
        raw.parse::<i64>()
            .map_err(|source| ParseValueError::InvalidInteger {
                raw: raw.to_string(),
                source,
            })
    }
}

impl FlagValue for f64 {
    const TYPE_NOUN: &'static str = "number";

    fn from_context(value: &ContextValue) -> Option<Self> {
        match value {
            ContextValue::Float(f) => Some(*f),
            ContextValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn parse_env(raw: &str) -> Result<Self, ParseValueError> {
        let parsed = raw
            .parse::<f64>()
            .map_err(|source| ParseValueError::InvalidFloat {
                raw: raw.to_string(),
                source,
            })?;

        // Finite literals that overflow are rejected; explicit infinities pass.
        if parsed.is_infinite() && !is_infinity_literal(raw) {
            return Err(ParseValueError::FloatOutOfRange(raw.to_string()));
        }
        Ok(parsed)
    }
}

fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw
        .strip_prefix(['+', '-'])
        .unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_parse_is_case_insensitive() {
        for raw in ["1", "t", "T", "true", "TRUE", "True"] {
            assert_eq!(bool::parse_env(raw), Ok(true), "{raw}");
        }
        for raw in ["0", "f", "F", "false", "FALSE", "False"] {
            assert_eq!(bool::parse_env(raw), Ok(false), "{raw}");
        }
    }

    #[test]
    fn test_bool_parse_rejects_other_words() {
        let err = bool::parse_env("invalid").unwrap_err();
        assert_eq!(err, ParseValueError::InvalidBoolean("invalid".into()));
        assert_eq!(err.to_string(), r#"invalid boolean "invalid""#);
        assert!(bool::parse_env("yes").is_err());
        assert!(bool::parse_env("").is_err());
    }

    #[test]
    fn test_int_parse() {
        assert_eq!(i64::parse_env("42"), Ok(42));
        assert_eq!(i64::parse_env("-17"), Ok(-17));
        assert_eq!(i64::parse_env("+5"), Ok(5));
        assert!(i64::parse_env("1.5").is_err());
        assert!(i64::parse_env("9223372036854775808").is_err());

        let err = i64::parse_env("invalid").unwrap_err();
        assert!(matches!(err, ParseValueError::InvalidInteger { .. }));
        assert!(err.to_string().starts_with(r#"invalid integer "invalid""#));
    }

    #[test]
    fn test_float_parse() {
        assert_eq!(f64::parse_env("123.45"), Ok(123.45));
        assert_eq!(f64::parse_env("1e3"), Ok(1000.0));
        assert_eq!(f64::parse_env("-2.5E-1"), Ok(-0.25));
        assert_eq!(f64::parse_env("7"), Ok(7.0));
        assert!(matches!(
            f64::parse_env("invalid"),
            Err(ParseValueError::InvalidFloat { .. })
        ));
    }

    #[test]
    fn test_float_overflow_is_out_of_range() {
        for raw in ["1e400", "-1e400"] {
            let err = f64::parse_env(raw).unwrap_err();
            assert_eq!(err, ParseValueError::FloatOutOfRange(raw.to_string()));
            assert_eq!(err.to_string(), format!("invalid float {raw:?}: value out of range"));
        }
    }

    #[test]
    fn test_float_explicit_infinity_and_underflow_accepted() {
        assert_eq!(f64::parse_env("inf"), Ok(f64::INFINITY));
        assert_eq!(f64::parse_env("-Infinity"), Ok(f64::NEG_INFINITY));
        assert_eq!(f64::parse_env("1e-400"), Ok(0.0));
    }

    #[test]
    fn test_string_parse_is_identity() {
        assert_eq!(String::parse_env(" spaced "), Ok(" spaced ".to_string()));
    }

    #[test]
    fn test_float_to_int_truncates_toward_zero() {
        assert_eq!(i64::from_context(&ContextValue::Float(2.9)), Some(2));
        assert_eq!(i64::from_context(&ContextValue::Float(-2.9)), Some(-2));
        assert_eq!(i64::from_context(&ContextValue::Float(123.0)), Some(123));
    }

    #[test]
    fn test_int_to_float_widens() {
        assert_eq!(f64::from_context(&ContextValue::Int(123)), Some(123.0));
    }

    #[test]
    fn test_mismatched_types_rejected() {
        assert_eq!(bool::from_context(&ContextValue::String("true".into())), None);
        assert_eq!(bool::from_context(&ContextValue::Int(1)), None);
        assert_eq!(String::from_context(&ContextValue::Int(123)), None);
        assert_eq!(i64::from_context(&ContextValue::String("1".into())), None);
        assert_eq!(f64::from_context(&ContextValue::Bool(true)), None);
        assert_eq!(i64::from_context(&ContextValue::Other("array".into())), None);
    }
}
