use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// How a resolved value was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Reason {
    #[serde(rename = "environment_variable")]
    EnvironmentVariable,
    #[serde(rename = "evaluation_context")]
    EvaluationContext,
    #[serde(rename = "DEFAULT")]
    Default,
    #[serde(rename = "ERROR")]
    Error,
}

impl Reason {
    /// Wire spelling of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::EnvironmentVariable => "environment_variable",
            Reason::EvaluationContext => "evaluation_context",
            Reason::Default => "DEFAULT",
            Reason::Error => "ERROR",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Environment value failed to parse as the requested type.
    ParseError,
    /// Context value present but of the wrong runtime type.
    TypeMismatch,
    General,
}

impl ErrorCode {
    /// Wire spelling of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::General => "GENERAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error carried inside a [`ResolutionDetail`] whose reason is [`Reason::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{code}: {message}")]
pub struct ResolutionError {
    pub code: ErrorCode,
    pub message: String,
}

impl ResolutionError {
    /// Creates an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, message)
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TypeMismatch, message)
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::General, message)
    }
}

/// Outcome of a single flag resolution.
///
/// `error` is populated exactly when `reason` is [`Reason::Error`]; the
/// constructors are the only way to build a detail, so that holds for every
/// value of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionDetail<T> {
    value: T,
    reason: Reason,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ResolutionError>,
}

impl<T> ResolutionDetail<T> {
    /// Value parsed from an environment variable.
    pub fn from_environment(value: T) -> Self {
        Self::resolved(value, Reason::EnvironmentVariable)
    }

    /// Value taken from the evaluation context.
    pub fn from_context(value: T) -> Self {
        Self::resolved(value, Reason::EvaluationContext)
    }

    /// No source supplied a value; `value` is the caller's default.
    pub fn default_value(value: T) -> Self {
        Self::resolved(value, Reason::Default)
    }

    /// Failed resolution carrying the caller's default.
    pub fn error(default: T, error: ResolutionError) -> Self {
        Self {
            value: default,
            reason: Reason::Error,
            error: Some(error),
        }
    }

    fn resolved(value: T, reason: Reason) -> Self {
        Self {
            value,
            reason,
            error: None,
        }
    }

    /// Returns the resolved value, or the default on failure.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns how the value was produced.
    pub fn reason(&self) -> Reason {
        self.reason
    }

    /// Returns the error, present exactly when the reason is [`Reason::Error`].
    pub fn resolution_error(&self) -> Option<&ResolutionError> {
        self.error.as_ref()
    }

    /// Shorthand for the error's code.
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error.as_ref().map(|e| e.code)
    }

    /// Returns `true` if resolution failed.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub(crate) fn into_parts(self) -> (T, Reason, Option<ResolutionError>) {
        (self.value, self.reason, self.error)
    }
}
