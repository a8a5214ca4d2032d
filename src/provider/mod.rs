//! The provider boundary and the environment-backed provider.

mod detail;
mod env;
mod source;
mod value;

use std::sync::Arc;

pub use detail::{ErrorCode, Reason, ResolutionDetail, ResolutionError};
pub use env::{EnvProvider, EnvProviderBuilder, DEFAULT_PREFIX, PROVIDER_NAME};
pub use source::{EnvSource, MapEnv, ProcessEnv};
pub use value::{FlagValue, ParseValueError};

use crate::context::{EvaluationContext, FlattenedContext};

/// Descriptive information about a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
}

/// Callbacks run by [`Client`](crate::Client) around each evaluation.
pub trait Hook: Send + Sync + std::fmt::Debug {
    fn before(&self, _flag_key: &str, _ctx: &EvaluationContext) {}

    fn after(&self, _flag_key: &str, _reason: Reason) {}
}

/// Backend answering typed flag evaluations.
///
/// Implementations never fail outright: every problem is reported through the
/// returned [`ResolutionDetail`], whose value then equals the default.
pub trait FeatureProvider: Send + Sync + std::fmt::Debug {
    fn metadata(&self) -> Metadata;

    fn hooks(&self) -> Vec<Arc<dyn Hook>> {
        Vec::new()
    }

    fn resolve_bool_value(
        &self,
        flag_key: &str,
        default: bool,
        ctx: &FlattenedContext,
    ) -> ResolutionDetail<bool>;

    fn resolve_string_value(
        &self,
        flag_key: &str,
        default: String,
        ctx: &FlattenedContext,
    ) -> ResolutionDetail<String>;

    fn resolve_int_value(
        &self,
        flag_key: &str,
        default: i64,
        ctx: &FlattenedContext,
    ) -> ResolutionDetail<i64>;

    fn resolve_float_value(
        &self,
        flag_key: &str,
        default: f64,
        ctx: &FlattenedContext,
    ) -> ResolutionDetail<f64>;

    fn resolve_object_value(
        &self,
        flag_key: &str,
        default: toml::Value,
        ctx: &FlattenedContext,
    ) -> ResolutionDetail<toml::Value>;
}
