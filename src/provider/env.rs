use tracing::debug;

use super::detail::{ResolutionDetail, ResolutionError};
use super::source::{EnvSource, ProcessEnv};
use super::value::FlagValue;
use super::{FeatureProvider, Metadata};
use crate::config::ProviderSettings;
use crate::context::{ContextValue, FlattenedContext};

/// Environment-variable prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "FT_";

pub const PROVIDER_NAME: &str = "simple-env-flag-evaluator";

const OBJECT_UNSUPPORTED: &str = "Object type is not supported in simple env provider";

/// Resolves flags from the evaluation context, falling back to environment variables.
///
/// For a flag key `k`, the context is searched for `k` and then for
/// `PREFIX + UPPER(k)`. A hit there decides the result, even when the value
/// has the wrong type. Only on a miss is the environment variable
/// `PREFIX + UPPER(k)` read and parsed; unset and empty variables both yield
/// the caller's default.
///
/// ## Example
///
/// ```
/// use simple_env_flags::{EnvProvider, EvaluationContext, FeatureProvider, MapEnv, Reason};
///
/// let provider = EnvProvider::builder()
///     .with_source(MapEnv::new().with_var("FT_MY_FEATURE", "true"))
///     .build();
///
/// let detail = provider.resolve_bool_value("my_feature", false, &EvaluationContext::new().flatten());
/// assert!(*detail.value());
/// assert_eq!(detail.reason(), Reason::EnvironmentVariable);
/// ```
#[derive(Debug, Clone)]
pub struct EnvProvider<E = ProcessEnv> {
    prefix: String,
    source: E,
}

impl EnvProvider {
    /// Creates a provider reading the process environment with the `FT_` prefix.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder with the default prefix, reading the process environment.
    pub fn builder() -> EnvProviderBuilder {
        EnvProviderBuilder {
            prefix: DEFAULT_PREFIX.to_string(),
            source: ProcessEnv,
        }
    }

    /// Creates a provider from loaded [`ProviderSettings`].
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self::builder().with_prefix(settings.prefix.clone()).build()
    }
}

impl Default for EnvProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EnvSource> EnvProvider<E> {
    /// Returns the environment-variable prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Environment variable name consulted for `flag_key`.
    pub fn env_name(&self, flag_key: &str) -> String {
        format!("{}{}", self.prefix, flag_key.to_uppercase())
    }

    /// Resolves `flag_key` as `T`. Never fails; see the type-level docs for precedence.
    pub fn resolve<T: FlagValue>(
        &self,
        flag_key: &str,
        default: T,
        ctx: &FlattenedContext,
    ) -> ResolutionDetail<T> {
        if let Some(value) = self.lookup_context(flag_key, ctx) {
            return match T::from_context(value) {
                Some(coerced) => {
                    debug!(flag_key, source = "context", "resolved flag");
                    ResolutionDetail::from_context(coerced)
                }
                None => {
                    debug!(
                        flag_key,
                        expected = T::TYPE_NOUN,
                        actual = value.type_name(),
                        "context value has wrong type"
                    );
                    ResolutionDetail::error(
                        default,
                        ResolutionError::type_mismatch(format!(
                            "context value for {flag_key} is not a {}",
                            T::TYPE_NOUN
                        )),
                    )
                }
            };
        }

        let name = self.env_name(flag_key);
        let raw = match self.source.get(&name) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                debug!(flag_key, env = %name, "flag not set, using default");
                return ResolutionDetail::default_value(default);
            }
        };

        match T::parse_env(&raw) {
            Ok(parsed) => {
                debug!(flag_key, env = %name, source = "environment", "resolved flag");
                ResolutionDetail::from_environment(parsed)
            }
            Err(err) => {
                debug!(flag_key, env = %name, error = %err, "failed to parse environment value");
                ResolutionDetail::error(default, ResolutionError::parse_error(err.to_string()))
            }
        }
    }

    fn lookup_context<'a>(
        &self,
        flag_key: &str,
        ctx: &'a FlattenedContext,
    ) -> Option<&'a ContextValue> {
        ctx.get(flag_key)
            .or_else(|| ctx.get(&self.env_name(flag_key)))
    }
}

impl<E: EnvSource> FeatureProvider for EnvProvider<E> {
    fn metadata(&self) -> Metadata {
        Metadata {
            name: PROVIDER_NAME.to_string(),
        }
    }

    fn resolve_bool_value(
        &self,
        flag_key: &str,
        default: bool,
        ctx: &FlattenedContext,
    ) -> ResolutionDetail<bool> {
        self.resolve(flag_key, default, ctx)
    }

    fn resolve_string_value(
        &self,
        flag_key: &str,
        default: String,
        ctx: &FlattenedContext,
    ) -> ResolutionDetail<String> {
        self.resolve(flag_key, default, ctx)
    }

    fn resolve_int_value(
        &self,
        flag_key: &str,
        default: i64,
        ctx: &FlattenedContext,
    ) -> ResolutionDetail<i64> {
        self.resolve(flag_key, default, ctx)
    }

    fn resolve_float_value(
        &self,
        flag_key: &str,
        default: f64,
        ctx: &FlattenedContext,
    ) -> ResolutionDetail<f64> {
        self.resolve(flag_key, default, ctx)
    }

    fn resolve_object_value(
        &self,
        flag_key: &str,
        default: toml::Value,
        _ctx: &FlattenedContext,
    ) -> ResolutionDetail<toml::Value> {
        debug!(flag_key, "object flags are not supported");
        ResolutionDetail::error(default, ResolutionError::general(OBJECT_UNSUPPORTED))
    }
}

/// Builder for [`EnvProvider`].
///
/// Starts out reading the process environment; [`with_source`](Self::with_source)
/// swaps in any other [`EnvSource`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct EnvProviderBuilder<E = ProcessEnv> {
    prefix: String,
    source: E,
}

impl<E: EnvSource> EnvProviderBuilder<E> {
    /// Sets the environment-variable prefix. Defaults to [`DEFAULT_PREFIX`].
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replaces the environment source, e.g. with a [`MapEnv`](super::MapEnv) in tests.
    pub fn with_source<S: EnvSource>(self, source: S) -> EnvProviderBuilder<S> {
        EnvProviderBuilder {
            prefix: self.prefix,
            source,
        }
    }

    /// Builds the provider.
    pub fn build(self) -> EnvProvider<E> {
        EnvProvider {
            prefix: self.prefix,
            source: self.source,
        }
    }
}
