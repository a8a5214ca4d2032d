//! Application-facing client over a [`FeatureProvider`].

use std::sync::Arc;

use crate::context::{EvaluationContext, FlattenedContext};
use crate::provider::{FeatureProvider, Reason, ResolutionDetail, ResolutionError};

/// Resolution result as seen by the application, tagged with the flag key.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationDetails<T> {
    pub flag_key: String,
    pub value: T,
    pub reason: Reason,
    pub error: Option<ResolutionError>,
}

/// Named handle used by application code to evaluate flags.
///
/// The client-level context is merged under each call's context, flattened,
/// and handed to the provider. Resolution errors are logged and the default
/// value is returned.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use simple_env_flags::{Client, EnvProvider, EvaluationContext, MapEnv};
///
/// let provider = EnvProvider::builder()
///     .with_source(MapEnv::new().with_var("FT_COUNT", "42"))
///     .build();
/// let client = Client::new("my-app", Arc::new(provider));
///
/// assert_eq!(client.int_value("count", 0, None), 42);
///
/// let ctx = EvaluationContext::new().with_attribute("count", 1000);
/// assert_eq!(client.int_value("count", 0, Some(&ctx)), 1000);
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    name: String,
    provider: Arc<dyn FeatureProvider>,
    context: EvaluationContext,
}

impl Client {
    /// Creates a client named `name` backed by `provider`.
    pub fn new(name: impl Into<String>, provider: Arc<dyn FeatureProvider>) -> Self {
        Self {
            name: name.into(),
            provider,
            context: EvaluationContext::default(),
        }
    }

    /// Sets a context applied to every evaluation from this client.
    pub fn with_context(mut self, context: EvaluationContext) -> Self {
        self.context = context;
        self
    }

    /// Evaluates a boolean flag, returning the default on any failure.
    pub fn bool_value(&self, flag_key: &str, default: bool, ctx: Option<&EvaluationContext>) -> bool {
        self.bool_details(flag_key, default, ctx).value
    }

    /// Evaluates a string flag, returning the default on any failure.
    pub fn string_value(
        &self,
        flag_key: &str,
        default: impl Into<String>,
        ctx: Option<&EvaluationContext>,
    ) -> String {
        self.string_details(flag_key, default, ctx).value
    }

    /// Evaluates an integer flag, returning the default on any failure.
    pub fn int_value(&self, flag_key: &str, default: i64, ctx: Option<&EvaluationContext>) -> i64 {
        self.int_details(flag_key, default, ctx).value
    }

    /// Evaluates a float flag, returning the default on any failure.
    pub fn float_value(&self, flag_key: &str, default: f64, ctx: Option<&EvaluationContext>) -> f64 {
        self.float_details(flag_key, default, ctx).value
    }

    /// Evaluates a boolean flag with its reason and error.
    pub fn bool_details(
        &self,
        flag_key: &str,
        default: bool,
        ctx: Option<&EvaluationContext>,
    ) -> EvaluationDetails<bool> {
        self.evaluate(flag_key, ctx, |p, flat| {
            p.resolve_bool_value(flag_key, default, flat)
        })
    }

    /// Evaluates a string flag with its reason and error.
    pub fn string_details(
        &self,
        flag_key: &str,
        default: impl Into<String>,
        ctx: Option<&EvaluationContext>,
    ) -> EvaluationDetails<String> {
        let default = default.into();
        self.evaluate(flag_key, ctx, |p, flat| {
            p.resolve_string_value(flag_key, default, flat)
        })
    }

    /// Evaluates an integer flag with its reason and error.
    pub fn int_details(
        &self,
        flag_key: &str,
        default: i64,
        ctx: Option<&EvaluationContext>,
    ) -> EvaluationDetails<i64> {
        self.evaluate(flag_key, ctx, |p, flat| {
            p.resolve_int_value(flag_key, default, flat)
        })
    }

    /// Evaluates a float flag with its reason and error.
    pub fn float_details(
        &self,
        flag_key: &str,
        default: f64,
        ctx: Option<&EvaluationContext>,
    ) -> EvaluationDetails<f64> {
        self.evaluate(flag_key, ctx, |p, flat| {
            p.resolve_float_value(flag_key, default, flat)
        })
    }

    /// Evaluates an object flag. The environment provider always reports an error.
    pub fn object_details(
        &self,
        flag_key: &str,
        default: toml::Value,
        ctx: Option<&EvaluationContext>,
    ) -> EvaluationDetails<toml::Value> {
        self.evaluate(flag_key, ctx, |p, flat| {
            p.resolve_object_value(flag_key, default, flat)
        })
    }

    fn evaluate<T>(
        &self,
        flag_key: &str,
        ctx: Option<&EvaluationContext>,
        resolve: impl FnOnce(&dyn FeatureProvider, &FlattenedContext) -> ResolutionDetail<T>,
    ) -> EvaluationDetails<T> {
        let merged = match ctx {
            Some(ctx) => self.context.merge(ctx),
            None => self.context.clone(),
        };
        let hooks = self.provider.hooks();
        for hook in &hooks {
            hook.before(flag_key, &merged);
        }

        let (value, reason, error) = resolve(self.provider.as_ref(), &merged.flatten()).into_parts();

        if let Some(err) = &error {
            tracing::warn!(
                client = %self.name,
                provider = %self.provider.metadata().name,
                flag_key,
                error = %err,
                "flag evaluation failed, using default"
            );
        }
        for hook in &hooks {
            hook.after(flag_key, reason);
        }

        EvaluationDetails {
            flag_key: flag_key.to_string(),
            value,
            reason,
            error,
        }
    }
}
