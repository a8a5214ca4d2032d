pub mod client;
pub mod config;
pub mod context;
mod error;
pub mod provider;

#[cfg(test)]
mod test_support;

pub use client::{Client, EvaluationDetails};
pub use config::{Config, ConfigError, ProviderSettings};
pub use context::{ContextValue, EvaluationContext, FlattenedContext, TARGETING_KEY};
pub use error::Error;
pub use provider::{
    EnvProvider, EnvProviderBuilder, EnvSource, ErrorCode, FeatureProvider, FlagValue, Hook,
    MapEnv, Metadata, ParseValueError, ProcessEnv, Reason, ResolutionDetail, ResolutionError, DEFAULT_PREFIX,
    PROVIDER_NAME,
};
