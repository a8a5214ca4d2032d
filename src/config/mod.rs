//! Provider settings and the layered loader behind them.

mod builder;
mod env;
mod error;
mod settings;

pub use builder::Config;
pub use error::ConfigError;
pub use settings::{ProviderSettings, SETTINGS_ENV_PREFIX};
