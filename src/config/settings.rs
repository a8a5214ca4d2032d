use std::path::Path;

use serde::Deserialize;

use super::{Config, ConfigError};
use crate::provider::DEFAULT_PREFIX;

/// Environment prefix for overriding settings, e.g. `SIMPLE_ENV_FLAGS__PREFIX=APP_`.
pub const SETTINGS_ENV_PREFIX: &str = "SIMPLE_ENV_FLAGS";

/// Provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderSettings {
    /// Prefix prepended to upper-cased flag keys when reading the environment.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

impl ProviderSettings {
    /// Loads settings from an optional TOML file, then `SIMPLE_ENV_FLAGS__*` overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.with_file(path, true);
        }
        let settings: Self = builder.with_env(SETTINGS_ENV_PREFIX, "__").build()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects prefixes that can never be part of an environment variable name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.contains(['=', '\0']) {
            return Err(ConfigError::InvalidPrefix(self.prefix.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_prefix() {
        assert_eq!(ProviderSettings::default().prefix, "FT_");
    }

    #[test]
    fn test_validate_rejects_equals_and_nul() {
        for bad in ["A=B", "A\0"] {
            let settings = ProviderSettings {
                prefix: bad.to_string(),
            };
            assert!(matches!(settings.validate(), Err(ConfigError::InvalidPrefix(_))));
        }
        assert!(ProviderSettings::default().validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_without_file_uses_default() {
        let mut guard = env::guard();
        guard.remove("SIMPLE_ENV_FLAGS__PREFIX");
        assert_eq!(ProviderSettings::load(None).unwrap(), ProviderSettings::default());
    }

    #[test]
    #[serial]
    fn test_load_from_file_and_env() {
        let mut guard = env::guard();
        guard.remove("SIMPLE_ENV_FLAGS__PREFIX");

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "prefix = \"APP_\"").unwrap();

        let settings = ProviderSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.prefix, "APP_");

        guard.set("SIMPLE_ENV_FLAGS__PREFIX", "OVERRIDE_");
        let settings = ProviderSettings::load(Some(file.path())).unwrap();
        assert_eq!(settings.prefix, "OVERRIDE_");
    }

    #[test]
    #[serial]
    fn test_load_rejects_invalid_prefix() {
        let mut guard = env::guard();
        guard.set("SIMPLE_ENV_FLAGS__PREFIX", "BAD=");
        assert!(matches!(
            ProviderSettings::load(None),
            Err(ConfigError::InvalidPrefix(_))
        ));
    }
}
