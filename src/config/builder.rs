use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::env::load_env_vars;
use super::ConfigError;

#[derive(Debug)]
enum ConfigSource {
    File { path: PathBuf, required: bool },
    Env { prefix: String, separator: String },
}

/// Layered loader for provider settings.
///
/// Sources are merged in registration order, later sources overriding earlier
/// ones. Nested tables are merged recursively; other values are replaced.
///
/// ## Example
///
/// ```no_run
/// use simple_env_flags::{Config, ProviderSettings};
///
/// // file defaults, then SIMPLE_ENV_FLAGS__PREFIX=... overrides
/// let settings: ProviderSettings = Config::builder()
///     .with_file("flags.toml", false)
///     .with_env("SIMPLE_ENV_FLAGS", "__")
///     .build()?;
/// # Ok::<(), simple_env_flags::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    sources: Vec<ConfigSource>,
}

impl Config {
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a TOML file. Missing optional files are skipped; a missing
    /// required file fails the build.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.sources.push(ConfigSource::File {
            path: path.as_ref().to_path_buf(),
            required,
        });
        self
    }

    /// Adds overrides from `PREFIX<sep>KEY` environment variables.
    ///
    /// The remainder after the prefix is split on the separator and lower-cased
    /// to form the config path, so `SIMPLE_ENV_FLAGS__PREFIX` sets `prefix`.
    pub fn with_env(mut self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.sources.push(ConfigSource::Env {
            prefix: prefix.into(),
            separator: separator.into(),
        });
        self
    }

    pub fn build<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        let mut merged = toml::Table::new();

        for source in self.sources {
            match source {
                ConfigSource::File { path, required } => {
                    if let Some(table) = load_config_file(&path, required)? {
                        tracing::debug!(path = %path.display(), "loaded config file");
                        deep_merge(&mut merged, table);
                    }
                }
                ConfigSource::Env { prefix, separator } => {
                    load_env_vars(&mut merged, &prefix, &separator);
                }
            }
        }

        toml::Value::Table(merged)
            .try_into()
            .map_err(ConfigError::DeserializeError)
    }
}

/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn load_config_file(path: &Path, required: bool) -> Result<Option<toml::Table>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(table))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn deep_merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env;
    use serde::Deserialize;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        prefix: String,
        #[serde(default)]
        nested: Nested,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Nested {
        #[serde(default)]
        a: Option<String>,
        #[serde(default)]
        b: Option<String>,
    }

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_later_files_override_and_tables_merge() {
        let base = toml_file("prefix = \"A_\"\n[nested]\na = \"1\"\n");
        let local = toml_file("prefix = \"B_\"\n[nested]\nb = \"2\"\n");

        let sample: Sample = Config::builder()
            .with_file(base.path(), true)
            .with_file(local.path(), true)
            .build()
            .unwrap();

        assert_eq!(sample.prefix, "B_");
        assert_eq!(sample.nested.a.as_deref(), Some("1"));
        assert_eq!(sample.nested.b.as_deref(), Some("2"));
    }

    #[test]
    fn test_required_file_missing() {
        let result = Config::builder()
            .with_file("/nonexistent/path/flags.toml", true)
            .build::<Sample>();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let file = toml_file("prefix = ");
        let result = Config::builder().with_file(file.path(), true).build::<Sample>();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_missing_field_is_deserialize_error() {
        let file = toml_file("other = 1\n");
        let result = Config::builder().with_file(file.path(), true).build::<Sample>();
        assert!(matches!(result, Err(ConfigError::DeserializeError(_))));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let mut guard = env::guard();
        guard.set("SEF_BUILDER_TEST__PREFIX", "ENV_");
        let file = toml_file("prefix = \"FILE_\"\n");

        let sample: Sample = Config::builder()
            .with_file(file.path(), true)
            .with_env("SEF_BUILDER_TEST", "__")
            .build()
            .unwrap();
        assert_eq!(sample.prefix, "ENV_");
    }
}
