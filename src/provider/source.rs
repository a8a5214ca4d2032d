use std::collections::HashMap;

/// Read-only lookup of environment variables by full name.
pub trait EnvSource: Send + Sync + std::fmt::Debug {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads the live process environment on every lookup.
///
/// Variables that are unset or not valid unicode both read as `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A fixed set of variables, independent of the process environment.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::env;
    use serial_test::serial;

    #[test]
    fn test_map_env_lookup_is_exact() {
        let source = MapEnv::new().with_var("FT_FOO", "1");
        assert_eq!(source.get("FT_FOO"), Some("1".to_string()));
        assert_eq!(source.get("ft_foo"), None);
    }

    #[test]
    fn test_map_env_from_iter() {
        let source: MapEnv = [("A", "1"), ("B", "2")].into_iter().collect();
        assert_eq!(source.get("B"), Some("2".to_string()));
    }

    #[test]
    #[serial]
    fn test_process_env_reads_live_value() {
        let mut guard = env::guard();
        guard.set("SIMPLE_ENV_FLAGS_SOURCE_TEST", "on");
        assert_eq!(
            ProcessEnv.get("SIMPLE_ENV_FLAGS_SOURCE_TEST"),
            Some("on".to_string())
        );

        guard.remove("SIMPLE_ENV_FLAGS_SOURCE_TEST");
        assert_eq!(ProcessEnv.get("SIMPLE_ENV_FLAGS_SOURCE_TEST"), None);
    }
}
