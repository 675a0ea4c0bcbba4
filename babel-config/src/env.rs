// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::HashMap;
use std::env;

/// Collects `PREFIX_*` environment variables as lower-case keys.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Load matching variables from the process environment
    pub fn load(&self) -> HashMap<String, String> {
        self.load_from(env::vars())
    }

    /// Load matching variables from an explicit list of pairs
    pub fn load_from<I>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = HashMap::new();

        for (key, value) in vars {
            match &self.prefix {
                Some(prefix) => {
                    if let Some(rest) = key.strip_prefix(prefix.as_str())
                        && let Some(rest) = rest.strip_prefix('_')
                        && !rest.is_empty()
                    {
                        config.insert(rest.to_lowercase(), value);
                    }
                }
                None => {
                    config.insert(key.to_lowercase(), value);
                }
            }
        }

        config
    }

    /// Read one variable, applying the prefix
    pub fn load_var(&self, key: &str) -> Result<String> {
        env::var(self.full_key(key)).map_err(ConfigError::EnvError)
    }

    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_prefix_filters_and_strips() {
        let loader = EnvLoader::new(Some("BABEL".to_string()));
        let vars = loader.load_from(pairs(&[
            ("BABEL_API_BASE_URL", "http://localhost:5000"),
            ("BABEL_REAUTH_INTERVAL_SECS", "30"),
            ("BABELFISH", "ignored"),
            ("PATH", "/usr/bin"),
        ]));

        assert_eq!(vars.len(), 2);
        assert_eq!(vars["api_base_url"], "http://localhost:5000");
        assert_eq!(vars["reauth_interval_secs"], "30");
    }

    #[test]
    fn test_without_prefix_keeps_everything() {
        let loader = EnvLoader::default();
        let vars = loader.load_from(pairs(&[("HOME", "/root"), ("Api_Key", "x")]));
        assert_eq!(vars["home"], "/root");
        assert_eq!(vars["api_key"], "x");
    }

    #[test]
    fn test_load_var_missing_uses_default() {
        let loader = EnvLoader::new(Some("BABEL_TEST_NOPE".to_string()));
        assert!(loader.load_var("MISSING_VAR_67890").is_err());
        assert_eq!(loader.load_var_or("MISSING_VAR_67890", "fallback"), "fallback");
    }

    #[test]
    fn test_full_key() {
        let loader = EnvLoader::new(Some("BABEL".to_string()));
        assert_eq!(loader.full_key("api_base_url"), "BABEL_API_BASE_URL");
    }
}
