// Configuration management for the Babel client

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::{ClientSettings, ThresholdKind};
pub use validation::{ConfigValidator, Validate};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Environment prefix for every Babel setting (`BABEL_API_BASE_URL`, ...).
pub const ENV_PREFIX: &str = "BABEL";

/// Flat key/value configuration store; later loads override earlier ones.
#[derive(Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<HashMap<String, serde_json::Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(HashMap::new())),
            env_prefix: None,
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            config: Arc::new(RwLock::new(HashMap::new())),
            env_prefix: Some(prefix.into()),
        }
    }

    pub fn builder() -> ConfigManagerBuilder {
        ConfigManagerBuilder::new()
    }

    /// Load prefixed environment variables
    pub fn load_env(&self) {
        let loader = EnvLoader::new(self.env_prefix.clone());
        self.merge_strings(loader.load());
    }

    /// Load a `.env` file into the process environment, then the environment
    pub fn load_dotenv(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                // A missing ./.env is not an error
                dotenvy::dotenv().ok();
            }
        }
        self.load_env();
        Ok(())
    }

    /// Load a configuration file
    pub fn load_file(&self, path: impl AsRef<Path>, format: FileFormat) -> Result<()> {
        let data = ConfigLoader::new(format).load_file(path)?;
        self.merge_value(data);
        Ok(())
    }

    fn merge_value(&self, data: serde_json::Value) {
        if let serde_json::Value::Object(map) = data {
            let mut config = self.config.write();
            for (key, value) in map {
                config.insert(key, value);
            }
        }
    }

    fn merge_strings(&self, vars: HashMap<String, String>) {
        let mut config = self.config.write();
        for (key, value) in vars {
            config.insert(key, serde_json::Value::String(value));
        }
    }

    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;

        self.config.write().insert(key.to_string(), json_value);
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let config = self.config.read();

        let value = config
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value.clone()).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Read a value that may be stored either natively or as a string.
    ///
    /// Environment variables always arrive as strings, so `"30"` has to be
    /// accepted where a file would hold `30`.
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + FromStr,
        T::Err: std::fmt::Display,
    {
        let config = self.config.read();
        let Some(value) = config.get(key) else {
            return Ok(None);
        };

        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(s) => s
                .trim()
                .parse::<T>()
                .map(Some)
                .map_err(|e| invalid(e.to_string())),
            other => serde_json::from_value(other.clone())
                .map(Some)
                .map_err(|e| invalid(e.to_string())),
        }
    }

    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.config.read().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.config.read().keys().cloned().collect()
    }

    /// Copy every key of `other` into this manager
    pub fn merge(&self, other: &ConfigManager) {
        let other_config = other.config.read().clone();
        let mut config = self.config.write();
        config.extend(other_config);
    }

    /// Deserialize the whole map into `T` and validate it
    pub fn load_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let json_value = {
            let config = self.config.read();
            serde_json::Value::Object(
                config
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )
        };

        let validated: T = serde_json::from_value(json_value)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        validated.validate()?;
        Ok(validated)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder applying sources in order: files, `.env`, environment.
pub struct ConfigManagerBuilder {
    prefix: Option<String>,
    load_env: bool,
    load_dotenv: bool,
    dotenv_path: Option<PathBuf>,
    config_files: Vec<(PathBuf, FileFormat)>,
}

impl ConfigManagerBuilder {
    pub fn new() -> Self {
        Self {
            prefix: None,
            load_env: false,
            load_dotenv: false,
            dotenv_path: None,
            config_files: Vec::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn load_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    pub fn load_dotenv(mut self, path: Option<PathBuf>) -> Self {
        self.load_dotenv = true;
        self.dotenv_path = path;
        self
    }

    pub fn add_file(mut self, path: impl Into<PathBuf>, format: FileFormat) -> Self {
        self.config_files.push((path.into(), format));
        self
    }

    pub fn build(self) -> Result<ConfigManager> {
        let manager = match self.prefix {
            Some(prefix) => ConfigManager::with_prefix(prefix),
            None => ConfigManager::new(),
        };

        for (path, format) in &self.config_files {
            babel_log::debug!("Loading configuration file {}", path.display());
            manager.load_file(path, *format)?;
        }

        if self.load_dotenv {
            if let Err(e) = manager.load_dotenv(self.dotenv_path.as_deref()) {
                babel_log::warn!("Ignoring .env file: {}", e);
                manager.load_env();
            }
        } else if self.load_env {
            manager.load_env();
        }

        Ok(manager)
    }
}

impl Default for ConfigManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
