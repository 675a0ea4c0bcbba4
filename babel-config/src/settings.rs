//! Typed client settings.
//!
//! [`ClientSettings`] is the view every front end works from. It is read from
//! a [`ConfigManager`] so the same keys can come from `babel.toml`, a `.env`
//! file or `BABEL_*` environment variables.
//!
//! ```toml
//! api_base_url = "http://localhost:5000"
//! auth_base_url = "http://localhost:8080"
//! reauth_threshold = "fraction"
//! leeway_divisor = 3
//! ```

use crate::{ConfigError, ConfigManager, ConfigValidator, FileFormat, Result, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "babel.toml";

/// Which expiry rule the reauthentication loop applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdKind {
    /// Renew when `expiry < now + leeway / divisor`.
    #[default]
    Fraction,
    /// Renew when `expiry < now - margin - leeway`.
    Margin,
}

impl ThresholdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdKind::Fraction => "fraction",
            ThresholdKind::Margin => "margin",
        }
    }
}

impl fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThresholdKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fraction" => Ok(ThresholdKind::Fraction),
            "margin" => Ok(ThresholdKind::Margin),
            other => Err(format!("unknown threshold '{}' (expected fraction or margin)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub api_base_url: String,
    /// Host serving get-csrf, login, register, reissue and purge-family.
    pub auth_base_url: Option<String>,
    /// Where credentials persist between runs; `None` leaves the choice to
    /// the caller.
    pub credentials_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub reauth_interval_secs: u64,
    pub reauth_timeout_secs: u64,
    pub reauth_threshold: ThresholdKind,
    pub leeway_divisor: u32,
    pub expiry_margin_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            auth_base_url: None,
            credentials_path: None,
            request_timeout_secs: 30,
            reauth_interval_secs: 60,
            reauth_timeout_secs: 30,
            reauth_threshold: ThresholdKind::Fraction,
            leeway_divisor: 3,
            expiry_margin_secs: 120,
        }
    }
}

impl ClientSettings {
    /// Load settings from an optional file, `.env` and the environment.
    ///
    /// Without an explicit path, `babel.toml` in the working directory is
    /// used when it exists.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigManager::builder()
            .with_prefix(crate::ENV_PREFIX)
            .load_dotenv(None);

        match config_path {
            Some(path) => {
                builder = builder.add_file(path, FileFormat::detect(path)?);
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    builder = builder.add_file(default, FileFormat::Toml);
                }
            }
        }

        Self::from_manager(&builder.build()?)
    }

    /// Build settings from whatever keys `manager` holds, defaulting the rest.
    pub fn from_manager(manager: &ConfigManager) -> Result<Self> {
        let defaults = Self::default();

        let settings = Self {
            api_base_url: manager
                .get_parsed::<String>("api_base_url")?
                .unwrap_or(defaults.api_base_url),
            auth_base_url: manager
                .get_parsed::<String>("auth_base_url")?
                .filter(|url| !url.trim().is_empty()),
            credentials_path: manager
                .get_parsed::<String>("credentials_path")?
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            request_timeout_secs: manager
                .get_parsed("request_timeout_secs")?
                .unwrap_or(defaults.request_timeout_secs),
            reauth_interval_secs: manager
                .get_parsed("reauth_interval_secs")?
                .unwrap_or(defaults.reauth_interval_secs),
            reauth_timeout_secs: manager
                .get_parsed("reauth_timeout_secs")?
                .unwrap_or(defaults.reauth_timeout_secs),
            reauth_threshold: manager
                .get_parsed("reauth_threshold")?
                .unwrap_or(defaults.reauth_threshold),
            leeway_divisor: manager
                .get_parsed("leeway_divisor")?
                .unwrap_or(defaults.leeway_divisor),
            expiry_margin_secs: manager
                .get_parsed("expiry_margin_secs")?
                .unwrap_or(defaults.expiry_margin_secs),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Auth host, falling back to the API host
    pub fn auth_base_url(&self) -> &str {
        self.auth_base_url.as_deref().unwrap_or(&self.api_base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn reauth_interval(&self) -> Duration {
        Duration::from_secs(self.reauth_interval_secs)
    }

    pub fn reauth_timeout(&self) -> Duration {
        Duration::from_secs(self.reauth_timeout_secs)
    }
}

impl Validate for ClientSettings {
    fn validate(&self) -> Result<()> {
        ConfigValidator::is_url(&self.api_base_url, "api_base_url")?;
        if let Some(auth) = &self.auth_base_url {
            ConfigValidator::is_url(auth, "auth_base_url")?;
        }

        ConfigValidator::in_range(self.request_timeout_secs, 1, 3600, "request_timeout_secs")?;
        ConfigValidator::in_range(self.reauth_interval_secs, 1, 86_400, "reauth_interval_secs")?;
        ConfigValidator::in_range(self.reauth_timeout_secs, 1, 3600, "reauth_timeout_secs")?;

        if self.reauth_threshold == ThresholdKind::Fraction && self.leeway_divisor == 0 {
            return Err(ConfigError::ValidationError(
                "leeway_divisor must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ClientSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.reauth_interval(), Duration::from_secs(60));
        assert_eq!(settings.reauth_timeout(), Duration::from_secs(30));
        assert_eq!(settings.reauth_threshold, ThresholdKind::Fraction);
    }

    #[test]
    fn test_auth_url_falls_back_to_api_url() {
        let mut settings = ClientSettings::default();
        assert_eq!(settings.auth_base_url(), "http://localhost:5000");

        settings.auth_base_url = Some("http://localhost:8080".to_string());
        assert_eq!(settings.auth_base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_from_manager_reads_string_values() {
        let manager = ConfigManager::new();
        manager.set("api_base_url", "https://babel.example").unwrap();
        manager.set("reauth_interval_secs", "15").unwrap();
        manager.set("reauth_threshold", "Margin").unwrap();
        manager.set("credentials_path", "/tmp/babel.json").unwrap();

        let settings = ClientSettings::from_manager(&manager).unwrap();
        assert_eq!(settings.api_base_url, "https://babel.example");
        assert_eq!(settings.reauth_interval_secs, 15);
        assert_eq!(settings.reauth_threshold, ThresholdKind::Margin);
        assert_eq!(settings.credentials_path, Some(PathBuf::from("/tmp/babel.json")));
        assert_eq!(settings.leeway_divisor, 3);
    }

    #[test]
    fn test_empty_auth_url_is_treated_as_unset() {
        let manager = ConfigManager::new();
        manager.set("auth_base_url", "").unwrap();

        let settings = ClientSettings::from_manager(&manager).unwrap();
        assert_eq!(settings.auth_base_url, None);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let manager = ConfigManager::new();
        manager.set("reauth_interval_secs", 0).unwrap();

        assert!(matches!(
            ClientSettings::from_manager(&manager),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_zero_divisor_only_matters_for_fraction() {
        let mut settings = ClientSettings {
            leeway_divisor: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        settings.reauth_threshold = ThresholdKind::Margin;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_threshold_kind_parsing() {
        assert_eq!("fraction".parse::<ThresholdKind>(), Ok(ThresholdKind::Fraction));
        assert_eq!(" MARGIN ".parse::<ThresholdKind>(), Ok(ThresholdKind::Margin));
        assert!("half".parse::<ThresholdKind>().is_err());
    }
}
