// Configuration validation

use crate::{ConfigError, Result};

/// Implemented by typed configuration structs
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable field checks
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
        Ok(())
    }

    pub fn in_range<T: PartialOrd + std::fmt::Display>(
        value: T,
        min: T,
        max: T,
        field: &str,
    ) -> Result<()> {
        if value < min || value > max {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between {} and {} (got {})",
                field, min, max, value
            )));
        }
        Ok(())
    }

    pub fn one_of<T: PartialEq + std::fmt::Debug>(value: &T, allowed: &[T], field: &str) -> Result<()> {
        if !allowed.contains(value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be one of {:?}",
                field, allowed
            )));
        }
        Ok(())
    }

    pub fn is_url(value: &str, field: &str) -> Result<()> {
        let rest = value
            .strip_prefix("http://")
            .or_else(|| value.strip_prefix("https://"));
        match rest {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(ConfigError::ValidationError(format!(
                "{} must be an http(s) URL",
                field
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty_validation() {
        assert!(ConfigValidator::not_empty("value", "field").is_ok());
        assert!(ConfigValidator::not_empty("  ", "field").is_err());
    }

    #[test]
    fn test_range_validation() {
        assert!(ConfigValidator::in_range(60, 1, 3600, "interval").is_ok());
        assert!(ConfigValidator::in_range(0, 1, 3600, "interval").is_err());
        assert!(ConfigValidator::in_range(3601, 1, 3600, "interval").is_err());
    }

    #[test]
    fn test_one_of_validation() {
        let allowed = ["fraction", "margin"];
        assert!(ConfigValidator::one_of(&"margin", &allowed, "threshold").is_ok());
        assert!(ConfigValidator::one_of(&"half", &allowed, "threshold").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(ConfigValidator::is_url("https://babel.example", "url").is_ok());
        assert!(ConfigValidator::is_url("http://192.168.0.105:8080", "url").is_ok());
        assert!(ConfigValidator::is_url("http://", "url").is_err());
        assert!(ConfigValidator::is_url("babel.example", "url").is_err());
    }
}
