//! Integration tests for babel-config

use babel_config::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_toml_file_into_settings() {
    let file = temp_file(
        ".toml",
        r#"
            api_base_url = "http://192.168.0.105:5000"
            auth_base_url = "http://192.168.0.105:8080"
            reauth_interval_secs = 30
            reauth_threshold = "margin"
            expiry_margin_secs = 90
        "#,
    );

    let manager = ConfigManager::builder()
        .add_file(file.path(), FileFormat::Toml)
        .build()
        .unwrap();

    let settings = ClientSettings::from_manager(&manager).unwrap();
    assert_eq!(settings.api_base_url, "http://192.168.0.105:5000");
    assert_eq!(settings.auth_base_url(), "http://192.168.0.105:8080");
    assert_eq!(settings.reauth_interval_secs, 30);
    assert_eq!(settings.reauth_threshold, ThresholdKind::Margin);
    assert_eq!(settings.expiry_margin_secs, 90);
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn test_load_json_file() {
    let file = temp_file(
        ".json",
        r#"{"api_base_url": "https://babel.example", "leeway_divisor": 4}"#,
    );

    let manager = ConfigManager::new();
    manager
        .load_file(file.path(), FileFormat::detect(file.path()).unwrap())
        .unwrap();

    assert!(manager.has("api_base_url"));
    assert_eq!(manager.get::<u32>("leeway_divisor").unwrap(), 4);
}

#[test]
fn test_env_overrides_file() {
    let file = temp_file(".toml", r#"reauth_timeout_secs = 10"#);

    unsafe {
        std::env::set_var("BABELITEST_REAUTH_TIMEOUT_SECS", "45");
    }

    let manager = ConfigManager::builder()
        .with_prefix("BABELITEST")
        .add_file(file.path(), FileFormat::Toml)
        .load_env()
        .build()
        .unwrap();

    let settings = ClientSettings::from_manager(&manager).unwrap();
    assert_eq!(settings.reauth_timeout_secs, 45);

    unsafe {
        std::env::remove_var("BABELITEST_REAUTH_TIMEOUT_SECS");
    }
}

#[test]
fn test_invalid_url_in_file_fails_validation() {
    let file = temp_file(".toml", r#"api_base_url = "localhost:5000""#);

    let manager = ConfigManager::builder()
        .add_file(file.path(), FileFormat::Toml)
        .build()
        .unwrap();

    let err = ClientSettings::from_manager(&manager).unwrap_err();
    assert!(err.to_string().contains("api_base_url"));
}

#[test]
fn test_load_validated_round_trip() {
    let manager = ConfigManager::new();
    let defaults = ClientSettings::default();
    manager.set("api_base_url", &defaults.api_base_url).unwrap();
    manager.set("auth_base_url", Option::<String>::None).unwrap();
    manager.set("credentials_path", Option::<String>::None).unwrap();
    manager.set("request_timeout_secs", 30).unwrap();
    manager.set("reauth_interval_secs", 60).unwrap();
    manager.set("reauth_timeout_secs", 30).unwrap();
    manager.set("reauth_threshold", "fraction").unwrap();
    manager.set("leeway_divisor", 3).unwrap();
    manager.set("expiry_margin_secs", 120).unwrap();

    let settings: ClientSettings = manager.load_validated().unwrap();
    assert_eq!(settings, defaults);
}

#[test]
fn test_missing_file_is_load_error() {
    let manager = ConfigManager::new();
    let result = manager.load_file("/nonexistent/babel.toml", FileFormat::Toml);
    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}

#[test]
fn test_explicit_path_with_unknown_extension() {
    let file = temp_file(".yaml", "api_base_url: x");
    assert!(ClientSettings::load(Some(file.path())).is_err());
}
