//! Shared setup for every command: settings, credential storage and the
//! API client.

use babel_api::{ApiConfig, BabelClient};
use babel_config::{ClientSettings, ThresholdKind};
use babel_reauth::{ReauthConfig, ReauthThreshold};
use babel_session::{CredentialStore, FileStorage};
use std::path::{Path, PathBuf};

use crate::error::CliResult;

pub const CREDENTIALS_FILE: &str = "credentials.json";

pub struct Context {
    pub settings: ClientSettings,
    pub credentials_path: PathBuf,
    pub client: BabelClient,
}

impl Context {
    pub fn load(config_path: Option<&Path>, log_requests: bool) -> CliResult<Self> {
        let settings = ClientSettings::load(config_path)?;
        let credentials_path = settings
            .credentials_path
            .clone()
            .unwrap_or_else(default_credentials_path);

        let store = CredentialStore::new(FileStorage::new(&credentials_path));
        let mut api = api_config(&settings);
        api.log_requests = log_requests;
        let client = BabelClient::new(api, store)?;

        Ok(Self {
            settings,
            credentials_path,
            client,
        })
    }

    pub fn reauth_config(&self) -> ReauthConfig {
        reauth_config(&self.settings)
    }
}

/// `<data dir>/babel/credentials.json`, or `.babel/` in the working
/// directory when the platform has no data dir.
pub fn default_credentials_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("babel"))
        .unwrap_or_else(|| PathBuf::from(".babel"))
        .join(CREDENTIALS_FILE)
}

pub fn api_config(settings: &ClientSettings) -> ApiConfig {
    let mut builder = ApiConfig::builder()
        .api_base_url(&settings.api_base_url)
        .timeout(settings.request_timeout());
    if let Some(auth) = &settings.auth_base_url {
        builder = builder.auth_base_url(auth);
    }
    builder.build()
}

pub fn reauth_config(settings: &ClientSettings) -> ReauthConfig {
    let threshold = match settings.reauth_threshold {
        ThresholdKind::Fraction => ReauthThreshold::fraction(settings.leeway_divisor),
        ThresholdKind::Margin => ReauthThreshold::margin(settings.expiry_margin_secs),
    };

    ReauthConfig::default()
        .with_interval(settings.reauth_interval())
        .with_timeout(settings.reauth_timeout())
        .with_threshold(threshold)
}
