//! Babel API client configuration.

use std::time::Duration;

/// Where the Babel services live and how long to wait for them.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the feature service (translation, transcription,
    /// history, languages, account deletion).
    pub api_base_url: String,
    /// Base URL of the auth service (CSRF, login, register, reissue,
    /// logout). Falls back to `api_base_url`.
    pub auth_base_url: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Log every request and response.
    pub log_requests: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            auth_base_url: None,
            timeout: Duration::from_secs(30),
            log_requests: false,
        }
    }
}

impl ApiConfig {
    /// Create a configuration where both services share one host.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    /// Create a configuration builder.
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::default()
    }

    /// The auth service base URL.
    pub fn auth_base_url(&self) -> &str {
        self.auth_base_url.as_deref().unwrap_or(&self.api_base_url)
    }

    /// Absolute URL of `path` on the feature service.
    pub fn api_url(&self, path: &str) -> String {
        join(&self.api_base_url, path)
    }

    /// Absolute URL of `path` on the auth service.
    pub fn auth_url(&self, path: &str) -> String {
        join(self.auth_base_url(), path)
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Builder for [`ApiConfig`].
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    config: ApiConfig,
}

impl ApiConfigBuilder {
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.auth_base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn log_requests(mut self, enable: bool) -> Self {
        self.config.log_requests = enable;
        self
    }

    pub fn build(self) -> ApiConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_falls_back_to_api() {
        let config = ApiConfig::new("http://babel.local:5000/");
        assert_eq!(config.auth_base_url(), "http://babel.local:5000/");
        assert_eq!(config.auth_url("/get-csrf"), "http://babel.local:5000/get-csrf");
    }

    #[test]
    fn test_split_hosts() {
        let config = ApiConfig::builder()
            .api_base_url("http://api.local")
            .auth_base_url("http://auth.local:8080")
            .build();

        assert_eq!(config.api_url("translate-text"), "http://api.local/translate-text");
        assert_eq!(config.auth_url("/reissue"), "http://auth.local:8080/reissue");
    }

    #[test]
    fn test_base_path_is_kept() {
        let config = ApiConfig::new("http://host/babel");
        assert_eq!(config.api_url("/fetch-history"), "http://host/babel/fetch-history");
    }
}
