//! The Babel API client.

use babel_http_client::{
    CLIENT_TYPE_HEADER, CLIENT_TYPE_WEB, CSRF_TOKEN_HEADER, CsrfInterceptor, HttpClient,
    HttpClientConfig, LoggingInterceptor, Response, TimeoutMiddleware,
};
use babel_log::{debug, info};
use babel_reauth::{ReauthConfig, ReauthLoop, ReauthLoopBuilder};
use babel_session::{CredentialStore, Credentials};
use serde_json::Value;

use crate::{ApiConfig, ApiError, Result};

pub const GET_CSRF_PATH: &str = "/get-csrf";

/// One async method per Babel endpoint.
///
/// Every call goes through the CSRF interceptor, so the stored token is
/// attached and rotated tokens are captured. Clones share the cookie jar
/// and the credential store.
#[derive(Clone)]
pub struct BabelClient {
    http: HttpClient,
    store: CredentialStore,
    config: ApiConfig,
}

impl BabelClient {
    /// Create a client backed by `store`.
    pub fn new(config: ApiConfig, store: CredentialStore) -> Result<Self> {
        let http_config = HttpClientConfig::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build();

        let mut http = HttpClient::new(http_config)?
            .with_interceptor(CsrfInterceptor::new(store.clone()))
            .with_middleware(TimeoutMiddleware::new(config.timeout));
        if config.log_requests {
            http = http.with_interceptor(LoggingInterceptor::new());
        }

        Ok(Self::with_http_client(http, store, config))
    }

    /// Wrap an already configured HTTP client.
    ///
    /// The client should carry a [`CsrfInterceptor`] over the same store.
    pub fn with_http_client(http: HttpClient, store: CredentialStore, config: ApiConfig) -> Self {
        Self {
            http,
            store,
            config,
        }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Stored credentials as currently persisted.
    pub async fn session(&self) -> Result<Credentials> {
        Ok(self.store.snapshot().await?)
    }

    /// Fetch a CSRF token unless one is already stored.
    ///
    /// Returns `true` when a new token was issued.
    pub async fn ensure_csrf(&self) -> Result<bool> {
        if self.store.get_token().await?.is_some() {
            debug!("CSRF token already stored");
            return Ok(false);
        }

        let response = self
            .http
            .get(self.config.auth_url(GET_CSRF_PATH))
            .header(CLIENT_TYPE_HEADER.as_str(), CLIENT_TYPE_WEB)
            .send()
            .await?;

        if !response.is_success() {
            return Err(ApiError::CsrfIssuance("CSRF issuance failed".to_string()));
        }

        match response.header(CSRF_TOKEN_HEADER.as_str()) {
            Some(token) if !token.is_empty() => {
                // The interceptor has usually stored it already
                self.store.set_token(token).await?;
                info!("CSRF token issued");
                Ok(true)
            }
            _ => Err(ApiError::CsrfIssuance("CSRF Token not found!".to_string())),
        }
    }

    /// A reauthentication loop targeting this client's auth service.
    ///
    /// The loop shares this client's cookies and credential store.
    pub fn reauth_loop(&self, config: ReauthConfig) -> ReauthLoopBuilder {
        ReauthLoop::builder(self.http.clone(), self.store.clone())
            .reissue_url(self.config.auth_url(babel_reauth::REISSUE_PATH))
            .config(config)
    }
}

/// Parse a response body as JSON, mapping failures to
/// [`ApiError::UnexpectedResponse`].
pub(crate) fn json_body(response: &Response) -> Result<Value> {
    response
        .json::<Value>()
        .map_err(|e| ApiError::UnexpectedResponse(e.to_string()))
}

/// The `message` of an error body, or the canonical reason.
pub(crate) fn error_message(response: &Response) -> String {
    response
        .json::<Value>()
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            response
                .status()
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use babel_http_client::{Bytes, HeaderMap, StatusCode, Url};

    fn response(status: u16, body: &'static str) -> Response {
        Response::from_parts(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            Bytes::from_static(body.as_bytes()),
            Url::parse("http://localhost/login").unwrap(),
        )
    }

    #[test]
    fn test_error_message_from_body() {
        let resp = response(401, r#"{"message": "Invalid credentials"}"#);
        assert_eq!(error_message(&resp), "Invalid credentials");
    }

    #[test]
    fn test_error_message_falls_back_to_reason() {
        assert_eq!(error_message(&response(500, "oops")), "Internal Server Error");
        assert_eq!(error_message(&response(409, "{}")), "Conflict");
    }

    #[test]
    fn test_json_body_rejects_garbage() {
        assert!(matches!(
            json_body(&response(200, "<html>")),
            Err(ApiError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_client_wires_interceptors() {
        let client = BabelClient::new(ApiConfig::default(), CredentialStore::in_memory()).unwrap();
        assert_eq!(client.http().interceptor_count(), 1);

        let config = ApiConfig::builder().log_requests(true).build();
        let client = BabelClient::new(config, CredentialStore::in_memory()).unwrap();
        assert_eq!(client.http().interceptor_count(), 2);
    }
}
