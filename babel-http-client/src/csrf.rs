//! CSRF token propagation.

use crate::Result;
use crate::interceptor::Interceptor;
use async_trait::async_trait;
use babel_session::CredentialStore;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use reqwest::Request;

/// Header carrying the CSRF token in both directions.
pub const CSRF_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");
/// Header identifying the kind of client to the server.
pub const CLIENT_TYPE_HEADER: HeaderName = HeaderName::from_static("x-client-type");
/// Client type the server expects from the web front end.
pub const CLIENT_TYPE_WEB: &str = "web";

/// Attaches the stored CSRF token to requests and captures rotated tokens
/// from responses.
///
/// - Outgoing: with a stored token, `X-CSRF-TOKEN` and `X-CLIENT-TYPE: web`
///   are set. Without one the request goes out untouched.
/// - Incoming: a non-empty `X-CSRF-TOKEN` header replaces the stored token,
///   whatever the status code. It is read from the response head, so the
///   token is kept even when the body never arrives.
///
/// Storage failures are logged and never fail the request, and the
/// response's status and body are never touched.
#[derive(Clone, Debug)]
pub struct CsrfInterceptor {
    store: CredentialStore,
}

impl CsrfInterceptor {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }
}

#[async_trait]
impl Interceptor for CsrfInterceptor {
    async fn intercept_request(&self, mut request: Request) -> Result<Request> {
        let token = match self.store.get_token().await {
            Ok(Some(token)) => token,
            Ok(None) => return Ok(request),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read CSRF token, sending without it");
                return Ok(request);
            }
        };

        match HeaderValue::from_str(&token) {
            Ok(value) => {
                let headers = request.headers_mut();
                headers.insert(CSRF_TOKEN_HEADER, value);
                headers.insert(CLIENT_TYPE_HEADER, HeaderValue::from_static(CLIENT_TYPE_WEB));
            }
            Err(_) => {
                tracing::warn!("Stored CSRF token is not a valid header value, skipping it");
            }
        }

        Ok(request)
    }

    async fn intercept_headers(&self, status: StatusCode, headers: &HeaderMap) -> Result<()> {
        let Some(value) = headers.get(&CSRF_TOKEN_HEADER) else {
            return Ok(());
        };

        match value.to_str() {
            Ok(token) if !token.is_empty() => {
                if let Err(e) = self.store.set_token(token).await {
                    tracing::warn!(error = %e, "Could not store rotated CSRF token");
                } else {
                    tracing::trace!(status = %status, "Captured CSRF token");
                }
            }
            Ok(_) => {}
            Err(_) => {
                tracing::warn!("Ignoring CSRF token header that is not valid text");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn url() -> url::Url {
        url::Url::parse("http://localhost:8080/login").unwrap()
    }

    fn headers_with(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        headers
    }

    #[tokio::test]
    async fn test_request_without_token_is_unchanged() {
        let interceptor = CsrfInterceptor::new(CredentialStore::in_memory());

        let request = interceptor
            .intercept_request(Request::new(Method::GET, url()))
            .await
            .unwrap();

        assert!(request.headers().get(&CSRF_TOKEN_HEADER).is_none());
        assert!(request.headers().get(&CLIENT_TYPE_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_request_with_token_gets_both_headers() {
        let store = CredentialStore::in_memory();
        store.set_token("abc").await.unwrap();
        let interceptor = CsrfInterceptor::new(store);

        let request = interceptor
            .intercept_request(Request::new(Method::POST, url()))
            .await
            .unwrap();

        assert_eq!(request.headers()["X-CSRF-TOKEN"], "abc");
        assert_eq!(request.headers()["X-CLIENT-TYPE"], "web");
    }

    #[tokio::test]
    async fn test_unrepresentable_token_is_skipped() {
        let store = CredentialStore::in_memory();
        store.set_token("bad\ntoken").await.unwrap();
        let interceptor = CsrfInterceptor::new(store);

        let request = interceptor
            .intercept_request(Request::new(Method::GET, url()))
            .await
            .unwrap();
        assert!(request.headers().get(&CSRF_TOKEN_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_response_token_is_captured_on_error_status() {
        let store = CredentialStore::in_memory();
        store.set_token("old").await.unwrap();
        let interceptor = CsrfInterceptor::new(store.clone());

        interceptor
            .intercept_headers(StatusCode::FORBIDDEN, &headers_with("x-csrf-token", "new"))
            .await
            .unwrap();

        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_empty_or_missing_header_keeps_token() {
        let store = CredentialStore::in_memory();
        store.set_token("keep").await.unwrap();
        let interceptor = CsrfInterceptor::new(store.clone());

        interceptor
            .intercept_headers(StatusCode::OK, &headers_with("x-csrf-token", ""))
            .await
            .unwrap();
        interceptor
            .intercept_headers(StatusCode::OK, &headers_with("exhausted", "true"))
            .await
            .unwrap();

        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("keep"));
    }
}
