//! Request and response interceptors.

use crate::{Response, Result};
use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use reqwest::Request;

/// Hook run around every request the client sends.
///
/// `intercept_request` runs in registration order before the request leaves.
/// The response hooks run in reverse order for every status code:
/// `intercept_headers` as soon as the status line and headers arrive, before
/// the body is read, then `intercept_response` once the body is buffered. A
/// body that fails to arrive skips `intercept_response` only.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Intercept and optionally modify the request before sending.
    async fn intercept_request(&self, request: Request) -> Result<Request> {
        Ok(request)
    }

    /// Inspect the response head before the body is read.
    async fn intercept_headers(&self, _status: StatusCode, _headers: &HeaderMap) -> Result<()> {
        Ok(())
    }

    /// Intercept and optionally modify the response after receiving.
    async fn intercept_response(&self, response: Response) -> Result<Response> {
        Ok(response)
    }
}

/// Header values never written to the log.
const REDACTED_HEADERS: &[&str] = &["x-csrf-token", "cookie", "set-cookie", "authorization"];

/// Logging interceptor that traces requests and responses.
pub struct LoggingInterceptor {
    log_headers: bool,
}

impl LoggingInterceptor {
    /// Create a new logging interceptor.
    pub fn new() -> Self {
        Self { log_headers: false }
    }

    /// Enable logging of headers.
    pub fn with_headers(mut self) -> Self {
        self.log_headers = true;
        self
    }

    fn trace_headers(kind: &str, headers: &HeaderMap) {
        for (name, value) in headers {
            if REDACTED_HEADERS.contains(&name.as_str()) {
                tracing::trace!(header = %name, value = "<redacted>", "{} header", kind);
            } else {
                tracing::trace!(header = %name, value = ?value, "{} header", kind);
            }
        }
    }
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Interceptor for LoggingInterceptor {
    async fn intercept_request(&self, request: Request) -> Result<Request> {
        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            "Sending HTTP request"
        );

        if self.log_headers {
            Self::trace_headers("Request", request.headers());
        }

        Ok(request)
    }

    async fn intercept_response(&self, response: Response) -> Result<Response> {
        tracing::debug!(
            status = %response.status(),
            url = %response.url(),
            "Received HTTP response"
        );

        if self.log_headers {
            Self::trace_headers("Response", response.headers());
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[tokio::test]
    async fn test_logging_interceptor_passes_through() {
        let interceptor = LoggingInterceptor::new().with_headers();
        let url = url::Url::parse("http://localhost/translate-text").unwrap();

        let request = Request::new(Method::POST, url.clone());
        let request = interceptor.intercept_request(request).await.unwrap();
        assert_eq!(request.method(), Method::POST);

        let response = Response::from_parts(StatusCode::CREATED, HeaderMap::new(), "{}", url);
        let response = interceptor.intercept_response(response).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.text().unwrap(), "{}");
    }
}
