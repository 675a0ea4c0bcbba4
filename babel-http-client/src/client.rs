//! HTTP client implementation.

use http::Method;
use reqwest::Request;
use std::sync::Arc;
use tracing::debug;

use crate::{
    HttpClientConfig, HttpClientError, Interceptor, Middleware, RequestBuilder, Response, Result,
};
use crate::middleware::MiddlewareChain;

/// HTTP client whose every request passes through its interceptors.
///
/// Clones share the connection pool, cookie jar, interceptors and
/// middleware.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    config: Arc<HttpClientConfig>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .cookie_store(config.cookie_store)
            .build()
            .map_err(|e| HttpClientError::RequestBuild(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            interceptors: Vec::new(),
            middlewares: Vec::new(),
        })
    }

    /// Append an interceptor. Request hooks run in the order added.
    pub fn with_interceptor<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Append a middleware around the network call.
    pub fn with_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    pub(crate) fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get the client configuration.
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.len()
    }

    /// Create a GET request builder.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::GET, url.into())
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::POST, url.into())
    }

    /// Create a DELETE request builder.
    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::DELETE, url.into())
    }

    /// Send an already built request.
    ///
    /// Interceptors and middleware apply exactly as for
    /// [`RequestBuilder::send`]. Header hooks run before the body is read;
    /// response hooks run once it is buffered.
    pub async fn execute_request(&self, mut request: Request) -> Result<Response> {
        for interceptor in &self.interceptors {
            request = interceptor.intercept_request(request).await?;
        }

        debug!(method = %request.method(), url = %request.url(), "Executing request");

        let chain = MiddlewareChain::from_parts(
            self.inner.clone(),
            self.middlewares.clone(),
            self.interceptors.clone(),
        );
        let mut response = chain.execute(request).await?;

        for interceptor in self.interceptors.iter().rev() {
            response = interceptor.intercept_response(response).await?;
        }

        Ok(response)
    }
}
