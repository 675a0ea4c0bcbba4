//! Middleware around the network call.

use crate::interceptor::Interceptor;
use crate::{HttpClientError, Response, Result};
use async_trait::async_trait;
use reqwest::Request;
use std::sync::Arc;
use std::time::Duration;

/// Middleware trait for processing requests and responses.
///
/// Middleware wraps the network call itself and runs after request
/// interceptors, before response interceptors.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Process the request and call the next middleware.
    async fn handle(&self, request: Request, next: &MiddlewareChain) -> Result<Response>;
}

/// Chain of middleware handlers ending in the network call.
///
/// The last link sends the request, hands the response head to every
/// interceptor's [`Interceptor::intercept_headers`] and only then buffers
/// the body.
#[derive(Clone)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    client: reqwest::Client,
    index: usize,
}

impl MiddlewareChain {
    pub(crate) fn from_parts(
        client: reqwest::Client,
        middlewares: Vec<Arc<dyn Middleware>>,
        interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Self {
        Self {
            middlewares,
            interceptors,
            client,
            index: 0,
        }
    }

    /// Execute the request through the middleware chain.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        self.execute_at(0, request).await
    }

    async fn execute_at(&self, index: usize, request: Request) -> Result<Response> {
        if index >= self.middlewares.len() {
            let response = self.client.execute(request).await?;
            for interceptor in self.interceptors.iter().rev() {
                interceptor
                    .intercept_headers(response.status(), response.headers())
                    .await?;
            }
            Response::from_reqwest(response).await
        } else {
            let next = MiddlewareChain {
                middlewares: self.middlewares.clone(),
                interceptors: self.interceptors.clone(),
                client: self.client.clone(),
                index: index + 1,
            };
            self.middlewares[index].handle(request, &next).await
        }
    }

    /// Continue to the next middleware.
    pub async fn next(&self, request: Request) -> Result<Response> {
        self.execute_at(self.index, request).await
    }
}

/// Fails the request with [`HttpClientError::Timeout`] once `timeout` passes.
pub struct TimeoutMiddleware {
    timeout: Duration,
}

impl TimeoutMiddleware {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Middleware for TimeoutMiddleware {
    async fn handle(&self, request: Request, next: &MiddlewareChain) -> Result<Response> {
        match tokio::time::timeout(self.timeout, next.next(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "HTTP request timed out");
                Err(HttpClientError::Timeout(self.timeout))
            }
        }
    }
}
