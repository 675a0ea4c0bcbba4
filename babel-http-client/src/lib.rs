//! # Babel HTTP Client
//!
//! A reqwest-based HTTP client with an interceptor pipeline that every
//! request goes through, plus middleware around the network call.
//!
//! ## Features
//!
//! - **CSRF tokens**: [`CsrfInterceptor`] attaches the stored token and
//!   captures rotated ones from any response
//! - **Cookies**: a cookie jar so the server's session cookies ride along on
//!   every call
//! - **Timeouts**: per-client, per-request and middleware timeouts
//! - **Logging**: [`LoggingInterceptor`] traces requests and responses
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use babel_http_client::{CsrfInterceptor, HttpClient, HttpClientConfig};
//! use babel_session::CredentialStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = CredentialStore::in_memory();
//!     let config = HttpClientConfig::builder()
//!         .base_url("http://localhost:5000")
//!         .build();
//!
//!     let client = HttpClient::new(config)?.with_interceptor(CsrfInterceptor::new(store));
//!
//!     let response = client
//!         .post("/translate-text")
//!         .json(&serde_json::json!({"text": "hola", "src": "es", "dest": "en"}))
//!         .send()
//!         .await?;
//!
//!     println!("Status: {}", response.status());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod csrf;
mod error;
mod interceptor;
mod middleware;
mod request;
mod response;

pub use client::HttpClient;
pub use config::{HttpClientConfig, HttpClientConfigBuilder};
pub use csrf::{CLIENT_TYPE_HEADER, CLIENT_TYPE_WEB, CSRF_TOKEN_HEADER, CsrfInterceptor};
pub use error::{HttpClientError, Result};
pub use interceptor::{Interceptor, LoggingInterceptor};
pub use middleware::{Middleware, MiddlewareChain, TimeoutMiddleware};
pub use request::RequestBuilder;
pub use response::Response;

// Re-export common types
pub use bytes::Bytes;
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
pub use reqwest::multipart;
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use babel_http_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::HttpClient;
    pub use crate::config::{HttpClientConfig, HttpClientConfigBuilder};
    pub use crate::csrf::CsrfInterceptor;
    pub use crate::error::{HttpClientError, Result};
    pub use crate::interceptor::{Interceptor, LoggingInterceptor};
    pub use crate::middleware::{Middleware, MiddlewareChain, TimeoutMiddleware};
    pub use crate::request::RequestBuilder;
    pub use crate::response::Response;
    pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
}
