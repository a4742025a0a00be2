//! HTTP primitive for commerce provider adapters.
//!
//! Provides a small typed client with base URL handling, default headers,
//! per-client timeouts and a pluggable [`Transport`], so adapters can be
//! exercised against an in-memory backend in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use commerce_http::FetchClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Product {
//!     id: String,
//!     name: String,
//! }
//!
//! let client = FetchClient::new("https://bridge.example.com")
//!     .with_default_header("Accept", "application/json");
//!
//! let product: Product = client.get_json("/api/v1/products/123").await?;
//!
//! let page: serde_json::Value = client
//!     .get("/api/v1/products")
//!     .query([("page", "2")])
//!     .send()
//!     .await?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod transport;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

pub use error::FetchError;
pub use request::{Method, Request, RequestBuilder};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

/// Supplies headers computed at send time.
///
/// Used for state that changes over a client's lifetime, such as an auth
/// token, without rebuilding the client.
pub trait HeaderSource: Send + Sync {
    /// Headers to add to the next request.
    fn headers(&self) -> Vec<(String, String)>;
}

/// HTTP client for making outbound requests.
///
/// Cloning is cheap; clones share the transport and header source.
#[derive(Clone)]
pub struct FetchClient {
    base_url: String,
    default_headers: HashMap<String, String>,
    timeout: Option<Duration>,
    header_source: Option<Arc<dyn HeaderSource>>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl FetchClient {
    /// Create a client for a base URL using the default reqwest transport.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: HashMap::new(),
            timeout: None,
            header_source: None,
            transport: Arc::new(ReqwestTransport::new()),
        }
    }

    /// Replace the transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        request::insert_header(&mut self.default_headers, key.into(), value.into());
        self
    }

    /// Add several default headers.
    pub fn with_default_headers(mut self, headers: HashMap<String, String>) -> Self {
        for (key, value) in headers {
            request::insert_header(&mut self.default_headers, key, value);
        }
        self
    }

    /// Set the timeout applied to every request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a source of per-request dynamic headers.
    pub fn with_header_source(mut self, source: Arc<dyn HeaderSource>) -> Self {
        self.header_source = Some(source);
        self
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The per-request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Create a GET request.
    pub fn get(&self, path: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, path)
    }

    /// Create a POST request.
    pub fn post(&self, path: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, path)
    }

    /// Create a PUT request.
    pub fn put(&self, path: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Put, path)
    }

    /// Create a PATCH request.
    pub fn patch(&self, path: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Patch, path)
    }

    /// Create a DELETE request.
    pub fn delete(&self, path: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Delete, path)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, path: impl Into<String>) -> ClientRequestBuilder {
        let path = path.into();
        let full_url = if path.starts_with("http://") || path.starts_with("https://") {
            path
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        ClientRequestBuilder {
            builder,
            header_source: self.header_source.clone(),
            transport: Arc::clone(&self.transport),
        }
    }

    /// GET a path and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        self.get(path).send_json().await
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.post(path).json(body)?.send_json().await
    }

    /// PUT a JSON body and decode the JSON response.
    pub async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.put(path).json(body)?.send_json().await
    }

    /// PATCH a JSON body and decode the JSON response.
    pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.patch(path).json(body)?.send_json().await
    }

    /// DELETE a path and decode the JSON response (`null` for empty bodies).
    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        self.delete(path).send_json().await
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    builder: RequestBuilder,
    header_source: Option<Arc<dyn HeaderSource>>,
    transport: Arc<dyn Transport>,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Append query parameters.
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.query(pairs);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Send the request and return the response, whatever its status.
    pub async fn send(self) -> Result<Response, FetchError> {
        let mut builder = self.builder;
        if let Some(source) = &self.header_source {
            builder = builder.headers(source.headers());
        }

        let request = builder.build()?;
        debug!(method = %request.method, url = %request.url, "sending request");
        self.transport.send(request).await
    }

    /// Send the request, fail on non-2xx, and decode the JSON body.
    pub async fn send_json<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        self.send().await?.error_for_status()?.json()
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HeaderSource, Method, Response, Transport};
}
