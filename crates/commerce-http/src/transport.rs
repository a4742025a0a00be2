//! Pluggable request execution.
//!
//! `FetchClient` hands every built [`Request`] to a [`Transport`]. Production
//! code uses [`ReqwestTransport`]; tests substitute an in-memory backend.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::{FetchError, Method, Request, Response};

/// Shared client so every transport reuses one connection pool.
static DEFAULT_HTTP_CLIENT: LazyLock<Client> = LazyLock::new(Client::new);

/// Executes requests against a backend.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response (any status).
    async fn send(&self, request: Request) -> Result<Response, FetchError>;
}

/// Transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport on the shared default client.
    pub fn new() -> Self {
        Self {
            client: DEFAULT_HTTP_CLIENT.clone(),
        }
    }

    /// Create a transport with its own client and a connect timeout.
    pub fn with_connect_timeout(connect_timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().connect_timeout(connect_timeout).build()?;
        Ok(Self { client })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        };

        let mut builder = self.client.request(method, request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(Response::new(status, headers, body))
    }
}
