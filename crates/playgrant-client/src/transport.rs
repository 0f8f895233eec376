//! The authorized request capability and its HTTP implementation.
//!
//! Token exchange and signing happen before a transport is built; an
//! [`AuthorizedClient`] only issues requests that are already authorized.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{ClientError, Result};
use crate::wire::ErrorEnvelope;

/// Default per-request timeout for [`HttpTransport`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Resource path, e.g. `developers/123/users`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::Patch, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a query parameter by key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A raw response: status plus body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response carrying `value` as JSON.
    pub fn json_ok(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-success response into [`ClientError::Api`].
    ///
    /// The message comes from the `{"error":{...}}` envelope when present,
    /// otherwise the raw body text is kept.
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let message = match serde_json::from_slice::<ErrorEnvelope>(&self.body) {
            Ok(envelope) => envelope.error.message,
            Err(_) => String::from_utf8_lossy(&self.body).into_owned(),
        };
        Err(ClientError::Api {
            status: self.status,
            message,
        })
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// Issues already-authorized requests against the remote API.
#[async_trait]
pub trait AuthorizedClient: Send + Sync {
    /// Send one request and return the raw response.
    ///
    /// Non-success statuses are returned as responses, not errors. Only a
    /// failure to deliver the request is an error here.
    async fn issue(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// [`AuthorizedClient`] over `reqwest` with a bearer token.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl AuthorizedClient for HttpTransport {
    async fn issue(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        trace!(method = %request.method, url = %url, "issuing request");

        let mut builder = self
            .http
            .request(request.method.into(), &url)
            .bearer_auth(&self.token);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        trace!(status, bytes = body.len(), "received response");
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
