//! HTTP transport seam.
//!
//! Queue operations describe each outbound call as an [`HttpRequest`] and
//! hand it to a [`Transport`]. The default [`HttpTransport`] performs the
//! exchange with [`reqwest`]; tests substitute scripted transports.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ClientError, TransportError};
use crate::options::HttpMethod;

/// One fully-described outbound HTTP call.
#[derive(Debug)]
pub struct HttpRequest<'a> {
    pub method: HttpMethod,
    /// Absolute URL, proxy override already applied.
    pub url: &'a str,
    /// Value for the `Authorization` header.
    pub auth_header: &'a str,
    /// JSON body; `None` for body-less methods.
    pub body: Option<&'a serde_json::Value>,
    /// Query parameters appended to the URL.
    pub query: &'a [(String, String)],
    /// Timeout for this request alone.
    pub timeout: Duration,
}

/// Performs HTTP exchanges on behalf of queue operations.
///
/// This layer does not retry: a failed exchange surfaces immediately as a
/// [`TransportError`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request, returning the raw response body.
    async fn execute(&self, request: HttpRequest<'_>) -> Result<Vec<u8>, ClientError>;
}

/// Default transport backed by a shared [`reqwest::Client`].
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest<'_>) -> Result<Vec<u8>, ClientError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, request.url)
            .header(reqwest::header::AUTHORIZATION, request.auth_header)
            .timeout(request.timeout);
        if !request.query.is_empty() {
            builder = builder.query(request.query);
        }
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(TransportError::Request)?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(TransportError::Request)?;
        Ok(bytes.to_vec())
    }
}
