//! Error taxonomy for queue operations.
//!
//! Exactly one of these reaches the caller per operation: a transport
//! failure, a decode failure, or a queue timeout. Nothing in this layer
//! retries a failed call; retry policy belongs to the caller or to the
//! transport itself.

/// Errors surfaced by queue operations and [`subscribe`](crate::Client::subscribe).
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP exchange failed (network error or non-success status).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body could not be parsed into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The job did not report completion before the deadline elapsed.
    #[error("queue did not report completion before the deadline")]
    QueueTimeout,
}

/// Failures from the HTTP transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request itself failed (connect, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}
