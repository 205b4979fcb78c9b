//! Client SDK for the strato remote execution service.
//!
//! Jobs are submitted to a per-application queue, polled for status, and
//! read once for their result. The typical entry point is
//! [`Client::subscribe`], which composes those three steps into a single
//! awaitable call and reports progress through a callback:
//!
//! ```ignore
//! use strato_client::{Client, ClientConfig, Payload, SubscribeOptions};
//!
//! let client = Client::new(ClientConfig::default());
//! let input = Payload::from(serde_json::json!({"prompt": "cat"}));
//! let output = client
//!     .subscribe("acme/text-to-image", Some(input), SubscribeOptions::default())
//!     .await?;
//! ```
//!
//! Every outbound request authenticates via the client's
//! [`ClientConfig`]: a [`Credential`] source resolved lazily per request,
//! formatted according to the configured [`AuthScheme`].

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod options;
pub mod queue;
pub mod storage;
pub mod transport;

pub use client::{Client, SubscribeOptions};
pub use config::{AuthScheme, ClientConfig};
pub use credentials::Credential;
pub use error::{ClientError, TransportError};
pub use options::{HttpMethod, RunOptions};
pub use queue::{
    PollConfig, ProgressCallback, QueueClient, QueueUpdate, RequestLog, SubmitResponse,
};
pub use storage::StorageUploader;
pub use strato_core::{Deadline, Payload};
pub use transport::{HttpRequest, HttpTransport, Transport};
