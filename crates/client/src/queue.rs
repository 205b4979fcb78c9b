//! Queue operations: submit, status, poll, result.
//!
//! [`QueueClient`] speaks the queue's HTTP surface for one configuration
//! snapshot. Jobs are keyed by the server-assigned request id returned
//! from [`QueueClient::submit`]; [`QueueClient::poll_until_completed`]
//! drives the status loop until the job finishes or the deadline elapses.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use strato_core::{Deadline, Payload};
use tokio::time::Instant;

use crate::config::{ClientConfig, QUEUE_ENDPOINT};
use crate::error::ClientError;
use crate::options::{HttpMethod, RunOptions, DEFAULT_TIMEOUT_SECS};
use crate::transport::{HttpRequest, Transport};

/// Response to a successful queue submission.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    /// Server-assigned identifier for the queued job.
    pub request_id: String,
}

/// One log line attached to a status update.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestLog {
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// One observed status snapshot of a queued job.
///
/// Deserialized via the `"status"` tag of the status endpoint's response.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum QueueUpdate {
    /// Waiting for a worker; `queue_position` counts jobs ahead.
    #[serde(rename = "IN_QUEUE")]
    InQueue {
        #[serde(default)]
        queue_position: Option<i64>,
    },

    /// A worker is executing the job.
    #[serde(rename = "IN_PROGRESS")]
    InProgress {
        #[serde(default)]
        logs: Vec<RequestLog>,
    },

    /// The job finished; its result can be fetched.
    #[serde(rename = "COMPLETED")]
    Completed {
        #[serde(default)]
        logs: Vec<RequestLog>,
    },
}

impl QueueUpdate {
    /// True once the job has finished and its result is available.
    pub fn is_completed(&self) -> bool {
        matches!(self, QueueUpdate::Completed { .. })
    }
}

/// Progress callback, invoked once per observed update, in poll order.
///
/// Runs synchronously inside the poll loop and is expected to return
/// promptly.
pub type ProgressCallback = Box<dyn FnMut(&QueueUpdate) + Send>;

/// Tunable parameters for the completion-polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Pause between consecutive status requests.
    pub interval: Duration,
    /// Overall completion deadline.
    pub deadline: Deadline,
    /// Ask the service to include log lines in each update.
    pub include_logs: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            deadline: Deadline::default(),
            include_logs: false,
        }
    }
}

/// Queue API over a configuration snapshot.
///
/// Usually obtained via [`Client::queue`](crate::Client::queue). Holds
/// the configuration by value: a token or proxy rotation on the client
/// does not retroactively affect an already-created `QueueClient`.
pub struct QueueClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
}

impl QueueClient {
    pub fn new(config: Arc<ClientConfig>, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Submit a job to the application's queue.
    ///
    /// Returns the server-assigned request id used for all subsequent
    /// status and result calls. For GET-method jobs the input travels as
    /// query parameters instead of a request body.
    pub async fn submit(
        &self,
        app_id: &str,
        input: Option<&Payload>,
        options: &RunOptions,
    ) -> Result<String, ClientError> {
        let url = app_url(
            self.config.endpoint_or_proxy(QUEUE_ENDPOINT),
            app_id,
            options.path.as_deref(),
        );

        let (body, query) = match (input, options.http_method) {
            (Some(input), HttpMethod::Get) => (None, input.as_query_params()),
            (Some(input), _) => (Some(input.to_json()), Vec::new()),
            (None, _) => (None, Vec::new()),
        };

        let bytes = self
            .execute(
                options.http_method,
                &url,
                body.as_ref(),
                &query,
                options.timeout_secs,
            )
            .await?;
        let response: SubmitResponse = serde_json::from_slice(&bytes)?;

        tracing::info!(app_id, request_id = %response.request_id, "Job submitted");
        Ok(response.request_id)
    }

    /// Fetch the current status of a queued job.
    pub async fn status(
        &self,
        app_id: &str,
        request_id: &str,
        include_logs: bool,
    ) -> Result<QueueUpdate, ClientError> {
        let url = format!(
            "{}/requests/{request_id}/status",
            app_url(self.config.endpoint_or_proxy(QUEUE_ENDPOINT), app_id, None),
        );
        let query = if include_logs {
            vec![("logs".to_string(), "1".to_string())]
        } else {
            Vec::new()
        };

        let bytes = self
            .execute(HttpMethod::Get, &url, None, &query, DEFAULT_TIMEOUT_SECS)
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Poll job status until completion or the deadline elapses.
    ///
    /// Issues one status request per tick, invokes `on_update` with every
    /// observed update in order, and returns the terminal update as soon
    /// as the job reports completion (with no trailing sleep). The
    /// interval is not clamped to the remaining deadline, so the loop may
    /// overrun the nominal deadline by at most one interval before
    /// failing with [`ClientError::QueueTimeout`]. A transport or decode
    /// failure during any tick aborts the loop immediately.
    ///
    /// Dropping the returned future during the inter-poll sleep or an
    /// in-flight request abandons the loop; `on_update` is never invoked
    /// afterwards.
    pub async fn poll_until_completed(
        &self,
        app_id: &str,
        request_id: &str,
        config: &PollConfig,
        mut on_update: Option<ProgressCallback>,
    ) -> Result<QueueUpdate, ClientError> {
        let deadline_ms = config.deadline.as_millis();
        let start = Instant::now();

        loop {
            let update = self.status(app_id, request_id, config.include_logs).await?;
            if let Some(callback) = on_update.as_mut() {
                callback(&update);
            }
            if update.is_completed() {
                tracing::debug!(
                    request_id,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Job completed",
                );
                return Ok(update);
            }

            tokio::time::sleep(config.interval).await;

            let elapsed_ms = start.elapsed().as_millis() as u64;
            if elapsed_ms >= deadline_ms {
                tracing::warn!(
                    request_id,
                    elapsed_ms,
                    deadline_ms,
                    "Gave up waiting for job completion",
                );
                return Err(ClientError::QueueTimeout);
            }
        }
    }

    /// Fetch the result of a completed job.
    ///
    /// Call only after a status update reports completion; the service
    /// rejects result reads for unfinished jobs.
    pub async fn result(&self, app_id: &str, request_id: &str) -> Result<Payload, ClientError> {
        let url = format!(
            "{}/requests/{request_id}",
            app_url(self.config.endpoint_or_proxy(QUEUE_ENDPOINT), app_id, None),
        );
        let bytes = self
            .execute(HttpMethod::Get, &url, None, &[], DEFAULT_TIMEOUT_SECS)
            .await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(Payload::from_json(value))
    }

    // ---- private helpers ----

    async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&serde_json::Value>,
        query: &[(String, String)],
        timeout_secs: u64,
    ) -> Result<Vec<u8>, ClientError> {
        let auth_header = self.config.auth_header();
        self.transport
            .execute(HttpRequest {
                method,
                url,
                auth_header: &auth_header,
                body,
                query,
                timeout: Duration::from_secs(timeout_secs),
            })
            .await
    }
}

/// Build the application endpoint URL, optionally with a sub-path.
pub(crate) fn app_url(base: &str, app_id: &str, path: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match path {
        Some(path) => format!("{base}/{app_id}/{}", path.trim_matches('/')),
        None => format!("{base}/{app_id}"),
    }
}
