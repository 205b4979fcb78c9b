//! Client handle and the subscribe orchestrator.
//!
//! [`Client`] owns the current [`ClientConfig`] and the shared transport.
//! Configuration rotation replaces the held config as a single value;
//! operations already in flight keep the snapshot they started with.
//! [`Client::subscribe`] is the composed submit → poll → fetch flow.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use strato_core::{Deadline, Payload};

use crate::config::{ClientConfig, SYNC_ENDPOINT};
use crate::error::ClientError;
use crate::options::{HttpMethod, RunOptions};
use crate::queue::{app_url, PollConfig, ProgressCallback, QueueClient};
use crate::storage::{transform_input, StorageUploader};
use crate::transport::{HttpRequest, HttpTransport, Transport};

/// Options for a [`Client::subscribe`] call.
pub struct SubscribeOptions {
    /// Submission options (path, method, per-request timeout).
    pub run: RunOptions,
    /// Pause between status polls.
    pub poll_interval: Duration,
    /// Overall completion deadline.
    pub timeout: Deadline,
    /// Include log lines in each status update.
    pub include_logs: bool,
    /// Invoked once per observed status update, in poll order.
    pub on_update: Option<ProgressCallback>,
}

impl Default for SubscribeOptions {
    fn default() -> Self {
        Self {
            run: RunOptions::default(),
            poll_interval: Duration::from_secs(1),
            timeout: Deadline::default(),
            include_logs: false,
            on_update: None,
        }
    }
}

/// Handle to the remote execution service.
///
/// Cheap to share behind an `Arc`; concurrent `subscribe` calls run as
/// independent tasks with no shared mutable state beyond the
/// configuration.
pub struct Client {
    config: RwLock<Arc<ClientConfig>>,
    transport: Arc<dyn Transport>,
    uploader: Option<Arc<dyn StorageUploader>>,
}

impl Client {
    /// Client over the default reqwest transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Client over a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: RwLock::new(Arc::new(config)),
            transport,
            uploader: None,
        }
    }

    /// Attach a storage uploader used to offload binary input fields.
    pub fn with_uploader(mut self, uploader: Arc<dyn StorageUploader>) -> Self {
        self.uploader = Some(uploader);
        self
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Arc<ClientConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the held credentials with a bearer access token.
    ///
    /// In-flight operations keep the snapshot they started with.
    pub fn set_access_token(&self, token: impl Into<String>) {
        let mut guard = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(guard.with_access_token(token));
    }

    /// Replace the proxy override. `None` clears it.
    pub fn set_proxy(&self, proxy: Option<String>) {
        let mut guard = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(guard.with_proxy(proxy));
    }

    /// Replace proxy and credentials in one atomic swap.
    pub fn set_proxy_and_access_token(
        &self,
        proxy: impl Into<String>,
        token: impl Into<String>,
    ) {
        let mut guard = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(guard.with_proxy_and_access_token(proxy, token));
    }

    /// Queue API over a snapshot of the current configuration.
    pub fn queue(&self) -> QueueClient {
        QueueClient::new(self.config(), Arc::clone(&self.transport))
    }

    /// Run a job on the synchronous endpoint and wait for its output.
    ///
    /// A single HTTP exchange with no queueing; suits fast models where
    /// the submit/poll/fetch round trips add no value.
    pub async fn run(
        &self,
        app_id: &str,
        input: Option<Payload>,
        options: &RunOptions,
    ) -> Result<Payload, ClientError> {
        let config = self.config();
        let input = self.prepare_input(input, options.http_method).await?;

        let url = app_url(
            config.endpoint_or_proxy(SYNC_ENDPOINT),
            app_id,
            options.path.as_deref(),
        );
        let (body, query) = match (&input, options.http_method) {
            (Some(input), HttpMethod::Get) => (None, input.as_query_params()),
            (Some(input), _) => (Some(input.to_json()), Vec::new()),
            (None, _) => (None, Vec::new()),
        };

        let auth_header = config.auth_header();
        let bytes = self
            .transport
            .execute(HttpRequest {
                method: options.http_method,
                url: &url,
                auth_header: &auth_header,
                body: body.as_ref(),
                query: &query,
                timeout: Duration::from_secs(options.timeout_secs),
            })
            .await?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        Ok(Payload::from_json(value))
    }

    /// Submit a job, wait for completion, and fetch its result.
    ///
    /// Inputs carrying binary data are first passed through the storage
    /// uploader when one is configured; GET-method jobs are exempt since
    /// their input travels as query parameters. Progress updates reach
    /// `options.on_update` strictly in poll order, with at most one
    /// status request in flight. Failures from any step propagate
    /// unchanged; a missed deadline surfaces as
    /// [`ClientError::QueueTimeout`].
    ///
    /// Dropping the returned future at any suspension point abandons the
    /// job: no further callback invocations and no result fetch.
    pub async fn subscribe(
        &self,
        app_id: &str,
        input: Option<Payload>,
        options: SubscribeOptions,
    ) -> Result<Payload, ClientError> {
        let SubscribeOptions {
            run,
            poll_interval,
            timeout,
            include_logs,
            on_update,
        } = options;

        let input = self.prepare_input(input, run.http_method).await?;
        let queue = self.queue();

        let request_id = queue.submit(app_id, input.as_ref(), &run).await?;
        let poll = PollConfig {
            interval: poll_interval,
            deadline: timeout,
            include_logs,
        };
        queue
            .poll_until_completed(app_id, &request_id, &poll, on_update)
            .await?;
        queue.result(app_id, &request_id).await
    }

    // ---- private helpers ----

    /// Offload binary input fields through the uploader when applicable.
    ///
    /// GET-method jobs and clients without an uploader pass the input
    /// through untouched.
    async fn prepare_input(
        &self,
        input: Option<Payload>,
        method: HttpMethod,
    ) -> Result<Option<Payload>, ClientError> {
        match (&input, &self.uploader) {
            (Some(payload), Some(uploader))
                if method != HttpMethod::Get && payload.has_binary() =>
            {
                tracing::debug!("Uploading binary input fields to storage");
                Ok(Some(transform_input(payload, uploader.as_ref()).await?))
            }
            _ => Ok(input),
        }
    }
}
