//! Shared test doubles for the queue and subscribe integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use strato_client::{
    ClientError, HttpMethod, HttpRequest, StorageUploader, Transport, TransportError,
};

/// One scripted response for [`ScriptedTransport`].
pub enum Scripted {
    /// Successful exchange with this JSON body.
    Json(serde_json::Value),
    /// Non-success HTTP status with a raw body.
    Status(u16, &'static str),
}

/// Everything the client put on the wire for one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub auth: String,
    pub body: Option<serde_json::Value>,
    pub query: Vec<(String, String)>,
}

/// Transport that replays a fixed script and records every request.
///
/// Once the script runs out, the last response repeats indefinitely, so
/// never-completing status sources are a one-liner.
pub struct ScriptedTransport {
    responses: Vec<Scripted>,
    cursor: AtomicUsize,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Scripted>) -> Arc<Self> {
        assert!(!responses.is_empty(), "script must have at least one response");
        Arc::new(Self {
            responses,
            cursor: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest<'_>) -> Result<Vec<u8>, ClientError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url.to_string(),
            auth: request.auth_header.to_string(),
            body: request.body.cloned(),
            query: request.query.to_vec(),
        });

        let i = self.cursor.fetch_add(1, Ordering::SeqCst);
        match &self.responses[i.min(self.responses.len() - 1)] {
            Scripted::Json(value) => Ok(serde_json::to_vec(value).unwrap()),
            Scripted::Status(status, body) => Err(TransportError::Status {
                status: *status,
                body: body.to_string(),
            }
            .into()),
        }
    }
}

/// Uploader that hands out sequential fake storage URLs.
pub struct FakeUploader {
    uploads: AtomicUsize,
}

impl FakeUploader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            uploads: AtomicUsize::new(0),
        })
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageUploader for FakeUploader {
    async fn upload(&self, _bytes: &[u8], _content_type: &str) -> Result<String, ClientError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(format!("https://storage.strato.run/files/{n}"))
    }
}
