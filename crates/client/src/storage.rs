//! Storage upload seam.
//!
//! Inputs that embed binary data are offloaded to storage before
//! submission: every bytes leaf is uploaded and replaced by the URL the
//! service can fetch it from. Without an uploader, bytes fall back to
//! inline data URIs at serialization time (see
//! [`Payload::to_json`](strato_core::Payload::to_json)).

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use strato_core::Payload;

use crate::error::ClientError;

/// Uploads binary blobs and returns a URL the service can fetch.
#[async_trait]
pub trait StorageUploader: Send + Sync {
    async fn upload(&self, bytes: &[u8], content_type: &str) -> Result<String, ClientError>;
}

/// Replace every binary leaf of `input` with its uploaded URL.
///
/// Walks the tree depth-first; non-binary leaves are returned unchanged.
/// An upload failure propagates immediately and leaves no partial result.
pub async fn transform_input(
    input: &Payload,
    uploader: &dyn StorageUploader,
) -> Result<Payload, ClientError> {
    transform(input, uploader).await
}

fn transform<'a>(
    input: &'a Payload,
    uploader: &'a dyn StorageUploader,
) -> Pin<Box<dyn Future<Output = Result<Payload, ClientError>> + Send + 'a>> {
    Box::pin(async move {
        match input {
            Payload::Bytes(bytes) => {
                let url = uploader.upload(bytes, "application/octet-stream").await?;
                Ok(Payload::String(url))
            }
            Payload::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(transform(item, uploader).await?);
                }
                Ok(Payload::Array(out))
            }
            Payload::Object(map) => {
                let mut out = BTreeMap::new();
                for (key, value) in map {
                    out.insert(key.clone(), transform(value, uploader).await?);
                }
                Ok(Payload::Object(out))
            }
            other => Ok(other.clone()),
        }
    })
}
