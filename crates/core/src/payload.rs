//! Structured input/output payloads.
//!
//! [`Payload`] mirrors a JSON document with one extra leaf kind: raw bytes.
//! Inputs may embed binary data (images, audio) directly; before submission
//! the client either uploads those leaves to storage or inlines them as
//! base64 data URIs. Results arriving from the service are plain JSON and
//! convert losslessly.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// A structured value: JSON plus embedded binary leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Raw binary data. Not representable in wire JSON as-is; replaced by
    /// an uploaded-file URL or a data URI before submission.
    Bytes(Vec<u8>),
    Array(Vec<Payload>),
    Object(BTreeMap<String, Payload>),
}

impl Payload {
    /// True if any [`Payload::Bytes`] leaf exists anywhere in the tree.
    pub fn has_binary(&self) -> bool {
        match self {
            Payload::Bytes(_) => true,
            Payload::Array(items) => items.iter().any(Payload::has_binary),
            Payload::Object(map) => map.values().any(Payload::has_binary),
            _ => false,
        }
    }

    /// Look up a key on an object payload. Returns `None` for non-objects.
    pub fn get(&self, key: &str) -> Option<&Payload> {
        match self {
            Payload::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Convert to wire JSON.
    ///
    /// Any remaining binary leaf is inlined as an
    /// `application/octet-stream` base64 data URI.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Payload::Null => serde_json::Value::Null,
            Payload::Bool(b) => serde_json::Value::Bool(*b),
            Payload::Number(n) => serde_json::Value::Number(n.clone()),
            Payload::String(s) => serde_json::Value::String(s.clone()),
            Payload::Bytes(bytes) => serde_json::Value::String(format!(
                "data:application/octet-stream;base64,{}",
                BASE64.encode(bytes)
            )),
            Payload::Array(items) => {
                serde_json::Value::Array(items.iter().map(Payload::to_json).collect())
            }
            Payload::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Convert wire JSON into a payload. Total; JSON carries no binary
    /// leaves, so the result never contains [`Payload::Bytes`].
    pub fn from_json(value: serde_json::Value) -> Payload {
        match value {
            serde_json::Value::Null => Payload::Null,
            serde_json::Value::Bool(b) => Payload::Bool(b),
            serde_json::Value::Number(n) => Payload::Number(n),
            serde_json::Value::String(s) => Payload::String(s),
            serde_json::Value::Array(items) => {
                Payload::Array(items.into_iter().map(Payload::from_json).collect())
            }
            serde_json::Value::Object(map) => Payload::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Payload::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Flatten a top-level object of scalars into query parameters.
    ///
    /// Used for GET-method jobs, where the input travels in the URL
    /// instead of a request body. Nested arrays/objects, nulls, and
    /// binary leaves are skipped.
    pub fn as_query_params(&self) -> Vec<(String, String)> {
        let Payload::Object(map) = self else {
            return Vec::new();
        };
        map.iter()
            .filter_map(|(key, value)| {
                let rendered = match value {
                    Payload::Bool(b) => b.to_string(),
                    Payload::Number(n) => n.to_string(),
                    Payload::String(s) => s.clone(),
                    _ => return None,
                };
                Some((key.clone(), rendered))
            })
            .collect()
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::from_json(value)
    }
}

impl From<Payload> for serde_json::Value {
    fn from(payload: Payload) -> Self {
        payload.to_json()
    }
}
