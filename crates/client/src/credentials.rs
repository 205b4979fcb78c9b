//! Credential sources and resolution.
//!
//! A [`Credential`] names where authentication material comes from; it is
//! resolved lazily, on every outbound request, to the literal string placed
//! in the `Authorization` header. Resolution is total: a missing
//! environment credential resolves to an empty string and the service
//! rejects the request with an auth error, rather than failing locally.

use std::fmt;
use std::sync::Arc;

/// Combined `id:secret` environment variable. Takes precedence over the
/// split pair when set.
pub const ENV_KEY: &str = "STRATO_KEY";
/// Key-id half of the split environment pair.
pub const ENV_KEY_ID: &str = "STRATO_KEY_ID";
/// Key-secret half of the split environment pair.
pub const ENV_KEY_SECRET: &str = "STRATO_KEY_SECRET";

/// Where the client's authentication material comes from.
#[derive(Clone)]
pub enum Credential {
    /// A literal `id:secret` pair, already combined.
    KeyPair(String),
    /// Separate id and secret, combined with `:` at resolution time.
    Keys { id: String, secret: String },
    /// Read from the process environment on every resolution.
    FromEnv,
    /// Deferred computation, invoked on every resolution. May observe
    /// mutable external state, e.g. a token file that rotates on disk.
    Resolver(Arc<dyn Fn() -> String + Send + Sync>),
    /// A literal bearer token.
    Bearer(String),
}

impl Credential {
    /// Wrap a resolver closure.
    pub fn resolver(f: impl Fn() -> String + Send + Sync + 'static) -> Self {
        Credential::Resolver(Arc::new(f))
    }

    /// Resolve to the literal credential string. Never fails.
    ///
    /// Environment lookup precedence: the combined [`ENV_KEY`] variable
    /// verbatim; else [`ENV_KEY_ID`] and [`ENV_KEY_SECRET`] joined with
    /// `:` when both are present; else an empty string.
    pub fn resolve(&self) -> String {
        match self {
            Credential::KeyPair(pair) => pair.clone(),
            Credential::Keys { id, secret } => format!("{id}:{secret}"),
            Credential::FromEnv => resolve_from_env(),
            Credential::Resolver(f) => f(),
            Credential::Bearer(token) => token.clone(),
        }
    }
}

fn resolve_from_env() -> String {
    if let Ok(key) = std::env::var(ENV_KEY) {
        return key;
    }
    match (std::env::var(ENV_KEY_ID), std::env::var(ENV_KEY_SECRET)) {
        (Ok(id), Ok(secret)) => format!("{id}:{secret}"),
        _ => {
            tracing::debug!(
                "No credentials in environment ({ENV_KEY} or {ENV_KEY_ID}/{ENV_KEY_SECRET}); \
                 requests will go out unauthenticated"
            );
            String::new()
        }
    }
}

impl fmt::Debug for Credential {
    /// Redacts secret material.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::KeyPair(_) => f.write_str("Credential::KeyPair(..)"),
            Credential::Keys { .. } => f.write_str("Credential::Keys(..)"),
            Credential::FromEnv => f.write_str("Credential::FromEnv"),
            Credential::Resolver(_) => f.write_str("Credential::Resolver(..)"),
            Credential::Bearer(_) => f.write_str("Credential::Bearer(..)"),
        }
    }
}
