//! Client configuration.
//!
//! [`ClientConfig`] is an immutable value: rotating a token or changing
//! the proxy derives a new config rather than mutating a shared one. The
//! [`Client`](crate::Client) swaps its held config as a whole, so readers
//! always observe either the old or the new value, never a mix.

use crate::credentials::Credential;

/// Default queue endpoint, used when no proxy override is set.
pub const QUEUE_ENDPOINT: &str = "https://queue.strato.run";
/// Default synchronous-run endpoint.
pub const SYNC_ENDPOINT: &str = "https://run.strato.run";

/// Convention used for the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Key <credential>`
    Key,
    /// `Authorization: Bearer <token>`
    Bearer,
}

/// Immutable configuration bundle for a client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Source of authentication material, resolved per request.
    pub credentials: Credential,
    pub auth_scheme: AuthScheme,
    /// Routes all outbound calls to this URL instead of the default
    /// endpoints when set.
    pub request_proxy: Option<String>,
}

impl ClientConfig {
    /// Key-scheme config over the given credential source.
    pub fn new(credentials: Credential) -> Self {
        Self {
            credentials,
            auth_scheme: AuthScheme::Key,
            request_proxy: None,
        }
    }

    /// Derive a config authenticated with a bearer access token.
    ///
    /// The proxy setting is preserved.
    pub fn with_access_token(&self, token: impl Into<String>) -> Self {
        Self {
            credentials: Credential::Bearer(token.into()),
            auth_scheme: AuthScheme::Bearer,
            request_proxy: self.request_proxy.clone(),
        }
    }

    /// Derive a config with the proxy replaced. `None` clears it.
    ///
    /// Credentials and scheme are preserved.
    pub fn with_proxy(&self, proxy: Option<String>) -> Self {
        Self {
            credentials: self.credentials.clone(),
            auth_scheme: self.auth_scheme,
            request_proxy: proxy,
        }
    }

    /// Derive a bearer-authenticated config routed through a proxy.
    pub fn with_proxy_and_access_token(
        &self,
        proxy: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            credentials: Credential::Bearer(token.into()),
            auth_scheme: AuthScheme::Bearer,
            request_proxy: Some(proxy.into()),
        }
    }

    /// The literal `Authorization` header value for the next request.
    ///
    /// Credentials are resolved fresh on every call, so rotating external
    /// state (environment, resolver closures) takes effect immediately.
    pub fn auth_header(&self) -> String {
        let credential = self.credentials.resolve();
        match self.auth_scheme {
            AuthScheme::Key => format!("Key {credential}"),
            AuthScheme::Bearer => format!("Bearer {credential}"),
        }
    }

    /// Base URL for outbound calls: the proxy when set, else `default`.
    pub fn endpoint_or_proxy<'a>(&'a self, default: &'a str) -> &'a str {
        self.request_proxy.as_deref().unwrap_or(default)
    }
}

impl Default for ClientConfig {
    /// Environment credentials with the key scheme.
    fn default() -> Self {
        Self::new(Credential::FromEnv)
    }
}
