//! Per-call request options.
//!
//! [`RunOptions`] is built per call through its factories; unset fields
//! fall back to the documented defaults (method POST, timeout 60s).

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP method used for a job submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    /// Input travels as query parameters, not a request body.
    Get,
    #[default]
    Post,
    Put,
    Delete,
}

/// Options applied to a single run or submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Extra path appended to the application endpoint.
    pub path: Option<String>,
    pub http_method: HttpMethod,
    /// HTTP timeout for each individual request, in seconds.
    pub timeout_secs: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            path: None,
            http_method: HttpMethod::Post,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RunOptions {
    /// Default options with the method overridden.
    pub fn with_method(method: HttpMethod) -> Self {
        Self {
            http_method: method,
            ..Self::default()
        }
    }

    /// Default options with the per-request timeout overridden.
    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self {
            timeout_secs,
            ..Self::default()
        }
    }

    /// Route to a sub-path with the given method; default timeout.
    pub fn route(path: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            path: Some(path.into()),
            http_method: method,
            ..Self::default()
        }
    }
}
