//! Error taxonomy for transport failures.

/// Classification of a failed request, independent of its cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerError,
    RateLimited,
    Timeout,
    Unclassified,
    Cancelled,
}

impl ErrorKind {
    /// Only transient kinds are retried.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimited | Self::Timeout | Self::ServerError)
    }
}

/// Errors from a [`Transport`](crate::Transport) call.
///
/// Classified variants keep the originating `reqwest::Error` as their
/// `source()`.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("unauthorized (401)")]
    Unauthorized(#[source] reqwest::Error),

    #[error("forbidden (403)")]
    Forbidden(#[source] reqwest::Error),

    #[error("not found (404)")]
    NotFound(#[source] reqwest::Error),

    #[error("server error ({status})")]
    ServerError {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    #[error("rate limited (429) after {attempts} attempt(s)")]
    RateLimited {
        retry_after: Option<u64>,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("request timed out or connection failed")]
    Timeout(#[source] reqwest::Error),

    #[error("HTTP error: {0}")]
    Unclassified(#[source] reqwest::Error),

    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,
}

impl TransportError {
    /// Builds the classified error for a low-level failure observed on
    /// attempt number `attempts` (1-based).
    ///
    /// `retry_after` is only kept when the failure classifies as
    /// [`ErrorKind::RateLimited`]. The request URL is stripped from the
    /// cause since its query carries the API key.
    pub(crate) fn from_reqwest(err: reqwest::Error, retry_after: Option<u64>, attempts: u32) -> Self {
        let err = err.without_url();
        let status = err.status().map(|s| s.as_u16());
        // A peer that accepts and then drops the connection surfaces as a
        // request or body error, not a connect error.
        let connect_failed = err.is_connect() || err.is_request() || err.is_body();
        match classify(status, err.is_timeout(), connect_failed) {
            ErrorKind::Unauthorized => Self::Unauthorized(err),
            ErrorKind::Forbidden => Self::Forbidden(err),
            ErrorKind::NotFound => Self::NotFound(err),
            ErrorKind::ServerError => Self::ServerError {
                status: status.unwrap_or_default(),
                source: err,
            },
            ErrorKind::RateLimited => Self::RateLimited {
                retry_after,
                attempts,
                source: err,
            },
            ErrorKind::Timeout => Self::Timeout(err),
            _ => Self::Unclassified(err),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ServerError { .. } => ErrorKind::ServerError,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Unclassified(_) | Self::Decode(_) => ErrorKind::Unclassified,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Server-provided wait in seconds, if any.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Maps the observable attributes of a failure to exactly one kind.
///
/// An HTTP status wins over connection-level flags.
pub fn classify(status: Option<u16>, timed_out: bool, connect_failed: bool) -> ErrorKind {
    match status {
        Some(401) => ErrorKind::Unauthorized,
        Some(403) => ErrorKind::Forbidden,
        Some(404) => ErrorKind::NotFound,
        Some(429) => ErrorKind::RateLimited,
        Some(code) if (500..600).contains(&code) => ErrorKind::ServerError,
        Some(_) => ErrorKind::Unclassified,
        None if timed_out || connect_failed => ErrorKind::Timeout,
        None => ErrorKind::Unclassified,
    }
}

/// Parses a `Retry-After` header given in integer seconds.
///
/// HTTP-date values are ignored.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
