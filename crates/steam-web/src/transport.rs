//! Single-origin HTTP transport with classification, retry and backoff.
//!
//! Every request carries a fixed user agent and `Accept: application/json`.
//! Failures are classified into [`TransportError`] kinds; transient kinds
//! are retried up to `max_retries` extra times, waiting
//! [`TransportConfig::backoff_delay`] between attempts.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::error::{TransportError, parse_retry_after};
use crate::sleep::{Sleeper, TokioSleeper};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("steamfetch/", env!("CARGO_PKG_VERSION"));

/// HTTP transport bound to one origin.
///
/// Holds no per-request state; concurrent calls on one instance are
/// independent of each other.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    origin: String,
    config: TransportConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("origin", &self.origin)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Creates a transport for `origin` (e.g. `https://api.steampowered.com`).
    pub fn new(origin: &str, config: TransportConfig) -> Result<Self, TransportError> {
        let origin = origin.trim().trim_end_matches('/');
        if origin.is_empty() {
            return Err(TransportError::Configuration(
                "transport origin must not be empty".into(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .connect_timeout(config.open_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(|e| TransportError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            origin: origin.to_string(),
            config,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replaces the delay primitive used between retries.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Performs a GET request and returns the decoded JSON body.
    ///
    /// An empty body decodes to `Value::Null`.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        self.run(path, query, None).await
    }

    /// Like [`get`](Self::get), but aborts with [`TransportError::Cancelled`]
    /// as soon as `cancel` fires, whether mid-request or mid-backoff.
    pub async fn get_with_cancel(
        &self,
        path: &str,
        query: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<Value, TransportError> {
        self.run(path, query, Some(cancel)).await
    }

    async fn run(
        &self,
        path: &str,
        query: &[(&str, &str)],
        cancel: Option<&CancellationToken>,
    ) -> Result<Value, TransportError> {
        let url = format!("{}{}", self.origin, path);
        let max_attempts = self.config.max_attempts();
        let mut attempt: u32 = 1;

        loop {
            let result = match cancel {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => return Err(TransportError::Cancelled),
                    r = self.attempt(&url, path, query, attempt) => r,
                },
                None => self.attempt(&url, path, query, attempt).await,
            };

            let err = match result {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() {
                return Err(err);
            }
            if attempt >= max_attempts {
                warn!(
                    origin = %self.origin,
                    path,
                    attempts = attempt,
                    kind = ?err.kind(),
                    "retries exhausted"
                );
                return Err(err);
            }

            let delay = self.config.backoff_delay(attempt, err.retry_after());
            warn!(
                origin = %self.origin,
                path,
                attempt,
                kind = ?err.kind(),
                delay_secs = format_args!("{:.2}", delay.as_secs_f64()),
                "request failed, retrying"
            );

            match cancel {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => return Err(TransportError::Cancelled),
                    _ = self.sleeper.sleep(delay) => {}
                },
                None => self.sleeper.sleep(delay).await,
            }

            attempt += 1;
        }
    }

    /// One network round trip, classified.
    async fn attempt(
        &self,
        url: &str,
        path: &str,
        query: &[(&str, &str)],
        attempt: u32,
    ) -> Result<Value, TransportError> {
        debug!(origin = %self.origin, path, attempt, "sending request");

        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, None, attempt))?;

        let status = resp.status();
        let retry_after = parse_retry_after(resp.headers());
        if let Err(e) = resp.error_for_status_ref() {
            debug!(origin = %self.origin, path, attempt, status = status.as_u16(), "request rejected");
            return Err(TransportError::from_reqwest(e, retry_after, attempt));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::from_reqwest(e, None, attempt))?;

        decode_body(&body)
    }
}

/// Decodes a response body, treating an empty body as `null`.
fn decode_body(body: &[u8]) -> Result<Value, TransportError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}
