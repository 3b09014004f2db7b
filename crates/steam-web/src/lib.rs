//! Resilient client for the Steam Web API and the Steam storefront.
//!
//! A [`Transport`] talks to one origin. It sends fixed headers, applies
//! per-attempt timeouts, classifies failures and retries transient ones
//! with exponential backoff.
//!
//! A [`Client`] owns one transport per origin and turns the raw JSON
//! envelopes into fixed-shape records.

pub mod client;
pub mod config;
pub mod error;
pub mod sleep;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::Client;
pub use config::TransportConfig;
pub use error::{ErrorKind, TransportError, classify};
pub use sleep::{Sleeper, TokioSleeper};
pub use transport::Transport;
pub use types::{AppDetails, Genre, OwnedGame, PlayerSummary, Playtime, Price, Screenshot};
