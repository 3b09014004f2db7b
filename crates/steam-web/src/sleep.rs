//! Delay primitive used between retry attempts.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Waits for a given duration.
///
/// The transport never sleeps directly; it goes through this trait so a
/// caller can substitute a recording or no-op implementation.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}
