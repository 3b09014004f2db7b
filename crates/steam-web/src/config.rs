//! Transport configuration and backoff computation.

use std::time::Duration;

use rand::Rng;

/// Lower bound of the jitter multiplier.
pub const JITTER_MIN: f64 = 0.8;
/// Upper bound of the jitter multiplier.
pub const JITTER_MAX: f64 = 1.2;

/// Per-origin transport settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    /// Connect timeout, applied to every attempt.
    pub open_timeout: Duration,
    /// Response read timeout, applied to every attempt.
    pub read_timeout: Duration,
    /// Additional attempts after the first (2 means 3 in total).
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each later one.
    pub base_backoff: Duration,
    /// Scale each computed delay by a random factor in `[0.8, 1.2]`.
    pub jitter: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            open_timeout: Duration::from_secs(3),
            read_timeout: Duration::from_secs(5),
            max_retries: 2,
            base_backoff: Duration::from_millis(500),
            jitter: true,
        }
    }
}

impl TransportConfig {
    /// Total attempts allowed for one logical request.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait after a failed `attempt` (1-based) before the next one.
    ///
    /// A server-provided `retry_after` is used exactly as given. Otherwise
    /// the delay is `base_backoff * 2^(attempt - 1)`, jittered if enabled.
    pub fn backoff_delay(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        if let Some(secs) = retry_after {
            return Duration::from_secs(secs);
        }
        let delay = self.exponential_delay(attempt);
        if self.jitter {
            let factor = rand::rng().random_range(JITTER_MIN..=JITTER_MAX);
            apply_jitter(delay, factor)
        } else {
            delay
        }
    }

    fn exponential_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.base_backoff.saturating_mul(1u32 << exp)
    }
}

/// Scales `delay` by `factor`, clamped to the jitter bounds.
///
/// Saturates at [`Duration::MAX`].
pub fn apply_jitter(delay: Duration, factor: f64) -> Duration {
    let secs = delay.as_secs_f64() * factor.clamp(JITTER_MIN, JITTER_MAX);
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_jitter() -> TransportConfig {
        TransportConfig {
            jitter: false,
            ..Default::default()
        }
    }

    #[test]
    fn defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.open_timeout, Duration::from_secs(3));
        assert_eq!(config.read_timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.max_attempts(), 3);
        assert_eq!(config.base_backoff, Duration::from_millis(500));
        assert!(config.jitter);
    }

    #[test]
    fn exponential_without_jitter() {
        let config = no_jitter();
        let expected = [0.5, 1.0, 2.0, 4.0, 8.0];
        for (i, &secs) in expected.iter().enumerate() {
            let delay = config.backoff_delay((i + 1) as u32, None);
            assert_eq!(delay, Duration::from_secs_f64(secs), "attempt {}", i + 1);
        }
    }

    #[test]
    fn retry_after_overrides_backoff() {
        let config = TransportConfig {
            base_backoff: Duration::from_secs(10),
            ..no_jitter()
        };
        assert_eq!(config.backoff_delay(1, Some(2)), Duration::from_secs(2));
        assert_eq!(config.backoff_delay(5, Some(2)), Duration::from_secs(2));

        let jittered = TransportConfig::default();
        assert_eq!(jittered.backoff_delay(3, Some(7)), Duration::from_secs(7));
    }

    #[test]
    fn retry_after_zero_means_no_wait() {
        assert_eq!(no_jitter().backoff_delay(2, Some(0)), Duration::ZERO);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let config = TransportConfig::default();
        for attempt in 1..=4u32 {
            let base = 0.5 * 2f64.powi(attempt as i32 - 1);
            for _ in 0..50 {
                let secs = config.backoff_delay(attempt, None).as_secs_f64();
                let lo = base * JITTER_MIN - 1e-9;
                let hi = base * JITTER_MAX + 1e-9;
                assert!(
                    secs >= lo && secs <= hi,
                    "attempt {attempt}: {secs:.4}s not in [{lo:.4}, {hi:.4}]"
                );
            }
        }
    }

    #[test]
    fn apply_jitter_clamps_factor() {
        let one = Duration::from_secs(1);
        assert_eq!(apply_jitter(one, 1.0), one);
        assert_eq!(apply_jitter(one, 5.0), Duration::from_secs_f64(1.2));
        assert_eq!(apply_jitter(one, 0.0), Duration::from_secs_f64(0.8));
    }

    #[test]
    fn large_attempt_does_not_overflow() {
        let delay = no_jitter().backoff_delay(u32::MAX, None);
        assert!(delay >= Duration::from_secs(1));
    }

    #[test]
    fn large_backoff_with_jitter_saturates() {
        let config = TransportConfig {
            base_backoff: Duration::from_secs(u64::MAX / 2),
            ..Default::default()
        };
        assert!(config.backoff_delay(3, None) >= Duration::from_secs(u64::MAX / 2));
        assert_eq!(apply_jitter(Duration::MAX, JITTER_MAX), Duration::MAX);
    }
}
