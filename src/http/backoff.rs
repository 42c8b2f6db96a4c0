//! Exponential backoff with optional jitter
//!
//! Used by the request executor while the server keeps signalling rate
//! limiting. The base delay doubles on every `next()` until it reaches `max`
//! and drops back to `min` on `reset()`.

use crate::config::BackoffConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Fraction of the base delay jitter may add or remove
const JITTER_FRACTION: f64 = 0.25;

/// Smallest base delay; a zero base would never grow
const MIN_DELAY: Duration = Duration::from_millis(1);

/// Stateful backoff policy. One instance per executor; not shared.
#[derive(Debug)]
pub struct Backoff {
    min: Duration,
    max: Duration,
    current: Duration,
    last: Duration,
    jitter: bool,
    rng: StdRng,
}

impl Backoff {
    /// Create a backoff policy from config
    pub fn new(config: &BackoffConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let min = config.min.max(MIN_DELAY);
        let max = config.max.max(min);

        Self {
            min,
            max,
            current: min,
            last: Duration::ZERO,
            jitter: config.jitter,
            rng,
        }
    }

    /// Delay to wait before the next retry. Advances the base delay.
    ///
    /// The returned value always lies within `[min, max]` and is never
    /// shorter than the previous one since the last `reset()`.
    pub fn next(&mut self) -> Duration {
        let base = self.current;
        self.current = base.saturating_mul(2).min(self.max);

        let delay = if self.jitter {
            let factor = self
                .rng
                .gen_range((1.0 - JITTER_FRACTION)..=(1.0 + JITTER_FRACTION));
            base.mul_f64(factor)
        } else {
            base
        };

        self.last = delay.max(self.last).clamp(self.min, self.max);
        self.last
    }

    /// Return to the minimum delay
    pub fn reset(&mut self) {
        self.current = self.min;
        self.last = Duration::ZERO;
    }

    /// Base delay the next call to `next()` starts from
    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}
