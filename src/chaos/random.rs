//! Random sources for fault and latency decisions.
//!
//! The core never reaches for a global generator; every component that needs
//! randomness is handed an `Arc<dyn RandomSource>` at construction time.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniformly distributed integers.
pub trait RandomSource: Send + Sync + fmt::Debug {
    /// Draw a value uniformly from `[low, high)`.
    ///
    /// Returns `low` when the range is empty.
    fn uniform(&self, low: u64, high: u64) -> u64;
}

/// Thread-local OS-seeded generator. Default for production.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform(&self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        rand::thread_rng().gen_range(low..high)
    }
}

/// Deterministic generator for reproducible runs.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        // The lock only covers the draw, never a sleep.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(low..high)
    }
}

/// Always yields the same value, clamped into the requested range.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedRandom(pub u64);

#[cfg(test)]
impl RandomSource for FixedRandom {
    fn uniform(&self, low: u64, high: u64) -> u64 {
        if high <= low {
            return low;
        }
        self.0.clamp(low, high - 1)
    }
}
