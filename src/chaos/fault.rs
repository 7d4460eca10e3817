//! Probabilistic fault injection.
//!
//! Each decision is an independent Bernoulli trial: one draw from `[0, 100)`
//! compared against the configured error rate. Rates are not clamped, so a
//! negative rate never fires and anything at or above 100 always fires.

use std::sync::Arc;

use crate::chaos::random::RandomSource;

/// Decides whether a request resolves to an injected server error.
#[derive(Debug, Clone)]
pub struct FaultInjector {
    error_rate: i64,
    random: Arc<dyn RandomSource>,
}

impl FaultInjector {
    pub fn new(error_rate: i64, random: Arc<dyn RandomSource>) -> Self {
        Self { error_rate, random }
    }

    /// Roll once. True means this request should fail.
    pub fn should_inject_error(&self) -> bool {
        if self.error_rate <= 0 {
            return false;
        }
        // Draw is < 100, so casting is lossless.
        (self.random.uniform(0, 100) as i64) < self.error_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chaos::random::{FixedRandom, SeededRandom, ThreadRandom};

    fn count_errors(injector: &FaultInjector, trials: usize) -> usize {
        (0..trials).filter(|_| injector.should_inject_error()).count()
    }

    #[test]
    fn test_zero_or_negative_rate_never_fires() {
        for rate in [0, -1, -100, i64::MIN] {
            let injector = FaultInjector::new(rate, Arc::new(ThreadRandom));
            assert_eq!(count_errors(&injector, 1_000), 0, "rate {}", rate);
        }
    }

    #[test]
    fn test_zero_rate_does_not_consult_random() {
        // Even a source that always yields 0 cannot cause an error at rate 0.
        let injector = FaultInjector::new(0, Arc::new(FixedRandom(0)));
        assert!(!injector.should_inject_error());
    }

    #[test]
    fn test_full_rate_always_fires() {
        let injector = FaultInjector::new(100, Arc::new(ThreadRandom));
        assert_eq!(count_errors(&injector, 1_000), 1_000);

        // Worst-case draw still fires.
        let injector = FaultInjector::new(100, Arc::new(FixedRandom(99)));
        assert!(injector.should_inject_error());
    }

    #[test]
    fn test_rate_above_hundred_saturates() {
        let injector = FaultInjector::new(250, Arc::new(FixedRandom(99)));
        assert!(injector.should_inject_error());
    }

    #[test]
    fn test_threshold_is_strict() {
        let injector = FaultInjector::new(30, Arc::new(FixedRandom(29)));
        assert!(injector.should_inject_error());

        let injector = FaultInjector::new(30, Arc::new(FixedRandom(30)));
        assert!(!injector.should_inject_error());
    }

    #[test]
    fn test_observed_fraction_matches_rate() {
        const TRIALS: usize = 10_000;

        for (seed, rate) in [(1_u64, 1_i64), (2, 10), (3, 30), (4, 50), (5, 99)] {
            let injector = FaultInjector::new(rate, Arc::new(SeededRandom::new(seed)));
            let errors = count_errors(&injector, TRIALS) as f64;

            let p = rate as f64 / 100.0;
            let expected = TRIALS as f64 * p;
            let sd = (TRIALS as f64 * p * (1.0 - p)).sqrt();
            assert!(
                (errors - expected).abs() <= 3.0 * sd,
                "rate {}: got {} errors, expected {} ± {}",
                rate,
                errors,
                expected,
                3.0 * sd
            );
        }
    }

    #[test]
    fn test_thread_random_fraction() {
        const TRIALS: usize = 20_000;
        let injector = FaultInjector::new(50, Arc::new(ThreadRandom));
        let errors = count_errors(&injector, TRIALS) as f64;

        let sd = (TRIALS as f64 * 0.25).sqrt();
        assert!((errors - TRIALS as f64 / 2.0).abs() <= 5.0 * sd);
    }
}
