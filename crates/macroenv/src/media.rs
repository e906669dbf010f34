//! Media outlet producing the daily sentiment-shock signal.
//!
//! The signal follows a Gaussian random walk clamped to [-3, 3], with
//! optional scripted overrides on specific days. When the configured horizon
//! is reached the outlet reports [`Signal::Exhausted`] — a normal terminal
//! condition, not an error; the orchestrator holds the last value.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::config::MediaConfig;

/// Bounds of the media signal.
const SIGNAL_CLAMP: f64 = 3.0;

/// One day's media output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Today's sentiment-shock value.
    Value(f64),
    /// The outlet's horizon is over; no further signals will be produced.
    Exhausted,
}

/// Daily news-signal generator.
///
/// Deterministic given the same seed, enabling reproducible simulations.
pub struct Media {
    /// Number of days this outlet produces signals for.
    horizon: u64,
    /// Current signal value.
    current: f64,
    /// Random-walk step standard deviation.
    sigma: f64,
    /// Scripted overrides keyed by day.
    fixed_values: std::collections::HashMap<u64, f64>,
    /// Days already produced.
    day: u64,
    /// All produced values, newest last (starts with the initial value).
    history: Vec<f64>,
    /// Random number generator.
    rng: StdRng,
}

impl Media {
    /// Create a new media outlet.
    ///
    /// # Arguments
    /// * `config` - Signal configuration
    /// * `horizon` - Number of days signals are produced for
    /// * `seed` - Random seed for deterministic generation
    pub fn new(config: &MediaConfig, horizon: u64, seed: u64) -> Self {
        Self {
            horizon,
            current: config.initial_value,
            sigma: config.sigma,
            fixed_values: config.fixed_values.clone(),
            day: 0,
            history: vec![config.initial_value],
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produce the next daily signal, or report exhaustion past the horizon.
    pub fn next_signal(&mut self) -> Signal {
        if self.day >= self.horizon {
            return Signal::Exhausted;
        }

        self.day += 1;

        if let Some(&fixed) = self.fixed_values.get(&self.day) {
            self.current = fixed;
        } else {
            let step = Normal::new(0.0, self.sigma)
                .map(|dist| dist.sample(&mut self.rng))
                .unwrap_or(0.0);
            self.current = (self.current + step).clamp(-SIGNAL_CLAMP, SIGNAL_CLAMP);
        }

        self.history.push(self.current);
        Signal::Value(self.current)
    }

    /// The most recent signal value (the initial value before day one).
    pub fn last_value(&self) -> f64 {
        self.history.last().copied().unwrap_or(self.current)
    }

    /// All values produced so far, including the initial value.
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(horizon: u64) -> Media {
        Media::new(&MediaConfig::default(), horizon, 42)
    }

    #[test]
    fn test_deterministic_generation() {
        let mut a = setup(100);
        let mut b = setup(100);

        for _ in 0..100 {
            assert_eq!(a.next_signal(), b.next_signal());
        }
    }

    #[test]
    fn test_signal_stays_clamped() {
        let config = MediaConfig {
            initial_value: 0.0,
            sigma: 5.0,
            fixed_values: Default::default(),
        };
        let mut media = Media::new(&config, 500, 7);

        while let Signal::Value(v) = media.next_signal() {
            assert!((-3.0..=3.0).contains(&v), "signal {v} escaped bounds");
        }
    }

    #[test]
    fn test_fixed_override_wins() {
        let mut fixed = std::collections::HashMap::new();
        fixed.insert(3u64, 2.5);
        let config = MediaConfig {
            initial_value: 0.0,
            sigma: 0.1,
            fixed_values: fixed,
        };
        let mut media = Media::new(&config, 10, 42);

        media.next_signal();
        media.next_signal();
        assert_eq!(media.next_signal(), Signal::Value(2.5));
    }

    #[test]
    fn test_exhaustion_after_horizon() {
        let mut media = setup(3);
        for _ in 0..3 {
            assert!(matches!(media.next_signal(), Signal::Value(_)));
        }
        assert_eq!(media.next_signal(), Signal::Exhausted);
        assert_eq!(media.next_signal(), Signal::Exhausted);

        // Last value survives exhaustion for substitution.
        let last = media.last_value();
        assert_eq!(media.history().last().copied(), Some(last));
    }

    #[test]
    fn test_history_includes_initial_value() {
        let mut media = setup(2);
        media.next_signal();
        media.next_signal();
        assert_eq!(media.history().len(), 3);
        assert_eq!(media.history()[0], 0.0);
    }
}
