//! Truncated-normal sampling of the financial-literacy coefficient.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Attempts before falling back to the clamped mean. Rejection sampling on
/// [0.2, 1.0] around a mid-range mean accepts within a handful of draws.
const MAX_REJECTIONS: usize = 1_000;

/// Sample a literacy coefficient from a normal distribution truncated to
/// `[min, max]`.
///
/// Degenerate inputs (non-positive std-dev, failed construction) fall back
/// to the clamped mean rather than erroring; literacy is a setup-time
/// parameter and the clamp keeps setup total.
pub fn sample_literacy<R: Rng>(rng: &mut R, mean: f64, std_dev: f64, min: f64, max: f64) -> f64 {
    if std_dev <= 0.0 {
        return mean.clamp(min, max);
    }

    let Ok(dist) = Normal::new(mean, std_dev) else {
        return mean.clamp(min, max);
    };

    for _ in 0..MAX_REJECTIONS {
        let draw = dist.sample(rng);
        if (min..=max).contains(&draw) {
            return draw;
        }
    }

    mean.clamp(min, max)
}
