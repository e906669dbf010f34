//! Literacy-windowed moving averages for the chartist expectation term.
//!
//! The long window is derived from the agent's financial-literacy
//! coefficient (`ω = lf * trading_days`, floored at 2) and the short window
//! is `ω` divided by a configured divisor. Both a simple and an unadjusted
//! exponential average are supported, selected by configuration.

use serde::{Deserialize, Serialize};

use crate::stats::mean;

/// Which moving-average family the chartist term uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MovingAverageKind {
    /// Simple arithmetic average over the window.
    Sma,
    /// Exponential average with `α = 2 / (window + 1)`.
    #[default]
    Ema,
}

/// Derive the (short, long) window lengths for a literacy coefficient.
///
/// Both windows are floored at 2 so the averages stay meaningful even for
/// very low literacy.
pub fn technical_windows(literacy: f64, trading_days: u32, short_divisor: u32) -> (usize, usize) {
    let long = ((literacy * trading_days as f64) as usize).max(2);
    let short = (long / short_divisor.max(1) as usize).max(2);
    (short, long)
}

/// Compute the (short, long) moving averages of a price series.
///
/// Mirrors the window fallbacks of the behavioral model: with fewer prices
/// than a window the last price stands in for the SMA, and an EMA over a
/// series shorter than 2 collapses to the last price.
pub fn technical_averages(
    prices: &[f64],
    literacy: f64,
    kind: MovingAverageKind,
    trading_days: u32,
    short_divisor: u32,
) -> (f64, f64) {
    if prices.is_empty() {
        return (0.0, 0.0);
    }

    let (short_window, long_window) = technical_windows(literacy, trading_days, short_divisor);
    let last = prices[prices.len() - 1];

    match kind {
        MovingAverageKind::Sma => {
            let short_avg = if prices.len() >= short_window {
                mean(&prices[prices.len() - short_window..]).unwrap_or(last)
            } else {
                last
            };
            let long_avg = if prices.len() >= long_window {
                mean(&prices[prices.len() - long_window..]).unwrap_or(last)
            } else {
                last
            };
            (short_avg, long_avg)
        }
        MovingAverageKind::Ema => {
            let start = prices.len().saturating_sub(long_window);
            let tail = &prices[start..];
            if tail.len() < 2 {
                return (last, last);
            }
            let alpha_short = 2.0 / (short_window as f64 + 1.0);
            let alpha_long = 2.0 / (long_window as f64 + 1.0);
            (ema(tail, alpha_short), ema(tail, alpha_long))
        }
    }
}

/// Unadjusted exponential moving average: seeded with the first value, then
/// `ema = α * x + (1 - α) * ema` for each subsequent value.
fn ema(values: &[f64], alpha: f64) -> f64 {
    let initial = values[0];
    values
        .iter()
        .skip(1)
        .fold(initial, |prev, curr| alpha * curr + (1.0 - alpha) * prev)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_floor_at_two() {
        let (short, long) = technical_windows(0.0, 252, 4);
        assert_eq!((short, long), (2, 2));

        let (short, long) = technical_windows(1.0, 252, 4);
        assert_eq!(long, 252);
        assert_eq!(short, 63);
    }

    #[test]
    fn test_sma_short_history_falls_back_to_last() {
        let prices = [10.0, 12.0];
        // literacy 1.0 -> long window 252, far more than 2 prices
        let (short, long) =
            technical_averages(&prices, 1.0, MovingAverageKind::Sma, 252, 4);
        assert_eq!(short, 12.0);
        assert_eq!(long, 12.0);
    }

    #[test]
    fn test_sma_full_windows() {
        let prices: Vec<f64> = (1..=300).map(|i| i as f64).collect();
        let (short, long) =
            technical_averages(&prices, 1.0, MovingAverageKind::Sma, 252, 4);
        // short window 63: mean of 238..=300; long window 252: mean of 49..=300
        assert!((short - 269.0).abs() < 1e-9);
        assert!((long - 174.5).abs() < 1e-9);
        assert!(short > long, "rising series: short average leads");
    }

    #[test]
    fn test_ema_reacts_faster_than_long() {
        let mut prices = vec![100.0; 250];
        prices.extend(std::iter::repeat_n(120.0, 50));
        let (short, long) =
            technical_averages(&prices, 1.0, MovingAverageKind::Ema, 252, 4);
        assert!(short > long, "short EMA should track the jump more closely");
        assert!(short <= 120.0 && long >= 100.0);
    }

    #[test]
    fn test_empty_prices() {
        assert_eq!(
            technical_averages(&[], 0.5, MovingAverageKind::Ema, 252, 4),
            (0.0, 0.0)
        );
    }

    #[test]
    fn test_single_price_ema_collapses() {
        assert_eq!(
            technical_averages(&[42.0], 0.5, MovingAverageKind::Ema, 252, 4),
            (42.0, 42.0)
        );
    }
}
