//! Statistical utilities for price-series analysis.
//!
//! This module provides the common statistical functions used by the
//! volatility estimate and the behavioral signal calculations.

/// Calculate the mean of a slice of values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Calculate the variance of a slice of values (population variance).
pub fn variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean_val = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean_val).powi(2)).sum();
    Some(sum_sq / n as f64)
}

/// Calculate the standard deviation (population).
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(|v| v.sqrt())
}

/// Calculate log returns from a price series.
/// Returns ln(price[i] / price[i-1]) for each consecutive positive pair.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < 2 {
        return vec![];
    }

    prices
        .windows(2)
        .filter_map(|w| {
            if w[0] > 0.0 && w[1] > 0.0 {
                Some((w[1] / w[0]).ln())
            } else {
                None
            }
        })
        .collect()
}

/// Annualized volatility over the trailing window of a price series.
///
/// Non-positive prices are filtered out before taking logs. The estimate is
/// only produced when at least `window + 1` valid prices exist (so the log
/// returns fill the full window); callers retain their previous estimate
/// otherwise.
pub fn annualized_volatility(prices: &[f64], window: usize, periods_per_year: u32) -> Option<f64> {
    if window == 0 {
        return None;
    }

    let valid: Vec<f64> = prices.iter().copied().filter(|p| *p > 0.0).collect();
    if valid.len() < window + 1 {
        return None;
    }

    let tail = &valid[valid.len() - (window + 1)..];
    let returns = log_returns(tail);
    if returns.len() < 2 {
        return None;
    }

    std_dev(&returns).map(|sd| sd * (periods_per_year as f64).sqrt())
}
