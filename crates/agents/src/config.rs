//! Agent population and behavioral configuration.

use serde::{Deserialize, Serialize};

use quant::MovingAverageKind;

/// Population-level agent configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPopulationConfig {
    /// Number of investors.
    pub count: usize,
    /// Starting cash per investor.
    pub initial_cash: f64,
    /// Starting shares for the first investor (a seeded large holder).
    pub initial_shares_first: u64,
    /// Starting shares for every other investor.
    pub initial_shares_rest: u64,
    /// Mean of the truncated-normal literacy distribution.
    pub literacy_mean: f64,
    /// Standard deviation of the literacy distribution.
    pub literacy_std: f64,
    /// Lower literacy bound.
    pub literacy_min: f64,
    /// Upper literacy bound.
    pub literacy_max: f64,
    /// Neighbors sampled per investor at setup (capped at count - 1).
    pub num_neighbors: usize,
    /// Behavioral weights shared by the population.
    pub behavior: BehaviorConfig,
}

impl Default for AgentPopulationConfig {
    fn default() -> Self {
        Self {
            count: 100,
            initial_cash: 50_000.0,
            initial_shares_first: 100,
            initial_shares_rest: 10,
            literacy_mean: 0.5,
            literacy_std: 0.2,
            literacy_min: 0.2,
            literacy_max: 1.0,
            num_neighbors: 5,
            behavior: BehaviorConfig::default(),
        }
    }
}

/// Per-agent behavioral parameter bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Moving-average family for the chartist term.
    pub moving_average: MovingAverageKind,
    /// Trading days per year; the long chartist window is
    /// `literacy * trading_days`.
    pub trading_days: u32,
    /// Short window = long window / this divisor.
    pub short_window_divisor: u32,
    /// Std-dev of the Gaussian noise term in the expected-price blend.
    pub expected_price_noise_std: f64,
    /// Std-dev of the Gaussian noise in the private signal.
    pub private_noise_std: f64,
    /// Weight of the expected-return component of the private signal.
    pub private_return_weight: f64,
    /// Weight of the wealth-change component of the private signal.
    pub private_wealth_weight: f64,
    /// Lookback (periods) for the wealth-change component.
    pub wealth_lookback: usize,
    /// Floor of the daily participation probability.
    pub participation_floor: f64,
    /// Literacy factor of the participation probability:
    /// `clip(floor + factor * (1 - lf)^2, 0.1, 1.0)`.
    pub participation_literacy_factor: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            moving_average: MovingAverageKind::Ema,
            trading_days: 252,
            short_window_divisor: 4,
            expected_price_noise_std: 0.1,
            private_noise_std: 0.05,
            private_return_weight: 0.6,
            private_wealth_weight: 0.4,
            wealth_lookback: 5,
            participation_floor: 0.3,
            participation_literacy_factor: 0.9,
        }
    }
}

/// Global sentiment-formula and order-sizing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentParams {
    /// Private-signal coefficient (scaled by literacy).
    pub a0: f64,
    /// Social-signal coefficient (scaled by 1 - literacy).
    pub b0: f64,
    /// News coefficient (scaled by 1 - literacy).
    pub c0: f64,
    /// Expectation-blend shape parameter: `x = lf / e^beta`,
    /// `z = (1 - beta)(1 - lf)`, `y = 1 - x - z`.
    pub beta: f64,
    /// Weight of the expected price in the limit-price blend.
    pub expected_price_weight: f64,
    /// Minimum buy quantity.
    pub buy_quantity_min: u64,
    /// Maximum buy quantity.
    pub buy_quantity_max: u64,
    /// Sells are capped at `holdings / divisor` (floored at 1).
    pub sell_quantity_divisor: u64,
    /// Sentiment tilt applied to the inflation expectation.
    pub inflation_sentiment_weight: f64,
    /// Sentiment tilt applied to the risk premium.
    pub premium_sentiment_weight: f64,
}

impl Default for SentimentParams {
    fn default() -> Self {
        Self {
            a0: 0.5,
            b0: 0.3,
            c0: 0.2,
            beta: 0.8,
            expected_price_weight: 0.35,
            buy_quantity_min: 1,
            buy_quantity_max: 30,
            sell_quantity_divisor: 5,
            inflation_sentiment_weight: 0.9,
            premium_sentiment_weight: 0.9,
        }
    }
}
