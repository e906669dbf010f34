//! Configuration for the fund and its property portfolio.

use serde::{Deserialize, Serialize};

/// Fund-level parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundConfig {
    /// Shares outstanding ("cotas").
    pub num_shares: u64,
    /// Starting uninvested cash.
    pub initial_cash: f64,
    /// Fraction of rent flow distributed as dividends.
    pub payout_ratio: f64,
    /// Fraction of rent flow retained as fund cash.
    pub retained_ratio: f64,
    /// Fraction of cash reinvested into properties on each revaluation.
    pub investment_fraction: f64,
    /// Rent as a fraction of property value.
    pub rent_factor: f64,
    /// Days of flat price pre-history seeded before day one.
    pub history_seed_days: usize,
}

impl Default for FundConfig {
    fn default() -> Self {
        Self {
            num_shares: 10_000,
            initial_cash: 1_000_000.0,
            payout_ratio: 0.95,
            retained_ratio: 0.05,
            investment_fraction: 0.50,
            rent_factor: 0.005,
            history_seed_days: 30,
        }
    }
}

/// One property in the fund's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyConfig {
    /// Appraised value.
    pub value: f64,
    /// Vacancy rate in [0, 1].
    pub vacancy: f64,
    /// Periodic maintenance cost (reported, not charged against rent).
    pub maintenance_cost: f64,
    /// Standard deviation of the vacancy noise multiplier.
    pub rent_noise_std: f64,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            value: 1_000_000.0,
            vacancy: 0.1,
            maintenance_cost: 0.0,
            rent_noise_std: 0.1,
        }
    }
}
