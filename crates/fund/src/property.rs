//! A single property in the fund's portfolio.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::PropertyConfig;

/// One rental property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Appraised value.
    value: f64,
    /// Vacancy rate in [0, 1].
    vacancy: f64,
    /// Periodic maintenance cost (reported, not charged against rent).
    maintenance_cost: f64,
    /// Current rent per distribution period.
    rent: f64,
    /// Standard deviation of the vacancy noise multiplier.
    noise_std: f64,
}

impl Property {
    /// Create a property from its configuration; rent starts at
    /// `value * rent_factor`.
    pub fn new(config: &PropertyConfig, rent_factor: f64) -> Self {
        Self {
            value: config.value,
            vacancy: config.vacancy,
            maintenance_cost: config.maintenance_cost,
            rent: config.value * rent_factor,
            noise_std: config.rent_noise_std,
        }
    }

    /// Appraised value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Vacancy rate.
    pub fn vacancy(&self) -> f64 {
        self.vacancy
    }

    /// Periodic maintenance cost.
    pub fn maintenance_cost(&self) -> f64 {
        self.maintenance_cost
    }

    /// Current rent per distribution period.
    pub fn rent(&self) -> f64 {
        self.rent
    }

    /// Sample one period's rent: `rent * (1 - vacancy * (1 + N(0, σ)))`.
    pub fn sample_rent<R: Rng>(&self, rng: &mut R) -> f64 {
        let noise = Normal::new(0.0, self.noise_std)
            .map(|dist| dist.sample(rng))
            .unwrap_or(0.0);
        self.rent * (1.0 - self.vacancy * (1.0 + noise))
    }

    /// Rent with vacancy applied but no noise.
    pub fn expected_rent(&self) -> f64 {
        self.rent * (1.0 - self.vacancy)
    }

    /// Apply a revaluation: inflate the value, add the reinvested amount,
    /// and reset the rent off the new value.
    pub fn revalue(&mut self, inflation: f64, investment: f64, rent_factor: f64) {
        self.value *= 1.0 + inflation;
        self.value += investment;
        self.rent = self.value * rent_factor;
    }
}
