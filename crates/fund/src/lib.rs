//! The FII financial instrument: a real-estate fund whose shares trade in
//! the secondary market.
//!
//! The fund owns a portfolio of properties, collects their (vacancy-noised)
//! rent flow, distributes most of it as dividends, retains the rest as cash,
//! and periodically reinvests that cash into the portfolio while property
//! values track inflation. The market core only touches the fund through a
//! narrow interface: current price, last dividend, dividend distribution,
//! revaluation, and the post-auction price write-back.

pub mod config;
pub mod property;

pub use config::{FundConfig, PropertyConfig};
pub use property::Property;

use rand::Rng;

use types::Price;

/// The real-estate fund ("FII") whose shares the agents trade.
#[derive(Debug, Clone)]
pub struct Fund {
    /// Total shares outstanding ("cotas").
    num_shares: u64,
    /// Uninvested fund cash.
    cash: f64,
    /// Property portfolio.
    properties: Vec<Property>,
    /// Current share price (last traded, or book value before any trade).
    price: Price,
    /// Daily closing prices, seeded with a flat pre-history.
    price_history: Vec<Price>,
    /// Dividends per share, newest last.
    dividend_history: Vec<f64>,
    /// Fraction of rent flow paid out as dividends.
    payout_ratio: f64,
    /// Fraction of rent flow retained as fund cash.
    retained_ratio: f64,
    /// Fraction of cash reinvested on each revaluation.
    investment_fraction: f64,
    /// Annual rent as a fraction of property value.
    rent_factor: f64,
}

impl Fund {
    /// Create a fund from its configuration section, with an empty
    /// portfolio. Properties are added separately and the history seeded
    /// once the portfolio is complete.
    pub fn new(config: &FundConfig) -> Self {
        Self {
            num_shares: config.num_shares,
            cash: config.initial_cash,
            properties: Vec::new(),
            price: Price::ZERO,
            price_history: Vec::new(),
            dividend_history: Vec::new(),
            payout_ratio: config.payout_ratio,
            retained_ratio: config.retained_ratio,
            investment_fraction: config.investment_fraction,
            rent_factor: config.rent_factor,
        }
    }

    /// Add a property to the portfolio.
    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Shares outstanding.
    pub fn num_shares(&self) -> u64 {
        self.num_shares
    }

    /// Uninvested fund cash.
    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// The property portfolio.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Net asset value per share: (cash + property values) / shares.
    pub fn book_value_per_share(&self) -> f64 {
        if self.num_shares == 0 {
            return 0.0;
        }
        let property_value: f64 = self.properties.iter().map(|p| p.value()).sum();
        (self.cash + property_value) / self.num_shares as f64
    }

    /// Current share price.
    pub fn current_price(&self) -> Price {
        self.price
    }

    /// Write the post-auction traded price back into the fund.
    pub fn set_price(&mut self, price: Price) {
        self.price = price;
    }

    /// Append the current price to the daily history.
    pub fn push_price(&mut self) {
        self.price_history.push(self.price);
    }

    /// Daily closing prices, oldest first.
    pub fn price_history(&self) -> &[Price] {
        &self.price_history
    }

    /// The most recent dividend per share.
    pub fn last_dividend_per_share(&self) -> f64 {
        self.dividend_history.last().copied().unwrap_or(0.0)
    }

    /// Dividend-per-share history, newest last.
    pub fn dividend_history(&self) -> &[f64] {
        &self.dividend_history
    }

    /// Sample the portfolio's rent flow for one distribution period.
    pub fn rent_flow<R: Rng>(&self, rng: &mut R) -> f64 {
        self.properties.iter().map(|p| p.sample_rent(rng)).sum()
    }

    /// Expected rent flow with vacancy applied but no noise.
    pub fn expected_rent_flow(&self) -> f64 {
        self.properties.iter().map(|p| p.expected_rent()).sum()
    }

    /// Distribute dividends: sample the rent flow, pay out the configured
    /// fraction per share, retain the rest as fund cash. Returns the
    /// dividend per share; the caller credits each holder.
    pub fn distribute_dividends<R: Rng>(&mut self, rng: &mut R) -> f64 {
        let flow = self.rent_flow(rng);
        let dividend = if self.num_shares > 0 {
            flow * self.payout_ratio / self.num_shares as f64
        } else {
            0.0
        };
        self.dividend_history.push(dividend);
        self.cash += flow * self.retained_ratio;
        dividend
    }

    /// Periodic revaluation: reinvest a fraction of cash into the portfolio
    /// (split equally), inflate property values, and reset rents off the new
    /// values.
    pub fn revalue(&mut self, inflation: f64) {
        let to_invest = self.investment_fraction * self.cash;
        self.cash -= to_invest;

        let per_property = if self.properties.is_empty() {
            0.0
        } else {
            to_invest / self.properties.len() as f64
        };

        for property in &mut self.properties {
            property.revalue(inflation, per_property, self.rent_factor);
        }
    }

    /// Seed the price history with `days` copies of the book value per
    /// share, and the dividend history with one noise-free regular dividend
    /// so the dividend-discount anchor is sane before the first
    /// distribution.
    pub fn seed_history(&mut self, days: usize) {
        let book_value = self.book_value_per_share();
        self.price = Price::from_float(book_value);
        self.price_history = vec![self.price; days];

        let dividend = if self.num_shares > 0 {
            self.expected_rent_flow() * self.payout_ratio / self.num_shares as f64
        } else {
            0.0
        };
        self.dividend_history.push(dividend);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup_fund() -> Fund {
        let mut fund = Fund::new(&FundConfig {
            num_shares: 1_000,
            initial_cash: 50_000.0,
            ..FundConfig::default()
        });
        fund.add_property(Property::new(
            &PropertyConfig {
                value: 500_000.0,
                vacancy: 0.1,
                maintenance_cost: 1_000.0,
                rent_noise_std: 0.1,
            },
            fund.rent_factor,
        ));
        fund.add_property(Property::new(
            &PropertyConfig {
                value: 300_000.0,
                vacancy: 0.2,
                maintenance_cost: 800.0,
                rent_noise_std: 0.1,
            },
            fund.rent_factor,
        ));
        fund
    }

    #[test]
    fn test_book_value_per_share() {
        let fund = setup_fund();
        // (50_000 + 500_000 + 300_000) / 1_000
        assert!((fund.book_value_per_share() - 850.0).abs() < 1e-9);
    }

    #[test]
    fn test_book_value_cash_only() {
        let fund = Fund::new(&FundConfig {
            num_shares: 100,
            initial_cash: 5_000.0,
            ..FundConfig::default()
        });
        assert!((fund.book_value_per_share() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_dividend_payout_split() {
        let mut fund = setup_fund();
        let cash_before = fund.cash();
        let mut rng = StdRng::seed_from_u64(1);

        let dividend = fund.distribute_dividends(&mut rng);

        assert!(dividend > 0.0);
        assert_eq!(fund.dividend_history().len(), 1);
        // Retained cash is (retained/payout) of what was paid out in total.
        let paid_total = dividend * fund.num_shares() as f64;
        let retained = fund.cash() - cash_before;
        let expected_ratio = fund.retained_ratio / fund.payout_ratio;
        assert!((retained / paid_total - expected_ratio).abs() < 1e-9);
    }

    #[test]
    fn test_revalue_inflates_and_reinvests() {
        let mut fund = setup_fund();
        let cash_before = fund.cash();
        let values_before: Vec<f64> = fund.properties().iter().map(|p| p.value()).collect();

        fund.revalue(0.10);

        let invested = cash_before * fund.investment_fraction;
        assert!((fund.cash() - (cash_before - invested)).abs() < 1e-9);
        let per_property = invested / 2.0;
        for (property, before) in fund.properties().iter().zip(values_before) {
            assert!((property.value() - (before * 1.10 + per_property)).abs() < 1e-6);
            // Rent resets off the new value.
            assert!((property.rent() - property.value() * fund.rent_factor).abs() < 1e-9);
        }
    }

    #[test]
    fn test_seed_history() {
        let mut fund = setup_fund();
        fund.seed_history(30);

        assert_eq!(fund.price_history().len(), 30);
        assert_eq!(fund.current_price(), Price::from_float(850.0));
        assert!(fund.price_history().iter().all(|p| *p == fund.current_price()));
        // Seed dividend is the noise-free regular dividend, not book value.
        let expected = fund.expected_rent_flow() * fund.payout_ratio / 1_000.0;
        assert!((fund.last_dividend_per_share() - expected).abs() < 1e-9);
    }
}
