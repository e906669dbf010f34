//! The typed configuration bundle for a simulation run.
//!
//! Mirrors the named sections of the original JSON parameter file. Every
//! numeric default of the model is overridable here; unknown values are
//! caught once by [`SimulationParams::validate`] before the first day runs
//! rather than defaulted ad hoc at read sites.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use agents::{AgentPopulationConfig, SentimentParams};
use fund::{FundConfig, PropertyConfig};
use macroenv::{CentralBankConfig, MediaConfig};

/// Run-level controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Number of trading days to simulate.
    pub num_days: u64,
    /// Master random seed; every generator in the run derives from it.
    pub random_seed: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            num_days: 252,
            random_seed: 42,
        }
    }
}

/// Market-level controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Volatility estimate used until enough history accumulates.
    pub initial_volatility: f64,
    /// Days between dividend distributions.
    pub dividend_interval_days: u64,
    /// Days between property revaluations.
    pub revaluation_interval_days: u64,
    /// Trailing window (in returns) of the volatility estimate.
    pub volatility_window: usize,
    /// Worker-pool size; `None` means half the hardware threads.
    pub workers: Option<usize>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            initial_volatility: 0.1,
            dividend_interval_days: 21,
            revaluation_interval_days: 126,
            volatility_window: 200,
            workers: None,
        }
    }
}

/// The full configuration bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimulationParams {
    pub general: GeneralConfig,
    pub fund: FundConfig,
    pub properties: Vec<PropertyConfig>,
    pub agents: AgentPopulationConfig,
    pub central_bank: CentralBankConfig,
    pub media: MediaConfig,
    pub market: MarketConfig,
    pub sentiment: SentimentParams,
}

impl SimulationParams {
    /// Load and validate a parameter bundle from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let params: SimulationParams = serde_json::from_str(&raw).map_err(ConfigError::Parse)?;
        params.validate()?;
        Ok(params)
    }

    /// Validate the bundle. Invalid configuration is fatal at setup time and
    /// aborts before the first day runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.num_days == 0 {
            return Err(ConfigError::invalid("general.num_days must be at least 1"));
        }
        if self.fund.num_shares == 0 {
            return Err(ConfigError::invalid("fund.num_shares must be positive"));
        }
        if self.fund.history_seed_days == 0 {
            return Err(ConfigError::invalid(
                "fund.history_seed_days must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.fund.payout_ratio) {
            return Err(ConfigError::invalid("fund.payout_ratio must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.fund.investment_fraction) {
            return Err(ConfigError::invalid(
                "fund.investment_fraction must be in [0, 1]",
            ));
        }
        if self.properties.is_empty() {
            return Err(ConfigError::invalid("at least one property is required"));
        }
        if self.properties.iter().any(|p| p.value <= 0.0) {
            return Err(ConfigError::invalid("property values must be positive"));
        }
        if self
            .properties
            .iter()
            .any(|p| !(0.0..=1.0).contains(&p.vacancy))
        {
            return Err(ConfigError::invalid("property vacancy must be in [0, 1]"));
        }

        let agents = &self.agents;
        if agents.count == 0 {
            return Err(ConfigError::invalid("agents.count must be at least 1"));
        }
        if agents.literacy_min >= agents.literacy_max {
            return Err(ConfigError::invalid(
                "agents.literacy_min must be below literacy_max",
            ));
        }
        if !(0.0..=1.0).contains(&agents.literacy_min)
            || !(0.0..=1.0).contains(&agents.literacy_max)
        {
            return Err(ConfigError::invalid("literacy bounds must be in [0, 1]"));
        }
        if agents.behavior.short_window_divisor == 0 {
            return Err(ConfigError::invalid(
                "agents.behavior.short_window_divisor must be at least 1",
            ));
        }
        if agents.behavior.trading_days == 0 {
            return Err(ConfigError::invalid(
                "agents.behavior.trading_days must be at least 1",
            ));
        }

        let sentiment = &self.sentiment;
        for (name, value) in [
            ("sentiment.a0", sentiment.a0),
            ("sentiment.b0", sentiment.b0),
            ("sentiment.c0", sentiment.c0),
            ("sentiment.beta", sentiment.beta),
            ("sentiment.expected_price_weight", sentiment.expected_price_weight),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }
        if sentiment.buy_quantity_min == 0 {
            return Err(ConfigError::invalid(
                "sentiment.buy_quantity_min must be at least 1",
            ));
        }
        if sentiment.buy_quantity_min > sentiment.buy_quantity_max {
            return Err(ConfigError::invalid(
                "sentiment.buy_quantity_min must not exceed buy_quantity_max",
            ));
        }
        if sentiment.sell_quantity_divisor == 0 {
            return Err(ConfigError::invalid(
                "sentiment.sell_quantity_divisor must be at least 1",
            ));
        }

        let market = &self.market;
        if market.dividend_interval_days == 0 || market.revaluation_interval_days == 0 {
            return Err(ConfigError::invalid("event intervals must be at least 1"));
        }
        if market.volatility_window == 0 {
            return Err(ConfigError::invalid(
                "market.volatility_window must be at least 1",
            ));
        }
        if market.initial_volatility < 0.0 || !market.initial_volatility.is_finite() {
            return Err(ConfigError::invalid(
                "market.initial_volatility must be finite and non-negative",
            ));
        }

        Ok(())
    }
}

/// Errors loading or validating the configuration bundle. All fatal.
#[derive(Debug)]
pub enum ConfigError {
    /// The parameter file could not be read.
    Io(std::io::Error),
    /// The parameter file is not valid JSON for the expected shape.
    Parse(serde_json::Error),
    /// A field value fails validation.
    Invalid(String),
}

impl ConfigError {
    fn invalid(message: &str) -> Self {
        ConfigError::Invalid(message.to_string())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read parameter file: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse parameter file: {e}"),
            ConfigError::Invalid(message) => write!(f, "invalid configuration: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_params() -> SimulationParams {
        SimulationParams {
            properties: vec![PropertyConfig::default()],
            ..SimulationParams::default()
        }
    }

    #[test]
    fn test_default_bundle_without_properties_is_invalid() {
        let params = SimulationParams::default();
        assert!(matches!(params.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_valid_bundle_passes() {
        assert!(valid_params().validate().is_ok());
    }

    #[test]
    fn test_zero_agents_rejected() {
        let mut params = valid_params();
        params.agents.count = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_zero_shares_rejected() {
        let mut params = valid_params();
        params.fund.num_shares = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_bad_literacy_bounds_rejected() {
        let mut params = valid_params();
        params.agents.literacy_min = 0.9;
        params.agents.literacy_max = 0.2;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_non_finite_coefficient_rejected() {
        let mut params = valid_params();
        params.sentiment.beta = f64::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_zero_volatility_window_rejected() {
        let mut params = valid_params();
        params.market.volatility_window = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_bundle_round_trips_through_json() {
        let params = valid_params();
        let json = serde_json::to_string(&params).unwrap();
        let back: SimulationParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{
            "general": { "num_days": 10 },
            "properties": [ { "value": 500000.0 } ]
        }"#;
        let params: SimulationParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.general.num_days, 10);
        assert_eq!(params.general.random_seed, 42);
        assert_eq!(params.market.dividend_interval_days, 21);
        assert!(params.validate().is_ok());
    }
}
