//! Configuration for the macro-environment collaborators.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Central-bank parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralBankConfig {
    /// Policy rate (SELIC-like), annualized.
    pub policy_rate: f64,
    /// Expected inflation, annualized.
    pub expected_inflation: f64,
    /// Risk premium demanded over the policy rate.
    pub risk_premium: f64,
}

impl Default for CentralBankConfig {
    fn default() -> Self {
        Self {
            policy_rate: 0.15,
            expected_inflation: 0.07,
            risk_premium: 0.08,
        }
    }
}

/// Media-outlet parameters.
///
/// The signal horizon (number of days) comes from the general simulation
/// config at construction time, not from this section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Starting signal value.
    pub initial_value: f64,
    /// Standard deviation of the daily random-walk step.
    pub sigma: f64,
    /// Fixed signal overrides keyed by day number; scripted shocks take
    /// precedence over the random walk on those days.
    pub fixed_values: HashMap<u64, f64>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            initial_value: 0.0,
            sigma: 0.1,
            fixed_values: HashMap::new(),
        }
    }
}
