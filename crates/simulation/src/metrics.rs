//! Per-day summaries and the end-of-run result artifact.

use serde::{Deserialize, Serialize};

use types::{AgentId, Day, Price, Quantity};

/// Result line of one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Day number (1-based).
    pub day: Day,
    /// Closing traded price.
    pub close: Price,
    /// Trades executed in the day's auction.
    pub trades: usize,
    /// Shares traded.
    pub volume: Quantity,
    /// Mean sentiment across the roster after the update merge.
    pub mean_sentiment: f64,
    /// Volatility estimate carried into the next day.
    pub volatility: f64,
    /// Agents whose update failed and kept their prior state.
    pub failures: usize,
}

/// Final per-agent report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    pub id: AgentId,
    /// Final cash balance.
    pub cash: f64,
    /// Final share holdings.
    pub holdings: u64,
    /// Final wealth at the closing price.
    pub wealth: f64,
    /// Final sentiment.
    pub sentiment: f64,
}

/// Final fund-side report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundReport {
    /// Closing share price.
    pub price: f64,
    /// Uninvested fund cash.
    pub cash: f64,
    /// Net asset value per share.
    pub book_value_per_share: f64,
    /// Dividends distributed per share over the run.
    pub total_dividends_per_share: f64,
}

/// Everything a run produces for reporting collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Per-day traded price series.
    pub prices: Vec<f64>,
    /// Per-day mean sentiment series.
    pub mean_sentiment: Vec<f64>,
    /// Total trades over the run.
    pub total_trades: u64,
    /// Total shares traded over the run.
    pub total_volume: u64,
    /// Total per-agent failures recovered over the run.
    pub total_failures: u64,
    /// Final state of every agent.
    pub agents: Vec<AgentReport>,
    /// Final state of the fund.
    pub fund: FundReport,
}

impl SimulationResult {
    /// Closing price of the run (0 when no days ran).
    pub fn final_price(&self) -> f64 {
        self.prices.last().copied().unwrap_or(0.0)
    }

    /// Total wealth across all agents at the close.
    pub fn total_agent_wealth(&self) -> f64 {
        self.agents.iter().map(|a| a.wealth).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes() {
        let result = SimulationResult {
            prices: vec![100.0, 101.5],
            mean_sentiment: vec![0.0, 0.1],
            total_trades: 3,
            total_volume: 40,
            total_failures: 0,
            agents: vec![AgentReport {
                id: AgentId(1),
                cash: 9_500.0,
                holdings: 15,
                wealth: 11_022.5,
                sentiment: 0.1,
            }],
            fund: FundReport {
                price: 101.5,
                cash: 50_000.0,
                book_value_per_share: 100.0,
                total_dividends_per_share: 0.7,
            },
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: SimulationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
        assert_eq!(back.final_price(), 101.5);
    }
}
