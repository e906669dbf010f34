//! Daily orchestration of the FII secondary market.
//!
//! One [`Market::advance_day`] call sequences a full trading day: media
//! signal ingestion, periodic dividend and revaluation events, the parallel
//! sentiment/expectation update over an immutable snapshot, sequential
//! probabilistic order submission, double-auction clearing with settlement,
//! history bookkeeping, and the rolling volatility recompute.

pub mod market;
pub mod metrics;
pub mod params;
pub mod stage;

pub use market::{Market, SetupError};
pub use metrics::{AgentReport, DaySummary, FundReport, SimulationResult};
pub use params::{ConfigError, GeneralConfig, MarketConfig, SimulationParams};
pub use stage::{StageOutcome, run_update_stage};
