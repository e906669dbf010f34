//! Heterogeneous investor agents for the FII market.
//!
//! Each investor carries a financial-literacy coefficient, cash, share
//! holdings, a bounded sentiment, rolling price/wealth histories, and a
//! fixed set of neighbor IDs resolved through the registry. The decision
//! model in [`decision`] turns an agent's state plus an immutable market
//! snapshot into an expected price, a sentiment, and a risk/allocation
//! decision; [`orders`] turns those into at most one order per day.

pub mod config;
pub mod decision;
pub mod literacy;
pub mod orders;
pub mod state;

pub use config::{AgentPopulationConfig, BehaviorConfig, SentimentParams};
pub use decision::{AgentUpdate, DecisionError, DecisionInputs, DecisionOutput};
pub use literacy::sample_literacy;
pub use orders::generate_order;
pub use state::{Investor, InvestorRegistry};
