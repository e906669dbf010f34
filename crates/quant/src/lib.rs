//! Quantitative utilities for the market simulation.
//!
//! Provides the statistical helpers behind the volatility estimate and the
//! literacy-windowed moving averages used by the chartist term of the
//! expected-price model.

pub mod averages;
pub mod stats;

pub use averages::{MovingAverageKind, technical_averages, technical_windows};
pub use stats::{annualized_volatility, log_returns, mean, std_dev, variance};
