//! Macro-environment collaborators: the central bank and the media outlet.
//!
//! Both are consumed by the daily orchestrator through narrow read
//! interfaces: the central bank supplies static macro expectations, the
//! media produces one sentiment-shock signal per day until its configured
//! horizon is exhausted.

pub mod central_bank;
pub mod config;
pub mod media;

pub use central_bank::CentralBank;
pub use config::{CentralBankConfig, MediaConfig};
pub use media::{Media, Signal};
