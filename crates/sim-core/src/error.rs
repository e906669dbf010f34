//! Error types for sim-core operations.

use std::fmt;

use crate::order_book::BookPhase;

/// Result type for sim-core operations.
pub type Result<T> = std::result::Result<T, SimCoreError>;

/// Errors that can occur during order-book operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimCoreError {
    /// Invalid order: zero quantity.
    ZeroQuantity,
    /// Invalid order: non-positive limit price.
    InvalidLimit,
    /// The book is past its accepting phase and rejects submissions.
    BookClosed(BookPhase),
}

impl fmt::Display for SimCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimCoreError::ZeroQuantity => write!(f, "order quantity cannot be zero"),
            SimCoreError::InvalidLimit => write!(f, "limit price must be positive"),
            SimCoreError::BookClosed(phase) => {
                write!(f, "order book no longer accepts orders (phase: {phase:?})")
            }
        }
    }
}

impl std::error::Error for SimCoreError {}
