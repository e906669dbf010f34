//! Core types for the FII market simulation.
//!
//! This crate provides all shared data types used across the simulation,
//! including order and trade types, fixed-point monetary values, and the
//! immutable market snapshot handed to agents each day.

use derive_more::{Add, AddAssign, From, Into, Neg, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Mul;

// =============================================================================
// Constants
// =============================================================================

/// Fixed-point scale for Price and Cash types.
/// 10,000 = R$1.00, 15,000 = R$1.50, 100 = R$0.01
pub const PRICE_SCALE: i64 = 10_000;

/// Trading days in one simulated year, used for moving-average windows and
/// volatility annualization.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// The single fund instrument traded in this market.
pub const FII_SYMBOL: &str = "FII";

// =============================================================================
// Core ID Types (Newtypes for type safety)
// =============================================================================

/// Unique identifier for agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent({})", self.0)
    }
}

/// Unique identifier for orders, assigned at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order({})", self.0)
    }
}

/// Unique identifier for trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TradeId(pub u64);

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trade({})", self.0)
    }
}

// =============================================================================
// Symbol & Time Types
// =============================================================================

/// Instrument symbol (a single FII in the base configuration).
pub type Symbol = String;

/// Simulated trading day number (1-based once the loop starts).
pub type Day = u64;

// =============================================================================
// Quantity Type (Newtype for shares)
// =============================================================================

/// Number of fund shares ("cotas").
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
)]
pub struct Quantity(pub u64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    /// Get raw value.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }

    /// Check if zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating subtraction.
    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Quantity(self.0.saturating_sub(rhs.0))
    }

    /// Minimum of two quantities.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Quantity(self.0.min(other.0))
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Qty({})", self.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Allow `quantity == 50` comparisons
impl PartialEq<u64> for Quantity {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Fixed-Point Monetary Types
// =============================================================================

/// Fixed-point price with 4 decimal places.
///
/// # Examples
/// - `Price(10000)` = R$1.00
/// - `Price(15000)` = R$1.50
/// - `Price(100)` = R$0.01
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    From,
    Into,
)]
pub struct Price(pub i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Create a Price from a floating-point value.
    #[inline]
    pub fn from_float(v: f64) -> Self {
        Self((v * PRICE_SCALE as f64).round() as i64)
    }

    /// Convert to floating-point for display/calculations.
    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// Raw internal value.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Check if price is positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Midpoint of two prices, the double-auction execution price.
    #[inline]
    pub fn midpoint(a: Price, b: Price) -> Price {
        Price((a.0 + b.0) / 2)
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Price(R${:.4})", self.to_float())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R${:.4}", self.to_float())
    }
}

/// Fixed-point cash/money with 4 decimal places.
///
/// Semantically identical to Price but represents account balances.
/// Balances may go negative: buy orders are sized against the market price
/// but execute at the auction midpoint, which can land above it.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    Sub,
    Neg,
    AddAssign,
    SubAssign,
    Sum,
    From,
    Into,
)]
pub struct Cash(pub i64);

impl Cash {
    pub const ZERO: Cash = Cash(0);

    /// Create Cash from a floating-point value.
    #[inline]
    pub fn from_float(v: f64) -> Self {
        Self((v * PRICE_SCALE as f64).round() as i64)
    }

    /// Convert to floating-point for display/calculations.
    #[inline]
    pub fn to_float(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }

    /// Raw internal value.
    #[inline]
    pub fn raw(self) -> i64 {
        self.0
    }

    /// Check if cash is positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Check if cash is negative.
    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Debug for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cash(R${:.4})", self.to_float())
    }
}

impl fmt::Display for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R${:.4}", self.to_float())
    }
}

// =============================================================================
// Price-Quantity Operations
// =============================================================================

impl Mul<Quantity> for Price {
    type Output = Cash;

    /// Multiply price by quantity to get total cash value.
    fn mul(self, qty: Quantity) -> Cash {
        Cash(self.0 * qty.0 as i64)
    }
}

impl Mul<Price> for Quantity {
    type Output = Cash;

    fn mul(self, price: Price) -> Cash {
        Cash(price.0 * self.0 as i64)
    }
}

// =============================================================================
// Order Types
// =============================================================================

/// Which side of the market the order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// A limit order submitted by an agent for one trading day.
///
/// Orders are ephemeral: created during the submission pass, consumed by the
/// matching pass, and never carried across days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier (assigned by the book, 0 as placeholder).
    pub id: OrderId,
    /// Agent who submitted the order.
    pub agent_id: AgentId,
    /// Instrument being traded.
    pub symbol: Symbol,
    /// Buy or Sell.
    pub side: OrderSide,
    /// Limit price (must be positive).
    pub limit_price: Price,
    /// Number of shares.
    pub quantity: Quantity,
    /// Remaining quantity (for partial fills).
    pub remaining_quantity: Quantity,
}

impl Order {
    /// Create a new limit order.
    pub fn new(
        agent_id: AgentId,
        symbol: impl Into<Symbol>,
        side: OrderSide,
        limit_price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id: OrderId(0), // Placeholder, assigned at submission
            agent_id,
            symbol: symbol.into(),
            side,
            limit_price,
            quantity,
            remaining_quantity: quantity,
        }
    }

    /// Check if order is fully filled.
    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    /// Check if order is a buy order.
    pub fn is_buy(&self) -> bool {
        self.side == OrderSide::Buy
    }

    /// Check if order is a sell order.
    pub fn is_sell(&self) -> bool {
        self.side == OrderSide::Sell
    }
}

// =============================================================================
// Trade Types
// =============================================================================

/// A completed trade between two agents.
///
/// Settlement is atomic: buyer and seller cash/holdings move together as one
/// zero-sum transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier.
    pub id: TradeId,
    /// Instrument traded.
    pub symbol: Symbol,
    /// Agent who bought.
    pub buyer_id: AgentId,
    /// Agent who sold.
    pub seller_id: AgentId,
    /// Execution price (midpoint of the matched limits).
    pub price: Price,
    /// Number of shares traded.
    pub quantity: Quantity,
    /// Trading day on which the trade occurred.
    pub day: Day,
}

impl Trade {
    /// Calculate the total value of this trade.
    pub fn value(&self) -> Cash {
        self.price * self.quantity
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade[{}]: {} {} shares @ {} (buyer: {}, seller: {})",
            self.id, self.symbol, self.quantity, self.price, self.buyer_id, self.seller_id
        )
    }
}

// =============================================================================
// Market Snapshot
// =============================================================================

/// Read-only view of market and macro state handed to every agent task.
///
/// Built once per day before the parallel update stage and never mutated
/// while the stage runs, so all agents observe the same state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Last traded price of the fund share.
    pub last_price: Price,
    /// Trailing annualized volatility estimate.
    pub historical_volatility: f64,
    /// Current media sentiment-shock value.
    pub news: f64,
    /// Last dividend distributed per share.
    pub dividend_per_share: f64,
    /// Central-bank inflation expectation.
    pub expected_inflation: f64,
    /// Central-bank risk premium.
    pub risk_premium: f64,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_from_float() {
        assert_eq!(Price::from_float(1.0), Price(10_000));
        assert_eq!(Price::from_float(1.50), Price(15_000));
        assert_eq!(Price::from_float(0.01), Price(100));
        assert_eq!(Price::from_float(100.0), Price(1_000_000));
    }

    #[test]
    fn test_price_to_float() {
        assert!((Price(10_000).to_float() - 1.0).abs() < 1e-10);
        assert!((Price(15_000).to_float() - 1.50).abs() < 1e-10);
        assert!((Price(100).to_float() - 0.01).abs() < 1e-10);
    }

    #[test]
    fn test_price_arithmetic() {
        let p1 = Price::from_float(10.0);
        let p2 = Price::from_float(3.5);

        assert_eq!((p1 + p2).to_float(), 13.5);
        assert_eq!((p1 - p2).to_float(), 6.5);
    }

    #[test]
    fn test_price_midpoint() {
        let buy = Price::from_float(10.0);
        let sell = Price::from_float(9.0);
        assert_eq!(Price::midpoint(buy, sell), Price::from_float(9.5));
    }

    #[test]
    fn test_price_quantity_multiplication() {
        let price = Price::from_float(50.0);
        let quantity = Quantity(100);

        let total = price * quantity;
        assert_eq!(total.to_float(), 5000.0);
    }

    #[test]
    fn test_cash_operations() {
        let c1 = Cash::from_float(1000.0);
        let c2 = Cash::from_float(250.0);

        assert_eq!((c1 - c2).to_float(), 750.0);
        assert!(c1.is_positive());
        assert!(!c1.is_negative());
    }

    #[test]
    fn test_order_side_opposite() {
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.opposite(), OrderSide::Buy);
    }

    #[test]
    fn test_order_creation() {
        let order = Order::new(
            AgentId(1),
            FII_SYMBOL,
            OrderSide::Buy,
            Price::from_float(150.0),
            Quantity(100),
        );

        assert_eq!(order.agent_id, AgentId(1));
        assert_eq!(order.symbol, FII_SYMBOL);
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.limit_price, Price::from_float(150.0));
        assert_eq!(order.quantity, 100);
        assert!(!order.is_filled());
        assert!(order.is_buy());
    }

    #[test]
    fn test_trade_value() {
        let trade = Trade {
            id: TradeId(1),
            symbol: FII_SYMBOL.to_string(),
            buyer_id: AgentId(1),
            seller_id: AgentId(2),
            price: Price::from_float(150.0),
            quantity: Quantity(100),
            day: 1,
        };

        assert_eq!(trade.value().to_float(), 15000.0);
    }
}
