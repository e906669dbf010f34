//! Order book implementation for the daily double auction.
//!
//! Buy and sell orders accumulate per instrument during the submission
//! pass. The matching pass sorts buys by limit descending and sells by
//! limit ascending (stable, so equal prices keep submission order), then
//! repeatedly crosses the best pair at the midpoint of their limits until
//! no cross remains. Partially filled orders stay queued until the book is
//! discarded at day end.

use std::collections::HashMap;

use types::{Day, Order, OrderId, OrderSide, Price, Quantity, Symbol, Trade, TradeId};

use crate::error::{Result, SimCoreError};

/// Lifecycle phase of a one-day order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookPhase {
    /// Freshly created, no orders yet.
    #[default]
    Empty,
    /// Accepting order submissions.
    Accepting,
    /// Matching pass in progress.
    Matching,
    /// Matching done; the book only serves reads until discarded.
    Drained,
}

/// Result of one instrument's matching pass.
#[derive(Debug, Clone, Default)]
pub struct AuctionResult {
    /// Executed trades, in match order.
    pub trades: Vec<Trade>,
    /// Price of the last execution, the instrument's new traded price.
    pub clearing_price: Option<Price>,
}

impl AuctionResult {
    /// Check if any trades occurred.
    pub fn has_trades(&self) -> bool {
        !self.trades.is_empty()
    }

    /// Total quantity traded.
    pub fn volume(&self) -> Quantity {
        self.trades.iter().map(|t| t.quantity).sum()
    }
}

/// Order book for one trading day.
#[derive(Debug, Clone)]
pub struct OrderBook {
    /// Lifecycle phase.
    phase: BookPhase,
    /// Buy orders per instrument, in submission order until matched.
    buys: HashMap<Symbol, Vec<Order>>,
    /// Sell orders per instrument, in submission order until matched.
    sells: HashMap<Symbol, Vec<Order>>,
    /// Counter for order IDs (doubles as the submission sequence).
    next_order_id: u64,
    /// Counter for trade IDs.
    next_trade_id: u64,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create a new empty book.
    pub fn new() -> Self {
        Self {
            phase: BookPhase::Empty,
            buys: HashMap::new(),
            sells: HashMap::new(),
            next_order_id: 1,
            next_trade_id: 1,
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> BookPhase {
        self.phase
    }

    /// Submit an order to the book.
    ///
    /// Only valid while the book is empty or accepting; the first
    /// submission moves the book into the accepting phase.
    pub fn submit(&mut self, mut order: Order) -> Result<OrderId> {
        match self.phase {
            BookPhase::Empty | BookPhase::Accepting => {}
            phase => return Err(SimCoreError::BookClosed(phase)),
        }

        if order.remaining_quantity.is_zero() {
            return Err(SimCoreError::ZeroQuantity);
        }
        if !order.limit_price.is_positive() {
            return Err(SimCoreError::InvalidLimit);
        }

        self.phase = BookPhase::Accepting;

        let id = OrderId(self.next_order_id);
        self.next_order_id += 1;
        order.id = id;

        let side = match order.side {
            OrderSide::Buy => &mut self.buys,
            OrderSide::Sell => &mut self.sells,
        };
        side.entry(order.symbol.clone()).or_default().push(order);

        Ok(id)
    }

    /// Run the matching pass for one instrument.
    ///
    /// Buys are sorted by limit descending, sells ascending (stable sorts,
    /// so equal limits keep submission order). The best pair executes at the
    /// midpoint of the two limits for the minimum of the remaining
    /// quantities; fully filled orders drop off their queue. Matching stops
    /// when either side empties or the best buy no longer reaches the best
    /// sell — no liquidity is a normal outcome, not an error.
    ///
    /// Transitions the book into the drained phase; later submissions are
    /// rejected. Unfilled remainders stay readable until the book is
    /// discarded.
    pub fn execute(&mut self, symbol: &str, day: Day) -> AuctionResult {
        self.phase = BookPhase::Matching;

        let mut buys = self.buys.remove(symbol).unwrap_or_default();
        let mut sells = self.sells.remove(symbol).unwrap_or_default();

        buys.sort_by(|a, b| b.limit_price.cmp(&a.limit_price));
        sells.sort_by(|a, b| a.limit_price.cmp(&b.limit_price));

        let mut result = AuctionResult::default();
        let mut buy_at = 0;
        let mut sell_at = 0;

        while buy_at < buys.len() && sell_at < sells.len() {
            let best_buy = &buys[buy_at];
            let best_sell = &sells[sell_at];

            if best_buy.limit_price < best_sell.limit_price {
                break; // No further cross possible today.
            }

            let price = Price::midpoint(best_buy.limit_price, best_sell.limit_price);
            let quantity = best_buy.remaining_quantity.min(best_sell.remaining_quantity);

            result.trades.push(Trade {
                id: TradeId(self.next_trade_id),
                symbol: symbol.to_string(),
                buyer_id: best_buy.agent_id,
                seller_id: best_sell.agent_id,
                price,
                quantity,
                day,
            });
            self.next_trade_id += 1;
            result.clearing_price = Some(price);

            buys[buy_at].remaining_quantity -= quantity;
            sells[sell_at].remaining_quantity -= quantity;

            if buys[buy_at].remaining_quantity.is_zero() {
                buy_at += 1;
            }
            if sells[sell_at].remaining_quantity.is_zero() {
                sell_at += 1;
            }
        }

        // Keep unfilled remainders readable until the book is dropped.
        buys.retain(|o| !o.remaining_quantity.is_zero());
        sells.retain(|o| !o.remaining_quantity.is_zero());
        if !buys.is_empty() {
            self.buys.insert(symbol.to_string(), buys);
        }
        if !sells.is_empty() {
            self.sells.insert(symbol.to_string(), sells);
        }

        self.phase = BookPhase::Drained;
        result
    }

    /// Resting buy orders for an instrument (post-match: unfilled remainders).
    pub fn resting_buys(&self, symbol: &str) -> &[Order] {
        self.buys.get(symbol).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Resting sell orders for an instrument (post-match: unfilled remainders).
    pub fn resting_sells(&self, symbol: &str) -> &[Order] {
        self.sells.get(symbol).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Total number of resting orders across all instruments.
    pub fn order_count(&self) -> usize {
        self.buys.values().map(Vec::len).sum::<usize>()
            + self.sells.values().map(Vec::len).sum::<usize>()
    }

    /// Check if the book has any orders.
    pub fn is_empty(&self) -> bool {
        self.order_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{AgentId, FII_SYMBOL};

    fn limit_order(agent: u64, side: OrderSide, price: f64, quantity: u64) -> Order {
        Order::new(
            AgentId(agent),
            FII_SYMBOL,
            side,
            Price::from_float(price),
            Quantity(quantity),
        )
    }

    #[test]
    fn test_new_book_is_empty() {
        let book = OrderBook::new();
        assert!(book.is_empty());
        assert_eq!(book.phase(), BookPhase::Empty);
    }

    #[test]
    fn test_submit_moves_to_accepting() {
        let mut book = OrderBook::new();
        book.submit(limit_order(1, OrderSide::Buy, 100.0, 10)).unwrap();
        assert_eq!(book.phase(), BookPhase::Accepting);
        assert_eq!(book.order_count(), 1);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut book = OrderBook::new();
        let result = book.submit(limit_order(1, OrderSide::Buy, 100.0, 0));
        assert_eq!(result, Err(SimCoreError::ZeroQuantity));
    }

    #[test]
    fn test_non_positive_limit_rejected() {
        let mut book = OrderBook::new();
        let result = book.submit(limit_order(1, OrderSide::Sell, 0.0, 10));
        assert_eq!(result, Err(SimCoreError::InvalidLimit));
    }

    #[test]
    fn test_submit_after_matching_rejected() {
        let mut book = OrderBook::new();
        book.submit(limit_order(1, OrderSide::Buy, 100.0, 10)).unwrap();
        book.execute(FII_SYMBOL, 1);
        assert_eq!(book.phase(), BookPhase::Drained);

        let result = book.submit(limit_order(2, OrderSide::Sell, 99.0, 5));
        assert_eq!(result, Err(SimCoreError::BookClosed(BookPhase::Drained)));
    }

    #[test]
    fn test_partial_fill_scenario() {
        // Buy @10.0 x5 vs sell @9.0 x3: one trade at the 9.5 midpoint for 3,
        // buyer rests with 2, seller removed.
        let mut book = OrderBook::new();
        book.submit(limit_order(1, OrderSide::Buy, 10.0, 5)).unwrap();
        book.submit(limit_order(2, OrderSide::Sell, 9.0, 3)).unwrap();

        let result = book.execute(FII_SYMBOL, 1);

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.price, Price::from_float(9.5));
        assert_eq!(trade.quantity, Quantity(3));
        assert_eq!(trade.buyer_id, AgentId(1));
        assert_eq!(trade.seller_id, AgentId(2));
        assert_eq!(result.clearing_price, Some(Price::from_float(9.5)));

        let resting = book.resting_buys(FII_SYMBOL);
        assert_eq!(resting.len(), 1);
        assert_eq!(resting[0].remaining_quantity, Quantity(2));
        assert!(book.resting_sells(FII_SYMBOL).is_empty());
    }

    #[test]
    fn test_no_cross_no_trades() {
        let mut book = OrderBook::new();
        book.submit(limit_order(1, OrderSide::Buy, 9.0, 5)).unwrap();
        book.submit(limit_order(2, OrderSide::Sell, 10.0, 5)).unwrap();

        let result = book.execute(FII_SYMBOL, 1);

        assert!(!result.has_trades());
        assert_eq!(result.clearing_price, None);
        assert_eq!(book.order_count(), 2);
    }

    #[test]
    fn test_execution_price_is_midpoint() {
        let mut book = OrderBook::new();
        book.submit(limit_order(1, OrderSide::Buy, 102.0, 10)).unwrap();
        book.submit(limit_order(2, OrderSide::Sell, 98.0, 10)).unwrap();

        let result = book.execute(FII_SYMBOL, 1);

        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].price, Price::from_float(100.0));
        // Price within the matched limits.
        assert!(result.trades[0].price <= Price::from_float(102.0));
        assert!(result.trades[0].price >= Price::from_float(98.0));
    }

    #[test]
    fn test_price_priority() {
        let mut book = OrderBook::new();
        book.submit(limit_order(1, OrderSide::Buy, 100.0, 5)).unwrap();
        book.submit(limit_order(2, OrderSide::Buy, 103.0, 5)).unwrap();
        book.submit(limit_order(3, OrderSide::Sell, 101.0, 5)).unwrap();
        book.submit(limit_order(4, OrderSide::Sell, 99.0, 5)).unwrap();

        let result = book.execute(FII_SYMBOL, 1);

        // Best buy (103) crosses best sell (99) at 101; the 100 buy cannot
        // reach the remaining 101 sell.
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].buyer_id, AgentId(2));
        assert_eq!(result.trades[0].seller_id, AgentId(4));
        assert_eq!(result.trades[0].price, Price::from_float(101.0));
    }

    #[test]
    fn test_equal_limits_keep_submission_order() {
        let mut book = OrderBook::new();
        book.submit(limit_order(1, OrderSide::Buy, 100.0, 5)).unwrap();
        book.submit(limit_order(2, OrderSide::Buy, 100.0, 5)).unwrap();
        book.submit(limit_order(3, OrderSide::Sell, 100.0, 5)).unwrap();

        let result = book.execute(FII_SYMBOL, 1);

        // The earlier of the equal-priced buys trades first.
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].buyer_id, AgentId(1));
        assert_eq!(book.resting_buys(FII_SYMBOL)[0].agent_id, AgentId(2));
    }

    #[test]
    fn test_one_order_walks_the_book() {
        let mut book = OrderBook::new();
        book.submit(limit_order(1, OrderSide::Buy, 105.0, 10)).unwrap();
        book.submit(limit_order(2, OrderSide::Sell, 100.0, 4)).unwrap();
        book.submit(limit_order(3, OrderSide::Sell, 102.0, 4)).unwrap();
        book.submit(limit_order(4, OrderSide::Sell, 104.0, 4)).unwrap();

        let result = book.execute(FII_SYMBOL, 1);

        assert_eq!(result.trades.len(), 3);
        assert_eq!(result.trades[0].price, Price::from_float(102.5));
        assert_eq!(result.trades[1].price, Price::from_float(103.5));
        assert_eq!(result.trades[2].price, Price::from_float(104.5));
        // Clearing price is the last execution.
        assert_eq!(result.clearing_price, Some(Price::from_float(104.5)));
        // Buyer filled 10 of 10; last sell order keeps 2.
        assert!(book.resting_buys(FII_SYMBOL).is_empty());
        assert_eq!(book.resting_sells(FII_SYMBOL)[0].remaining_quantity, Quantity(2));
    }

    #[test]
    fn test_matching_terminates_and_never_crosses_backwards() {
        let mut book = OrderBook::new();
        for i in 0..50u64 {
            book.submit(limit_order(i, OrderSide::Buy, 95.0 + (i % 10) as f64, 3))
                .unwrap();
            book.submit(limit_order(100 + i, OrderSide::Sell, 96.0 + (i % 10) as f64, 3))
                .unwrap();
        }

        let result = book.execute(FII_SYMBOL, 1);

        for trade in &result.trades {
            assert!(trade.quantity.raw() > 0);
        }
        // Bounded by total order count: every trade fully fills at least one
        // side, so there can never be more trades than orders.
        assert!(result.trades.len() <= 200);
    }

    #[test]
    fn test_empty_instrument_executes_cleanly() {
        let mut book = OrderBook::new();
        let result = book.execute(FII_SYMBOL, 1);
        assert!(!result.has_trades());
        assert_eq!(book.phase(), BookPhase::Drained);
    }
}
