//! Order generation: one optional order per agent per day.
//!
//! Runs in the sequential submission pass, after the update stage has
//! merged the day's expected prices. Buys are sized against available cash
//! at the market price; sells are capped at a configured fraction of the
//! holding. The limit price is a convex blend of the market and expected
//! prices.

use rand::Rng;

use types::{Cash, Order, OrderSide, Price};

use crate::config::SentimentParams;
use crate::state::Investor;

/// Generate the agent's order for the day, if any.
///
/// No order is produced when the market price is non-positive, when market
/// and expected price coincide, or when the side's preconditions (cash for
/// buys, inventory for sells) fail.
pub fn generate_order<R: Rng>(
    investor: &Investor,
    symbol: &str,
    market_price: Price,
    params: &SentimentParams,
    rng: &mut R,
) -> Option<Order> {
    if !market_price.is_positive() {
        return None;
    }

    let market = market_price.to_float();
    let expected = investor.expected_price();

    if market < expected {
        buy_order(investor, symbol, market, expected, params, rng)
    } else if market > expected {
        sell_order(investor, symbol, market, expected, params, rng)
    } else {
        None
    }
}

fn buy_order<R: Rng>(
    investor: &Investor,
    symbol: &str,
    market: f64,
    expected: f64,
    params: &SentimentParams,
    rng: &mut R,
) -> Option<Order> {
    if investor.cash() <= Cash::ZERO {
        return None;
    }

    let lo = params.buy_quantity_min.max(1);
    let hi = params.buy_quantity_max.max(lo);
    let desired = rng.gen_range(lo..=hi);

    // Down-size so the cost at the market price fits available cash.
    let affordable = (investor.cash().to_float() / market).floor() as u64;
    let quantity = desired.min(affordable);
    if quantity == 0 {
        return None;
    }

    let limit = limit_price(market, expected, params.expected_price_weight)?;
    Some(Order::new(
        investor.id(),
        symbol,
        OrderSide::Buy,
        limit,
        quantity.into(),
    ))
}

fn sell_order<R: Rng>(
    investor: &Investor,
    symbol: &str,
    market: f64,
    expected: f64,
    params: &SentimentParams,
    rng: &mut R,
) -> Option<Order> {
    let held = investor.holdings_of(symbol);
    if held == 0 {
        return None;
    }

    let divisor = params.sell_quantity_divisor.max(1);
    let max_quantity = (held / divisor).max(1);
    let quantity = rng.gen_range(1..=max_quantity);

    let limit = limit_price(market, expected, params.expected_price_weight)?;
    Some(Order::new(
        investor.id(),
        symbol,
        OrderSide::Sell,
        limit,
        quantity.into(),
    ))
}

/// Convex blend of market and expected price; `None` if the blend is not a
/// valid positive limit.
fn limit_price(market: f64, expected: f64, weight: f64) -> Option<Price> {
    let blended = (1.0 - weight) * market + weight * expected;
    if !blended.is_finite() || blended <= 0.0 {
        return None;
    }
    let price = Price::from_float(blended);
    price.is_positive().then_some(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BehaviorConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use types::{AgentId, FII_SYMBOL};

    fn investor_with(cash: f64, shares: u64, expected: f64) -> Investor {
        let mut investor = Investor::new(
            AgentId(1),
            0.5,
            cash,
            FII_SYMBOL,
            shares,
            &[100.0; 30],
            BehaviorConfig::default(),
        );
        investor.apply_update(&crate::decision::AgentUpdate {
            id: AgentId(1),
            sentiment: 0.0,
            risk_decision: 0.0,
            allocation_pct: 0.0,
            expected_price: expected,
        });
        investor
    }

    #[test]
    fn test_buy_when_market_below_expected() {
        let investor = investor_with(100_000.0, 0, 110.0);
        let mut rng = StdRng::seed_from_u64(1);
        let params = SentimentParams::default();

        let order = generate_order(
            &investor,
            FII_SYMBOL,
            Price::from_float(100.0),
            &params,
            &mut rng,
        )
        .expect("cash-rich agent below expectation should buy");

        assert_eq!(order.side, OrderSide::Buy);
        assert!((params.buy_quantity_min..=params.buy_quantity_max)
            .contains(&order.quantity.raw()));
        // Limit is the 0.35-weighted blend of 100 and 110.
        assert_eq!(order.limit_price, Price::from_float(103.5));
    }

    #[test]
    fn test_buy_down_sized_to_cash() {
        // Cash covers only 3 shares at the market price.
        let investor = investor_with(350.0, 0, 200.0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut params = SentimentParams::default();
        params.buy_quantity_min = 10;
        params.buy_quantity_max = 30;

        let order = generate_order(
            &investor,
            FII_SYMBOL,
            Price::from_float(100.0),
            &params,
            &mut rng,
        )
        .unwrap();

        assert_eq!(order.quantity, types::Quantity(3));
    }

    #[test]
    fn test_no_buy_when_broke() {
        let investor = investor_with(50.0, 0, 200.0);
        let mut rng = StdRng::seed_from_u64(3);

        let order = generate_order(
            &investor,
            FII_SYMBOL,
            Price::from_float(100.0),
            &SentimentParams::default(),
            &mut rng,
        );
        assert!(order.is_none());
    }

    #[test]
    fn test_sell_when_market_above_expected() {
        let investor = investor_with(0.0, 50, 90.0);
        let mut rng = StdRng::seed_from_u64(4);
        let params = SentimentParams::default();

        let order = generate_order(
            &investor,
            FII_SYMBOL,
            Price::from_float(100.0),
            &params,
            &mut rng,
        )
        .expect("holder above expectation should sell");

        assert_eq!(order.side, OrderSide::Sell);
        // Capped at holdings / divisor = 10.
        assert!((1..=10).contains(&order.quantity.raw()));
        assert_eq!(order.limit_price, Price::from_float(96.5));
    }

    #[test]
    fn test_small_holder_still_sells_one() {
        // 2 shares with divisor 5 floors the cap at 1.
        let investor = investor_with(0.0, 2, 90.0);
        let mut rng = StdRng::seed_from_u64(5);

        let order = generate_order(
            &investor,
            FII_SYMBOL,
            Price::from_float(100.0),
            &SentimentParams::default(),
            &mut rng,
        )
        .unwrap();
        assert_eq!(order.quantity, types::Quantity(1));
    }

    #[test]
    fn test_no_sell_without_inventory() {
        let investor = investor_with(1_000.0, 0, 90.0);
        let mut rng = StdRng::seed_from_u64(6);

        let order = generate_order(
            &investor,
            FII_SYMBOL,
            Price::from_float(100.0),
            &SentimentParams::default(),
            &mut rng,
        );
        assert!(order.is_none());
    }

    #[test]
    fn test_no_order_at_expectation_parity() {
        let investor = investor_with(1_000.0, 50, 100.0);
        let mut rng = StdRng::seed_from_u64(7);

        let order = generate_order(
            &investor,
            FII_SYMBOL,
            Price::from_float(100.0),
            &SentimentParams::default(),
            &mut rng,
        );
        assert!(order.is_none());
    }

    #[test]
    fn test_no_order_on_non_positive_market_price() {
        let investor = investor_with(1_000.0, 50, 100.0);
        let mut rng = StdRng::seed_from_u64(8);

        let order = generate_order(
            &investor,
            FII_SYMBOL,
            Price::ZERO,
            &SentimentParams::default(),
            &mut rng,
        );
        assert!(order.is_none());
    }
}
