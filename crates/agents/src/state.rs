//! Investor state and the registry that owns it.
//!
//! Investors are owned by the orchestrator through [`InvestorRegistry`] and
//! mutated only between days, never during the parallel stage. Neighbor
//! relations are stored as IDs and resolved through the registry at read
//! time, so there are no ownership cycles.

use std::collections::HashMap;

use types::{AgentId, Cash, Symbol, Trade};

use crate::config::BehaviorConfig;
use crate::decision::AgentUpdate;

/// One heterogeneous investor.
#[derive(Debug, Clone)]
pub struct Investor {
    /// Identity, unique within the registry.
    id: AgentId,
    /// Financial-literacy coefficient in [0, 1].
    literacy: f64,
    /// Cash balance. May go negative: buys are sized against the market
    /// price but execute at the auction midpoint.
    cash: Cash,
    /// Share holdings per instrument.
    holdings: HashMap<Symbol, u64>,
    /// Current sentiment in [-1, 1].
    sentiment: f64,
    /// Risk decision `(sentiment + 1) / 2 * volatility`.
    risk_decision: f64,
    /// Allocation percentage derived from the risk decision.
    allocation_pct: f64,
    /// Expected price from the latest update stage.
    expected_price: f64,
    /// Daily participation probability, fixed at setup from literacy.
    participation_prob: f64,
    /// Observed price history, appended once per day.
    price_history: Vec<f64>,
    /// Own wealth history, appended once per day.
    wealth_history: Vec<f64>,
    /// Sentiment history, appended on each successful update.
    sentiment_history: Vec<f64>,
    /// Neighbor IDs, assigned once at setup and immutable thereafter.
    neighbors: Vec<AgentId>,
    /// Behavioral parameter bundle.
    behavior: BehaviorConfig,
}

impl Investor {
    /// Create an investor with its initial endowment and the shared seed
    /// price history.
    pub fn new(
        id: AgentId,
        literacy: f64,
        initial_cash: f64,
        symbol: impl Into<Symbol>,
        shares: u64,
        seed_prices: &[f64],
        behavior: BehaviorConfig,
    ) -> Self {
        let last_price = seed_prices.last().copied().unwrap_or(0.0);
        let initial_wealth = initial_cash + shares as f64 * last_price;
        let participation_prob = (behavior.participation_floor
            + behavior.participation_literacy_factor * (1.0 - literacy).powi(2))
        .clamp(0.1, 1.0);

        let mut holdings = HashMap::new();
        holdings.insert(symbol.into(), shares);

        Self {
            id,
            literacy,
            cash: Cash::from_float(initial_cash),
            holdings,
            sentiment: 0.0,
            risk_decision: 0.0,
            allocation_pct: 0.0,
            expected_price: 0.0,
            participation_prob,
            // Seeded to the price history's length so the two stay in
            // lockstep after every day.
            price_history: seed_prices.to_vec(),
            wealth_history: vec![initial_wealth; seed_prices.len().max(1)],
            sentiment_history: Vec::new(),
            neighbors: Vec::new(),
            behavior,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn literacy(&self) -> f64 {
        self.literacy
    }

    pub fn cash(&self) -> Cash {
        self.cash
    }

    /// Shares held of an instrument.
    pub fn holdings_of(&self, symbol: &str) -> u64 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn sentiment(&self) -> f64 {
        self.sentiment
    }

    pub fn risk_decision(&self) -> f64 {
        self.risk_decision
    }

    pub fn allocation_pct(&self) -> f64 {
        self.allocation_pct
    }

    pub fn expected_price(&self) -> f64 {
        self.expected_price
    }

    pub fn participation_prob(&self) -> f64 {
        self.participation_prob
    }

    pub fn price_history(&self) -> &[f64] {
        &self.price_history
    }

    pub fn wealth_history(&self) -> &[f64] {
        &self.wealth_history
    }

    pub fn sentiment_history(&self) -> &[f64] {
        &self.sentiment_history
    }

    pub fn neighbors(&self) -> &[AgentId] {
        &self.neighbors
    }

    pub fn behavior(&self) -> &BehaviorConfig {
        &self.behavior
    }

    /// Assign the fixed neighbor set. Called once at setup.
    pub fn set_neighbors(&mut self, neighbors: Vec<AgentId>) {
        self.neighbors = neighbors;
    }

    /// Credit a dividend payment.
    pub fn credit(&mut self, amount: Cash) {
        self.cash += amount;
    }

    /// Merge one day's update-stage result into the canonical state.
    pub fn apply_update(&mut self, update: &AgentUpdate) {
        self.sentiment = update.sentiment;
        self.sentiment_history.push(update.sentiment);
        self.risk_decision = update.risk_decision;
        self.allocation_pct = update.allocation_pct;
        self.expected_price = update.expected_price;
    }

    /// Append the day's closing price and the resulting wealth.
    ///
    /// Keeps `price_history` and `wealth_history` in lockstep.
    pub fn record_day(&mut self, price: f64) {
        let shares: u64 = self.holdings.values().sum();
        let wealth = self.cash.to_float() + shares as f64 * price;
        self.price_history.push(price);
        self.wealth_history.push(wealth);
    }

    /// Current wealth at a given price.
    pub fn wealth_at(&self, price: f64) -> f64 {
        let shares: u64 = self.holdings.values().sum();
        self.cash.to_float() + shares as f64 * price
    }

    fn add_shares(&mut self, symbol: &str, quantity: u64) {
        *self.holdings.entry(symbol.to_string()).or_insert(0) += quantity;
    }

    fn remove_shares(&mut self, symbol: &str, quantity: u64) {
        if let Some(held) = self.holdings.get_mut(symbol) {
            *held = held.saturating_sub(quantity);
        }
    }
}

/// Owner of the full investor roster, indexed by agent ID.
#[derive(Debug, Clone, Default)]
pub struct InvestorRegistry {
    investors: Vec<Investor>,
    index: HashMap<AgentId, usize>,
}

impl InvestorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an investor to the roster.
    pub fn push(&mut self, investor: Investor) {
        self.index.insert(investor.id(), self.investors.len());
        self.investors.push(investor);
    }

    pub fn len(&self) -> usize {
        self.investors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.investors.is_empty()
    }

    pub fn get(&self, id: AgentId) -> Option<&Investor> {
        self.index.get(&id).map(|&i| &self.investors[i])
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Investor> {
        self.index.get(&id).copied().map(|i| &mut self.investors[i])
    }

    /// Iterate the roster in insertion order (the deterministic pass order).
    pub fn iter(&self) -> impl Iterator<Item = &Investor> {
        self.investors.iter()
    }

    /// Mutable iteration in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Investor> {
        self.investors.iter_mut()
    }

    /// Resolve an investor's neighbors to their current sentiment values.
    ///
    /// Unknown IDs contribute nothing; non-finite sentiments are passed
    /// through for the decision model to sanitize.
    pub fn neighbor_sentiments(&self, id: AgentId) -> Vec<f64> {
        let Some(investor) = self.get(id) else {
            return Vec::new();
        };
        investor
            .neighbors()
            .iter()
            .filter_map(|n| self.get(*n).map(Investor::sentiment))
            .collect()
    }

    /// Mean sentiment across the roster (0 when empty).
    pub fn mean_sentiment(&self) -> f64 {
        if self.investors.is_empty() {
            return 0.0;
        }
        self.investors.iter().map(Investor::sentiment).sum::<f64>() / self.investors.len() as f64
    }

    /// Total cash across the roster.
    pub fn total_cash(&self) -> Cash {
        self.investors.iter().map(Investor::cash).sum()
    }

    /// Total shares of an instrument across the roster.
    pub fn total_shares(&self, symbol: &str) -> u64 {
        self.investors.iter().map(|i| i.holdings_of(symbol)).sum()
    }

    /// Settle a trade: move cash and shares between buyer and seller as one
    /// atomic transfer. Both sides are updated or neither.
    pub fn apply_trade(&mut self, trade: &Trade) {
        if trade.buyer_id == trade.seller_id {
            return;
        }
        let (Some(&buyer_at), Some(&seller_at)) = (
            self.index.get(&trade.buyer_id),
            self.index.get(&trade.seller_id),
        ) else {
            return;
        };

        let value = trade.value();
        let quantity = trade.quantity.raw();

        let buyer = &mut self.investors[buyer_at];
        buyer.cash -= value;
        buyer.add_shares(&trade.symbol, quantity);

        let seller = &mut self.investors[seller_at];
        seller.cash += value;
        seller.remove_shares(&trade.symbol, quantity);
    }
}
