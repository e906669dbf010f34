//! The per-agent decision model.
//!
//! Pure functions mapping an agent's state plus the day's immutable market
//! snapshot to an expected price, a sentiment, and a risk/allocation
//! decision. Everything here runs inside the parallel update stage, so the
//! inputs are value snapshots and the only mutation is through the returned
//! [`AgentUpdate`] record.

use std::fmt;

use rand::Rng;
use rand_distr::{Distribution, Normal};

use types::{AgentId, MarketSnapshot};

use crate::config::{BehaviorConfig, SentimentParams};

/// Result record produced per agent by the update stage and merged back
/// into the canonical state after the fan-in barrier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentUpdate {
    /// Agent this update belongs to.
    pub id: AgentId,
    /// New sentiment, in [-1, 1].
    pub sentiment: f64,
    /// Risk decision `(sentiment + 1) / 2 * volatility`.
    pub risk_decision: f64,
    /// Allocation percentage (`risk_decision / volatility` when volatility
    /// is positive, else 0).
    pub allocation_pct: f64,
    /// Expected price used by the order-generation pass.
    pub expected_price: f64,
}

/// Failure of one agent's daily computation.
///
/// Recovered locally: the orchestrator drops the update, keeps the agent's
/// prior state, and logs a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    /// The agent has no price history to anchor expectations on.
    EmptyPriceHistory,
    /// A computed value left the representable range.
    NonFinite(&'static str),
}

impl fmt::Display for DecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionError::EmptyPriceHistory => write!(f, "agent has no price history"),
            DecisionError::NonFinite(what) => write!(f, "{what} is not finite"),
        }
    }
}

impl std::error::Error for DecisionError {}

/// Borrowed inputs of one agent's daily computation.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInputs<'a> {
    /// Financial-literacy coefficient in [0, 1].
    pub literacy: f64,
    /// Sentiment carried over from the previous day.
    pub prev_sentiment: f64,
    /// Own observed price history.
    pub price_history: &'a [f64],
    /// Own wealth history.
    pub wealth_history: &'a [f64],
    /// Neighbor sentiments, frozen before the stage started.
    pub neighbor_sentiments: &'a [f64],
    /// The day's immutable market/macro snapshot.
    pub snapshot: &'a MarketSnapshot,
    /// Behavioral weights.
    pub behavior: &'a BehaviorConfig,
    /// Global sentiment-formula parameters.
    pub params: &'a SentimentParams,
}

/// Output of one agent's daily computation, before being stamped with the
/// agent's identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionOutput {
    pub expected_price: f64,
    pub private_signal: f64,
    pub social_signal: f64,
    pub sentiment: f64,
    pub risk_decision: f64,
    pub allocation_pct: f64,
}

/// The convex (unclamped) blend weights of the expected-price model:
/// `x = lf / e^beta`, `z = (1 - beta)(1 - lf)`, `y = 1 - x - z`.
///
/// The weights always sum to 1 but are deliberately not clamped to [0, 1];
/// extreme `beta`/literacy pairs can push individual terms negative.
pub fn blend_weights(literacy: f64, beta: f64) -> (f64, f64, f64) {
    let x = literacy / beta.exp();
    let z = (1.0 - beta) * (1.0 - literacy);
    let y = 1.0 - x - z;
    (x, y, z)
}

/// Expected price via the three-term blend of fundamentalist, chartist, and
/// noise returns. Returns 0 when the last observed price is non-positive.
pub fn expected_price<R: Rng>(
    literacy: f64,
    beta: f64,
    dividend: f64,
    prices: &[f64],
    expected_inflation: f64,
    risk_premium: f64,
    behavior: &BehaviorConfig,
    rng: &mut R,
) -> f64 {
    let (x, y, z) = blend_weights(literacy, beta);
    let last = prices.last().copied().unwrap_or(0.0);

    // Fundamentalist: log-distance to the dividend-discount fair price.
    let fair_price = if risk_premium > 0.0 {
        dividend * 12.0 * (1.0 + expected_inflation) / risk_premium
    } else {
        0.0
    };
    let fundamental_return = if last > 0.0 && fair_price > 0.0 {
        fair_price.ln() - last.ln()
    } else {
        0.0
    };

    // Chartist: log-ratio of the short to the long moving average.
    let (short_avg, long_avg) = quant::technical_averages(
        prices,
        literacy,
        behavior.moving_average,
        behavior.trading_days,
        behavior.short_window_divisor,
    );
    let chartist_return = if long_avg > 0.0 {
        (short_avg / long_avg).ln()
    } else {
        0.0
    };

    let noise_return = Normal::new(0.0, behavior.expected_price_noise_std)
        .map(|dist| dist.sample(rng))
        .unwrap_or(0.0);

    let blended = x * fundamental_return + y * chartist_return + z * noise_return;
    if last > 0.0 { last * blended.exp() } else { 0.0 }
}

/// Private signal: weighted blend of the expected log-return and the
/// relative wealth change over the configured lookback, plus noise.
pub fn private_signal<R: Rng>(
    expected: f64,
    current: f64,
    wealth_history: &[f64],
    behavior: &BehaviorConfig,
    rng: &mut R,
) -> f64 {
    let return_component = if current > 0.0 && expected > 0.0 {
        (expected / current).ln()
    } else {
        0.0
    };

    let n = behavior.wealth_lookback;
    let wealth_component = if wealth_history.len() >= n && n > 0 {
        let base = wealth_history[wealth_history.len() - n];
        let latest = wealth_history[wealth_history.len() - 1];
        if base != 0.0 { (latest - base) / base } else { 0.0 }
    } else {
        0.0
    };

    let noise = Normal::new(0.0, behavior.private_noise_std)
        .map(|dist| dist.sample(rng))
        .unwrap_or(0.0);

    behavior.private_return_weight * return_component
        + behavior.private_wealth_weight * wealth_component
        + noise
}

/// Social signal: arithmetic mean of neighbor sentiments with non-finite
/// inputs sanitized to 0. Returns 0 with no neighbors.
pub fn social_signal(neighbor_sentiments: &[f64]) -> f64 {
    if neighbor_sentiments.is_empty() {
        return 0.0;
    }
    let sum: f64 = neighbor_sentiments
        .iter()
        .map(|s| if s.is_finite() { *s } else { 0.0 })
        .sum();
    sum / neighbor_sentiments.len() as f64
}

/// Sentiment blend, clamped to [-1, 1]. The coefficients are global and not
/// required to sum to 1.
pub fn sentiment(
    params: &SentimentParams,
    literacy: f64,
    private: f64,
    social: f64,
    news: f64,
) -> f64 {
    let raw = params.a0 * literacy * private
        + params.b0 * (1.0 - literacy) * social
        + params.c0 * (1.0 - literacy) * news;
    raw.clamp(-1.0, 1.0)
}

/// Risk decision and allocation percentage.
///
/// `RD = (sentiment + 1) / 2 * volatility`; the allocation divides the
/// volatility right back out, so it reduces to `(sentiment + 1) / 2`
/// whenever volatility is positive (see DESIGN.md).
pub fn risk_allocation(sentiment: f64, volatility: f64) -> (f64, f64) {
    let risk_decision = (sentiment + 1.0) / 2.0 * volatility;
    let allocation_pct = if volatility > 0.0 {
        risk_decision / volatility
    } else {
        0.0
    };
    (risk_decision, allocation_pct)
}

/// Run the full daily computation for one agent.
///
/// The previous sentiment tilts the macro expectations before the
/// fundamental anchor is computed: `infl' = infl * (1 - s * w_i)` and
/// `prem' = prem * (1 - s * w_p)`.
pub fn evaluate<R: Rng>(inputs: &DecisionInputs<'_>, rng: &mut R) -> Result<DecisionOutput, DecisionError> {
    if inputs.price_history.is_empty() {
        return Err(DecisionError::EmptyPriceHistory);
    }

    let snapshot = inputs.snapshot;
    let params = inputs.params;

    let tilted_inflation = snapshot.expected_inflation
        * (1.0 - inputs.prev_sentiment * params.inflation_sentiment_weight);
    let tilted_premium =
        snapshot.risk_premium * (1.0 - inputs.prev_sentiment * params.premium_sentiment_weight);

    let expected = expected_price(
        inputs.literacy,
        params.beta,
        snapshot.dividend_per_share,
        inputs.price_history,
        tilted_inflation,
        tilted_premium,
        inputs.behavior,
        rng,
    );
    if !expected.is_finite() {
        return Err(DecisionError::NonFinite("expected price"));
    }

    let current = inputs.price_history[inputs.price_history.len() - 1];
    let private = private_signal(expected, current, inputs.wealth_history, inputs.behavior, rng);
    if !private.is_finite() {
        return Err(DecisionError::NonFinite("private signal"));
    }

    let social = social_signal(inputs.neighbor_sentiments);
    let sentiment = sentiment(params, inputs.literacy, private, social, snapshot.news);
    let (risk_decision, allocation_pct) =
        risk_allocation(sentiment, snapshot.historical_volatility);

    Ok(DecisionOutput {
        expected_price: expected,
        private_signal: private,
        social_signal: social,
        sentiment,
        risk_decision,
        allocation_pct,
    })
}
