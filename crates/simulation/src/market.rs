//! The daily orchestrator.
//!
//! [`Market`] owns the investor roster, the fund, the macro collaborators,
//! the master RNG, and the worker pool. [`Market::advance_day`] sequences
//! one trading day in strict order: macro signal, periodic cash-flow
//! events, parallel sentiment/expectation update, probabilistic order
//! submission, auction clearing with settlement, history append, and the
//! volatility recompute.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use agents::{Investor, InvestorRegistry, SentimentParams, sample_literacy};
use fund::{Fund, Property};
use macroenv::{CentralBank, Media, Signal};
use parallel::{PoolError, WorkerPool};
use sim_core::OrderBook;
use types::{Cash, Day, FII_SYMBOL, MarketSnapshot, TRADING_DAYS_PER_YEAR};

use crate::metrics::{AgentReport, DaySummary, FundReport, SimulationResult};
use crate::params::{ConfigError, MarketConfig, SimulationParams};
use crate::stage::run_update_stage;

/// Salt mixed into the master seed for the media outlet's own stream.
const MEDIA_SEED_SALT: u64 = 0x4D45_4449_41;

/// Errors building a market. All fatal before the first day runs.
#[derive(Debug)]
pub enum SetupError {
    /// The configuration bundle failed validation.
    Config(ConfigError),
    /// The worker pool could not be built.
    Pool(PoolError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Config(e) => write!(f, "{e}"),
            SetupError::Pool(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetupError::Config(e) => Some(e),
            SetupError::Pool(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SetupError {
    fn from(e: ConfigError) -> Self {
        SetupError::Config(e)
    }
}

impl From<PoolError> for SetupError {
    fn from(e: PoolError) -> Self {
        SetupError::Pool(e)
    }
}

/// The FII secondary market.
pub struct Market {
    /// Investor roster, mutated only between days.
    registry: InvestorRegistry,
    /// The traded fund.
    fund: Fund,
    /// Macro expectations source.
    central_bank: CentralBank,
    /// Daily news-signal source.
    media: Media,
    /// Global sentiment/order parameters.
    sentiment: SentimentParams,
    /// Market cadences and volatility settings.
    market_config: MarketConfig,
    /// Number of days the run is configured for.
    num_days: u64,
    /// Trailing annualized volatility estimate.
    volatility: f64,
    /// Current news value (last media signal, held after exhaustion).
    news: f64,
    /// News values observed so far.
    news_history: Vec<f64>,
    /// Current day (0 before the first `advance_day`).
    day: Day,
    /// Master seed; per-task streams in the update stage derive from it.
    seed: u64,
    /// Master RNG for setup and the sequential submission pass.
    rng: StdRng,
    /// Worker pool, built once and reused every day; joined on drop.
    pool: WorkerPool,
    /// Trades executed over the run.
    total_trades: u64,
    /// Shares traded over the run.
    total_volume: u64,
    /// Per-agent failures recovered over the run.
    total_failures: u64,
}

impl Market {
    /// Build a market from a validated parameter bundle.
    ///
    /// Validation failures are fatal here, before the first day runs. Setup
    /// draws (literacy sampling, neighbor assignment) come from the master
    /// RNG, so the whole run is reproducible from one seed.
    pub fn new(params: SimulationParams) -> Result<Self, SetupError> {
        params.validate()?;

        let seed = params.general.random_seed;
        let mut rng = StdRng::seed_from_u64(seed);

        // Fund and portfolio, with the flat price pre-history all agents
        // share on day one.
        let mut fund = Fund::new(&params.fund);
        for property_config in &params.properties {
            fund.add_property(Property::new(property_config, params.fund.rent_factor));
        }
        fund.seed_history(params.fund.history_seed_days);
        let seed_prices: Vec<f64> = fund.price_history().iter().map(|p| p.to_float()).collect();

        // Investor roster.
        let agent_config = &params.agents;
        let mut registry = InvestorRegistry::new();
        for i in 0..agent_config.count {
            let literacy = sample_literacy(
                &mut rng,
                agent_config.literacy_mean,
                agent_config.literacy_std,
                agent_config.literacy_min,
                agent_config.literacy_max,
            );
            let shares = if i == 0 {
                agent_config.initial_shares_first
            } else {
                agent_config.initial_shares_rest
            };
            registry.push(Investor::new(
                types::AgentId(i as u64 + 1),
                literacy,
                agent_config.initial_cash,
                FII_SYMBOL,
                shares,
                &seed_prices,
                agent_config.behavior.clone(),
            ));
        }

        // Fixed neighbor sets, assigned once and immutable thereafter.
        let all_ids: Vec<types::AgentId> = registry.iter().map(Investor::id).collect();
        for id in &all_ids {
            let candidates: Vec<types::AgentId> =
                all_ids.iter().copied().filter(|c| c != id).collect();
            let picked: Vec<types::AgentId> = candidates
                .choose_multiple(&mut rng, agent_config.num_neighbors.min(candidates.len()))
                .copied()
                .collect();
            if let Some(investor) = registry.get_mut(*id) {
                investor.set_neighbors(picked);
            }
        }

        let central_bank = CentralBank::new(&params.central_bank);
        let media = Media::new(
            &params.media,
            params.general.num_days,
            seed ^ MEDIA_SEED_SALT,
        );
        let pool = WorkerPool::new(params.market.workers)?;

        Ok(Self {
            registry,
            fund,
            central_bank,
            media,
            sentiment: params.sentiment,
            volatility: params.market.initial_volatility,
            market_config: params.market,
            num_days: params.general.num_days,
            news: 0.0,
            news_history: Vec::new(),
            day: 0,
            seed,
            rng,
            pool,
            total_trades: 0,
            total_volume: 0,
            total_failures: 0,
        })
    }

    /// Current day number (0 before the first day).
    pub fn day(&self) -> Day {
        self.day
    }

    /// The investor roster.
    pub fn registry(&self) -> &InvestorRegistry {
        &self.registry
    }

    /// The traded fund.
    pub fn fund(&self) -> &Fund {
        &self.fund
    }

    /// Current volatility estimate.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// News values observed so far.
    pub fn news_history(&self) -> &[f64] {
        &self.news_history
    }

    /// Worker threads serving the update stage.
    pub fn worker_threads(&self) -> usize {
        self.pool.threads()
    }

    /// Advance the simulation by one trading day.
    pub fn advance_day(&mut self) -> DaySummary {
        self.day += 1;

        // Phase 1: ingest the day's media signal. Exhaustion is a normal
        // terminal condition: hold the last known value.
        self.news = match self.media.next_signal() {
            Signal::Value(value) => value,
            Signal::Exhausted => self.news_history.last().copied().unwrap_or(self.news),
        };
        self.news_history.push(self.news);

        // Phase 2: dividend distribution on its cadence.
        if self.day % self.market_config.dividend_interval_days == 0 {
            let dividend = self.fund.distribute_dividends(&mut self.rng);
            for investor in self.registry.iter_mut() {
                let held = investor.holdings_of(FII_SYMBOL);
                investor.credit(Cash::from_float(held as f64 * dividend));
            }
        }

        // Phase 3: property revaluation on its cadence.
        if self.day % self.market_config.revaluation_interval_days == 0 {
            self.fund.revalue(self.central_bank.expected_inflation());
        }

        // Phase 4: freeze the day's snapshot. It stays immutable for the
        // whole stage so every agent sees the same state.
        let snapshot = MarketSnapshot {
            last_price: self.fund.current_price(),
            historical_volatility: self.volatility,
            news: self.news,
            dividend_per_share: self.fund.last_dividend_per_share(),
            expected_inflation: self.central_bank.expected_inflation(),
            risk_premium: self.central_bank.risk_premium(),
        };

        // Phase 5: parallel update, then the sequential merge. The stage
        // blocks until every task returned; a failed agent keeps its prior
        // state for the day.
        let outcome = run_update_stage(
            &self.registry,
            &snapshot,
            &self.sentiment,
            self.seed,
            self.day,
            &self.pool,
        );
        for update in &outcome.updates {
            if let Some(investor) = self.registry.get_mut(update.id) {
                investor.apply_update(update);
            }
        }
        for (id, error) in &outcome.failures {
            warn!(agent = %id, %error, "agent update failed; keeping previous state");
        }
        self.total_failures += outcome.failures.len() as u64;

        // Phase 6: probabilistic order submission, one fixed deterministic
        // pass in roster order, into a freshly emptied book.
        let mut book = OrderBook::new();
        let market_price = self.fund.current_price();
        let mut orders = Vec::new();
        for investor in self.registry.iter() {
            if self.rng.gen_bool(investor.participation_prob())
                && let Some(order) = agents::generate_order(
                    investor,
                    FII_SYMBOL,
                    market_price,
                    &self.sentiment,
                    &mut self.rng,
                )
            {
                orders.push(order);
            }
        }
        for order in orders {
            if let Err(error) = book.submit(order) {
                warn!(%error, "order rejected at submission");
            }
        }

        // Phase 7: run the auction to completion and settle each trade as
        // an atomic transfer; the clearing price becomes the traded price.
        let result = book.execute(FII_SYMBOL, self.day);
        for trade in &result.trades {
            self.registry.apply_trade(trade);
        }
        if let Some(price) = result.clearing_price {
            self.fund.set_price(price);
        }
        let volume = result.volume();
        self.total_trades += result.trades.len() as u64;
        self.total_volume += volume.raw();

        // Phase 8: append the day's close to the fund and every agent.
        self.fund.push_price();
        let close = self.fund.current_price();
        for investor in self.registry.iter_mut() {
            investor.record_day(close.to_float());
        }

        // Phase 9: recompute the volatility estimate; with fewer than
        // window + 1 valid prices the previous estimate is retained.
        let prices: Vec<f64> = self.fund.price_history().iter().map(|p| p.to_float()).collect();
        if let Some(volatility) = quant::annualized_volatility(
            &prices,
            self.market_config.volatility_window,
            TRADING_DAYS_PER_YEAR,
        ) {
            self.volatility = volatility;
        }

        DaySummary {
            day: self.day,
            close,
            trades: result.trades.len(),
            volume,
            mean_sentiment: self.registry.mean_sentiment(),
            volatility: self.volatility,
            failures: outcome.failures.len(),
        }
    }

    /// Run the configured number of days and collect the result artifact.
    ///
    /// The worker pool is released when the market is dropped, however the
    /// run exits.
    pub fn run(&mut self) -> SimulationResult {
        let mut prices = Vec::with_capacity(self.num_days as usize);
        let mut mean_sentiment = Vec::with_capacity(self.num_days as usize);

        for _ in 0..self.num_days {
            let summary = self.advance_day();
            info!(
                day = summary.day,
                close = %summary.close,
                trades = summary.trades,
                volume = %summary.volume,
                sentiment = summary.mean_sentiment,
                volatility = summary.volatility,
                "day closed"
            );
            prices.push(summary.close.to_float());
            mean_sentiment.push(summary.mean_sentiment);
        }

        let close = self.fund.current_price().to_float();
        let agents = self
            .registry
            .iter()
            .map(|investor| AgentReport {
                id: investor.id(),
                cash: investor.cash().to_float(),
                holdings: investor.holdings_of(FII_SYMBOL),
                wealth: investor.wealth_at(close),
                sentiment: investor.sentiment(),
            })
            .collect();

        SimulationResult {
            prices,
            mean_sentiment,
            total_trades: self.total_trades,
            total_volume: self.total_volume,
            total_failures: self.total_failures,
            agents,
            fund: FundReport {
                price: close,
                cash: self.fund.cash(),
                book_value_per_share: self.fund.book_value_per_share(),
                // Skip the seeded anchor entry: only distributions count.
                total_dividends_per_share: self.fund.dividend_history().iter().skip(1).sum(),
            },
        }
    }
}
