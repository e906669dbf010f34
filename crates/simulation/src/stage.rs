//! The parallel update stage.
//!
//! Fans frozen per-agent snapshots out to the worker pool, runs the
//! decision model for each, and fans the results back in. Every task is a
//! pure function of (own state copy, shared immutable snapshot): no task
//! reads or writes another agent's live state, which is what makes the
//! stage safely parallelizable.
//!
//! Randomness inside the stage comes from a dedicated `StdRng` stream per
//! (seed, day, agent), so the produced updates are byte-identical for any
//! worker count.

use rand::SeedableRng;
use rand::rngs::StdRng;

use agents::{
    AgentUpdate, BehaviorConfig, DecisionError, DecisionInputs, InvestorRegistry, SentimentParams,
    decision,
};
use parallel::WorkerPool;
use types::{AgentId, Day, MarketSnapshot};

/// Frozen copy of one agent's state, taken before the stage starts.
struct InvestorTask {
    id: AgentId,
    literacy: f64,
    prev_sentiment: f64,
    price_history: Vec<f64>,
    wealth_history: Vec<f64>,
    neighbor_sentiments: Vec<f64>,
    behavior: BehaviorConfig,
}

/// Fan-in result of one day's update stage.
#[derive(Debug, Clone, Default)]
pub struct StageOutcome {
    /// Successful updates, in roster order.
    pub updates: Vec<AgentUpdate>,
    /// Agents whose computation failed this day, with the cause.
    pub failures: Vec<(AgentId, DecisionError)>,
}

/// Run the update stage for one day.
///
/// Blocks until every dispatched task has returned — the fan-in barrier the
/// orchestrator relies on before order submission begins. A failed task
/// surfaces in [`StageOutcome::failures`] instead of aborting the day.
pub fn run_update_stage(
    registry: &InvestorRegistry,
    snapshot: &MarketSnapshot,
    params: &SentimentParams,
    seed: u64,
    day: Day,
    pool: &WorkerPool,
) -> StageOutcome {
    // Freeze the inputs sequentially: neighbor sentiments must reflect the
    // pre-stage state for every task.
    let tasks: Vec<InvestorTask> = registry
        .iter()
        .map(|investor| InvestorTask {
            id: investor.id(),
            literacy: investor.literacy(),
            prev_sentiment: investor.sentiment(),
            price_history: investor.price_history().to_vec(),
            wealth_history: investor.wealth_history().to_vec(),
            neighbor_sentiments: registry.neighbor_sentiments(investor.id()),
            behavior: investor.behavior().clone(),
        })
        .collect();

    let results = pool.install(|| {
        parallel::map_slice(
            &tasks,
            |task| {
                let mut rng = StdRng::seed_from_u64(task_seed(seed, day, task.id));
                let inputs = DecisionInputs {
                    literacy: task.literacy,
                    prev_sentiment: task.prev_sentiment,
                    price_history: &task.price_history,
                    wealth_history: &task.wealth_history,
                    neighbor_sentiments: &task.neighbor_sentiments,
                    snapshot,
                    behavior: &task.behavior,
                    params,
                };
                decision::evaluate(&inputs, &mut rng).map(|output| AgentUpdate {
                    id: task.id,
                    sentiment: output.sentiment,
                    risk_decision: output.risk_decision,
                    allocation_pct: output.allocation_pct,
                    expected_price: output.expected_price,
                })
            },
            false,
        )
    });

    let mut outcome = StageOutcome::default();
    for (task, result) in tasks.iter().zip(results) {
        match result {
            Ok(update) => outcome.updates.push(update),
            Err(error) => outcome.failures.push((task.id, error)),
        }
    }
    outcome
}

/// Derive the per-task RNG seed from (master seed, day, agent).
///
/// splitmix-style finalizer so neighboring (day, agent) pairs land on
/// unrelated streams.
fn task_seed(seed: u64, day: Day, id: AgentId) -> u64 {
    let mut h = seed
        ^ day.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ id.0.wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h
}
