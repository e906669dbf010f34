//! Declarative parallel/sequential execution utilities.
//!
//! This crate provides helpers that abstract over parallel vs sequential
//! execution based on the `parallel` feature flag, plus the [`WorkerPool`]
//! the orchestrator owns for the daily fan-out. The `cfg` logic lives here
//! in ONE place, keeping call sites clean.
//!
//! # Runtime Override
//!
//! All helpers accept a `force_sequential` parameter. When `true`, execution
//! is sequential even if the `parallel` feature is enabled. This allows
//! profiling and determinism testing of parallel vs sequential execution.
//!
//! # Pool Lifecycle
//!
//! The pool is an explicit resource: built once at simulation start, reused
//! for every day's fan-out, and joined when its owner drops it. Helpers
//! called inside [`WorkerPool::install`] run on the pool's threads rather
//! than the global rayon pool.

use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// =============================================================================
// Slice Operations
// =============================================================================

/// Map a function over a slice, potentially in parallel.
///
/// Returns a Vec of results in the same order as input (parallel preserves
/// order).
///
/// # Parameters
/// - `force_sequential`: When true, forces sequential execution even if the
///   parallel feature is enabled
#[inline]
pub fn map_slice<T, F, R>(slice: &[T], f: F, force_sequential: bool) -> Vec<R>
where
    T: Sync,
    F: Fn(&T) -> R + Sync + Send,
    R: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(f).collect()
        } else {
            slice.par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(f).collect()
    }
}

// =============================================================================
// Worker Pool
// =============================================================================

/// Error building the worker pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolError(String);

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to build worker pool: {}", self.0)
    }
}

impl std::error::Error for PoolError {}

/// Fixed-size worker pool owned by the orchestrator.
///
/// Wraps a dedicated rayon pool so the per-day fan-out never competes with
/// (or leaks into) the global pool. Dropping the pool joins its threads, so
/// scoped ownership guarantees release on every exit path.
pub struct WorkerPool {
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
    threads: usize,
}

impl WorkerPool {
    /// Build a pool with the given thread count, defaulting to half the
    /// available hardware threads.
    pub fn new(threads: Option<usize>) -> Result<Self, PoolError> {
        let threads = threads.unwrap_or_else(Self::default_threads).max(1);

        #[cfg(feature = "parallel")]
        {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| PoolError(e.to_string()))?;
            Ok(Self { pool, threads })
        }

        #[cfg(not(feature = "parallel"))]
        {
            Ok(Self { threads })
        }
    }

    /// Default worker count: half the hardware threads, at least one.
    pub fn default_threads() -> usize {
        (num_cpus::get() / 2).max(1)
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Run a closure inside the pool, blocking until it returns.
    ///
    /// Parallel iterators used inside the closure execute on this pool's
    /// threads. This is the fan-out/fan-in barrier: the call does not return
    /// until every spawned task has completed.
    pub fn install<R, F>(&self, f: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        #[cfg(feature = "parallel")]
        {
            self.pool.install(f)
        }

        #[cfg(not(feature = "parallel"))]
        {
            f()
        }
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
