//! Frame convergence: drive a window onto a target frame despite asynchronous,
//! partial, or counter-adjusted geometry updates.

mod apply;
mod common;
mod engine;
mod metrics;


pub use common::{
    ConvergeOptions, DEFAULT_TOLERANCE, MAX_ATTEMPTS, SAFE_ZONE_RETRIES, SETTLE_MS, STUCK_LIMIT,
    SettleTiming, is_minimum_constraint, is_position_ok, is_size_ok,
};
pub use engine::{ConvergenceEngine, ConvergenceOutcome};
pub use metrics::ConvergenceCountersSnapshot;

/// Snapshot the process-wide convergence counters.
pub fn convergence_counters_snapshot() -> ConvergenceCountersSnapshot {
    metrics::CONVERGENCE_COUNTERS.snapshot()
}

/// Reset the process-wide convergence counters.
pub fn convergence_counters_reset() {
    metrics::CONVERGENCE_COUNTERS.reset();
}
