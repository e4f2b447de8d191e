// Process-wide counters for convergence runs.
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;

/// Aggregate counters for convergence runs and their outcomes.
#[derive(Default)]
pub(crate) struct ConvergenceCounters {
    runs: AtomicU64,
    converged: AtomicU64,
    accepted: AtomicU64,
    gave_up: AtomicU64,
    attempts: AtomicU64,
}

impl ConvergenceCounters {
    pub(crate) fn record_run(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_attempts(&self, attempts: u32) {
        self.attempts.fetch_add(u64::from(attempts), Ordering::Relaxed);
    }

    pub(crate) fn record_converged(&self) {
        self.converged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_gave_up(&self) {
        self.gave_up.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ConvergenceCountersSnapshot {
        ConvergenceCountersSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            converged: self.converged.load(Ordering::Relaxed),
            accepted: self.accepted.load(Ordering::Relaxed),
            gave_up: self.gave_up.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn reset(&self) {
        self.runs.store(0, Ordering::Relaxed);
        self.converged.store(0, Ordering::Relaxed);
        self.accepted.store(0, Ordering::Relaxed);
        self.gave_up.store(0, Ordering::Relaxed);
        self.attempts.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of convergence counters for inspection in tests or diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvergenceCountersSnapshot {
    pub runs: u64,
    pub converged: u64,
    pub accepted: u64,
    pub gave_up: u64,
    /// Read/correct cycles summed over all runs.
    pub attempts: u64,
}

pub(crate) static CONVERGENCE_COUNTERS: Lazy<ConvergenceCounters> =
    Lazy::new(ConvergenceCounters::default);
