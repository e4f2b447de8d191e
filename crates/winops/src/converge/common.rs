use tracing::debug;

use crate::geom::{Point, Rect, Size};

/// Default tolerance (in points) for position and size checks.
pub const DEFAULT_TOLERANCE: f64 = 10.0;

/// Default number of read/correct cycles before giving up.
pub const MAX_ATTEMPTS: u32 = 10;

/// Consecutive unchanged reads after which a window is considered stuck.
pub const STUCK_LIMIT: u32 = 3;

/// Bounded reads while waiting for the safe-zone move to land.
pub const SAFE_ZONE_RETRIES: u32 = 5;

/// Default settle delay after each geometry request.
pub const SETTLE_MS: u64 = 50;

/// Frames closer than this on every component count as "no observable change".
pub(super) const UNCHANGED_EPS: f64 = 0.5;

/// Delays used between geometry requests and reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleTiming {
    /// Delay after each set request before the next request or read.
    pub settle_ms: u64,
}

impl SettleTiming {
    /// No delays at all; for simulated backends.
    pub const fn immediate() -> Self {
        Self { settle_ms: 0 }
    }
}

impl Default for SettleTiming {
    fn default() -> Self {
        Self {
            settle_ms: SETTLE_MS,
        }
    }
}

/// Knobs controlling a convergence run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergeOptions {
    /// Per-axis/per-dimension tolerance for position and size.
    pub tolerance: f64,
    /// Read/correct cycles before giving up.
    pub max_attempts: u32,
    /// Consecutive unchanged reads that end the run.
    pub stuck_limit: u32,
    /// Reads spent waiting for the safe-zone relocation.
    pub safe_zone_retries: u32,
    /// Delay after each geometry request.
    pub timing: SettleTiming,
}

impl Default for ConvergeOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_attempts: MAX_ATTEMPTS,
            stuck_limit: STUCK_LIMIT,
            safe_zone_retries: SAFE_ZONE_RETRIES,
            timing: SettleTiming::default(),
        }
    }
}

impl ConvergeOptions {
    /// Override the tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Override the settle timing.
    pub fn with_timing(mut self, timing: SettleTiming) -> Self {
        self.timing = timing;
        self
    }
}

/// True when both dimensions are within `tolerance` of the target.
#[inline]
pub fn is_size_ok(actual: Size, target: Size, tolerance: f64) -> bool {
    (actual.w - target.w).abs() <= tolerance && (actual.h - target.h).abs() <= tolerance
}

/// True when both coordinates are within `tolerance` of the target.
#[inline]
pub fn is_position_ok(actual: Point, target: Point, tolerance: f64) -> bool {
    (actual.x - target.x).abs() <= tolerance && (actual.y - target.y).abs() <= tolerance
}

/// True iff the observed size meets or exceeds the target in every dimension
/// (values within `tolerance` count as equal).
///
/// A size that is larger on one axis and short on the other is a window still
/// renegotiating its frame, not an application floor.
#[inline]
pub fn is_minimum_constraint(actual: Size, target: Size, tolerance: f64) -> bool {
    actual.w >= target.w - tolerance && actual.h >= target.h - tolerance
}

#[inline]
pub(super) fn frame_unchanged(prev: &Rect, cur: &Rect) -> bool {
    prev.approx_eq(cur, UNCHANGED_EPS)
}

#[inline]
pub(super) fn sleep_ms(ms: u64) {
    use std::{thread::sleep, time::Duration};
    if ms > 0 {
        sleep(Duration::from_millis(ms));
    }
}

#[inline]
pub(super) fn log_summary(attempt: u32, stuck: u32, got: &Rect, target: &Rect) {
    debug!(
        "summary: attempt={} stuck={} got={} {}",
        attempt,
        stuck,
        got,
        got.diffs(target)
    );
}
