use tracing::{debug, info};

use super::{
    apply::{apply_correction, apply_initial_size, relocate_to_safe_zone, soft},
    common::{
        ConvergeOptions, frame_unchanged, is_minimum_constraint, is_position_ok, is_size_ok,
        log_summary,
    },
    metrics::CONVERGENCE_COUNTERS,
};
use crate::{
    Error, Result, WindowId,
    geom::{Rect, Size},
    ops::WinOps,
    window::visible_frame_containing_point,
};

/// Terminal result of a convergence run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConvergenceOutcome {
    /// Position and size both landed within tolerance of the target.
    Converged {
        /// Final observed frame.
        frame: Rect,
        /// Read/correct cycles used.
        attempts: u32,
    },
    /// The window stopped changing at a size that meets or exceeds the target
    /// in every dimension: an application-enforced floor.
    AcceptedAtConstraint {
        /// The size the window settled at.
        observed: Size,
        /// Final observed frame.
        frame: Rect,
        /// Read/correct cycles used.
        attempts: u32,
    },
    /// Stuck without satisfying the minimum-size rule, or out of attempts.
    GaveUp {
        /// Last observed frame.
        last: Rect,
        /// Read/correct cycles used.
        attempts: u32,
    },
}

impl ConvergenceOutcome {
    /// Converged or accepted at an application constraint.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::GaveUp { .. })
    }

    /// The last frame observed for the window.
    pub fn final_frame(&self) -> Rect {
        match *self {
            Self::Converged { frame, .. } | Self::AcceptedAtConstraint { frame, .. } => frame,
            Self::GaveUp { last, .. } => last,
        }
    }

    /// Read/correct cycles used.
    pub fn attempts(&self) -> u32 {
        match *self {
            Self::Converged { attempts, .. }
            | Self::AcceptedAtConstraint { attempts, .. }
            | Self::GaveUp { attempts, .. } => attempts,
        }
    }
}

/// Drives one window toward a target frame through a [`WinOps`] backend.
///
/// The run is: focus, relocate to the safe zone, apply the target size, then
/// iterate read/verify/correct until the frame is within tolerance, the window
/// stops changing, or the attempt budget runs out.
pub struct ConvergenceEngine<'a> {
    ops: &'a dyn WinOps,
    opts: ConvergeOptions,
}

impl<'a> ConvergenceEngine<'a> {
    /// Construct an engine over `ops` with the supplied options.
    pub fn new(ops: &'a dyn WinOps, opts: ConvergeOptions) -> Self {
        Self { ops, opts }
    }

    /// Options this engine runs with.
    pub fn options(&self) -> &ConvergeOptions {
        &self.opts
    }

    /// Converge window `id` onto `target`.
    ///
    /// A missing permission, a vanished window, or a failed frame read produce
    /// `Err`; every other failure mode ends in a [`ConvergenceOutcome`].
    pub fn apply(&self, id: WindowId, target: &Rect) -> Result<ConvergenceOutcome> {
        let ops = self.ops;
        let opts = &self.opts;
        if !ops.permission_granted() {
            return Err(Error::Permission);
        }
        CONVERGENCE_COUNTERS.record_run();
        debug!("converge: id={} target={}", id, target);

        // Focus so the owning application accepts geometry changes.
        soft("focus", id, ops.focus_window(id))?;

        // Park the window at the left edge of the destination screen so a
        // resize cannot be clamped against the right screen edge.
        let screens = ops.screens();
        let safe_x = visible_frame_containing_point(&screens, target.center())
            .map_or(target.x, |vf| vf.x);
        relocate_to_safe_zone(ops, id, safe_x, opts)?;

        apply_initial_size(ops, id, target, opts.timing)?;

        let mut last: Option<Rect> = None;
        let mut stuck: u32 = 0;
        for attempt in 1..=opts.max_attempts {
            let got = ops.window_frame(id)?;
            stuck = match last {
                Some(prev) if frame_unchanged(&prev, &got) => stuck + 1,
                _ => 0,
            };
            last = Some(got);
            log_summary(attempt, stuck, &got, target);

            if is_size_ok(got.size(), target.size(), opts.tolerance)
                && is_position_ok(got.origin(), target.origin(), opts.tolerance)
            {
                return Ok(self.finish(ConvergenceOutcome::Converged {
                    frame: got,
                    attempts: attempt,
                }));
            }

            if stuck >= opts.stuck_limit {
                let outcome = if is_minimum_constraint(got.size(), target.size(), opts.tolerance)
                {
                    ConvergenceOutcome::AcceptedAtConstraint {
                        observed: got.size(),
                        frame: got,
                        attempts: attempt,
                    }
                } else {
                    ConvergenceOutcome::GaveUp {
                        last: got,
                        attempts: attempt,
                    }
                };
                return Ok(self.finish(outcome));
            }

            apply_correction(ops, id, target, opts.timing)?;
        }

        let last = match last {
            Some(r) => r,
            None => ops.window_frame(id)?,
        };
        Ok(self.finish(ConvergenceOutcome::GaveUp {
            last,
            attempts: opts.max_attempts,
        }))
    }

    fn finish(&self, outcome: ConvergenceOutcome) -> ConvergenceOutcome {
        CONVERGENCE_COUNTERS.record_attempts(outcome.attempts());
        match outcome {
            ConvergenceOutcome::Converged { frame, attempts } => {
                CONVERGENCE_COUNTERS.record_converged();
                debug!("converge: ok frame={} attempts={}", frame, attempts);
            }
            ConvergenceOutcome::AcceptedAtConstraint {
                observed, attempts, ..
            } => {
                CONVERGENCE_COUNTERS.record_accepted();
                info!(
                    "converge: accepted at application constraint size={} attempts={}",
                    observed, attempts
                );
            }
            ConvergenceOutcome::GaveUp { last, attempts } => {
                CONVERGENCE_COUNTERS.record_gave_up();
                info!("converge: gave up last={} attempts={}", last, attempts);
            }
        }
        outcome
    }
}
