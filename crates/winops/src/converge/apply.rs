// Geometry setters + settle helpers used by the convergence engine.
use tracing::debug;

use super::common::{ConvergeOptions, SettleTiming, sleep_ms};
use crate::{
    Error, Result, WindowId,
    geom::{Point, Rect},
    ops::WinOps,
};

/// Pass through errors that end the operation; log and swallow the rest.
///
/// A rejected setter is not fatal on its own: the read-back loop decides
/// whether the window got where it needed to be.
pub(super) fn soft(op: &str, id: WindowId, res: Result<()>) -> Result<()> {
    match res {
        Ok(()) => Ok(()),
        Err(err @ (Error::Permission | Error::WindowGone(_))) => Err(err),
        Err(err) => {
            debug!("{}: id={} ignored error: {}", op, id, err);
            Ok(())
        }
    }
}

/// Move the window's horizontal origin to `safe_x`, then poll (bounded) until
/// the reported origin lands within tolerance. Returns the last observed frame.
pub(super) fn relocate_to_safe_zone(
    ops: &dyn WinOps,
    id: WindowId,
    safe_x: f64,
    opts: &ConvergeOptions,
) -> Result<Rect> {
    let mut cur = ops.window_frame(id)?;
    if (cur.x - safe_x).abs() <= opts.tolerance {
        debug!("safe_zone: id={} already at x={:.1}", id, cur.x);
        return Ok(cur);
    }
    debug!("safe_zone: id={} x {:.1} -> {:.1}", id, cur.x, safe_x);
    soft(
        "safe_zone",
        id,
        ops.set_position(id, Point { x: safe_x, y: cur.y }),
    )?;
    for poll in 1..=opts.safe_zone_retries {
        sleep_ms(opts.timing.settle_ms);
        cur = ops.window_frame(id)?;
        if (cur.x - safe_x).abs() <= opts.tolerance {
            debug!("safe_zone: id={} settled after {} polls", id, poll);
            return Ok(cur);
        }
    }
    debug!(
        "safe_zone: id={} did not settle (x={:.1}); continuing",
        id, cur.x
    );
    Ok(cur)
}

/// Apply the target size once and allow a single settle delay.
pub(super) fn apply_initial_size(
    ops: &dyn WinOps,
    id: WindowId,
    target: &Rect,
    timing: SettleTiming,
) -> Result<()> {
    debug!("initial_size: id={} -> {}", id, target.size());
    soft("initial_size", id, ops.set_size(id, target.size()))?;
    sleep_ms(timing.settle_ms);
    Ok(())
}

/// One correction pass: size, position, size, position, settling after each.
///
/// Setting one attribute can perturb the other (some apps re-anchor while
/// resizing), so both are applied twice.
pub(super) fn apply_correction(
    ops: &dyn WinOps,
    id: WindowId,
    target: &Rect,
    timing: SettleTiming,
) -> Result<()> {
    for _ in 0..2 {
        soft("correct_size", id, ops.set_size(id, target.size()))?;
        sleep_ms(timing.settle_ms);
        soft("correct_pos", id, ops.set_position(id, target.origin()))?;
        sleep_ms(timing.settle_ms);
    }
    Ok(())
}
