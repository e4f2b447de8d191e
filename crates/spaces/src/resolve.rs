//! Map saved window records back onto live windows.
//!
//! Strategies run in priority order and stop at the first confident answer.
//! A batch resolves identifiers for every record before any frame guess.
//! When several live windows are equally plausible the resolver reports no
//! match: converging the wrong window is worse than skipping one.

use std::{collections::HashSet, fmt};

use space_ids::WindowId;
use tracing::debug;
use winops::{Rect, WindowInfo};

use crate::model::WindowRecord;

/// Default per-component frame distance for the frame heuristic.
pub const FRAME_MATCH_TOLERANCE: f64 = 20.0;

/// Why a record could not be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unmatched {
    /// No live window belongs to the record's application.
    NoCandidates,
    /// Every window of the application is already matched to another record.
    AllClaimed,
    /// Same-app windows exist but none sits near the saved frame.
    NoFrameMatch,
    /// This many windows matched equally well.
    Ambiguous(usize),
}

impl fmt::Display for Unmatched {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCandidates => write!(f, "no live window for application"),
            Self::AllClaimed => write!(f, "every window of the application is already matched"),
            Self::NoFrameMatch => write!(f, "no window near saved frame"),
            Self::Ambiguous(n) => write!(f, "{n} equally plausible windows"),
        }
    }
}

/// Outcome of resolving one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The live window the record maps to.
    Found(WindowInfo),
    /// No confident match.
    NotFound(Unmatched),
}

/// Which strategy produced a match; logged for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    WindowId,
    WindowNumber,
    Frame,
    FrameAndTitle,
}

fn frame_close(a: &Rect, b: &Rect, tol: f64) -> bool {
    a.approx_eq(b, tol)
}

/// Same-app windows not yet claimed by another record.
fn pool<'a>(
    record: &WindowRecord,
    candidates: &'a [WindowInfo],
    claimed: &HashSet<WindowId>,
) -> Result<Vec<&'a WindowInfo>, Unmatched> {
    let same_app: Vec<&WindowInfo> = candidates
        .iter()
        .filter(|w| w.app_id == record.app_id)
        .collect();
    if same_app.is_empty() {
        return Err(Unmatched::NoCandidates);
    }
    let free: Vec<&WindowInfo> = same_app
        .into_iter()
        .filter(|w| !claimed.contains(&w.id))
        .collect();
    if free.is_empty() {
        return Err(Unmatched::AllClaimed);
    }
    Ok(free)
}

/// Identifier strategies: direct window id, then window number. `None` when
/// neither applies and the frame heuristic should decide.
fn exact_match(record: &WindowRecord, pool: &[&WindowInfo]) -> Option<Resolution> {
    if let Some(w) = record
        .window_id
        .and_then(|id| pool.iter().find(|w| w.id == id))
    {
        return Some(found(record, w, Strategy::WindowId));
    }

    let number = record.window_number?;
    let hits: Vec<&WindowInfo> = pool
        .iter()
        .copied()
        .filter(|w| w.window_number == Some(number))
        .collect();
    match hits.as_slice() {
        [] => None,
        [only] => Some(found(record, only, Strategy::WindowNumber)),
        many => Some(Resolution::NotFound(Unmatched::Ambiguous(many.len()))),
    }
}

fn frame_match(record: &WindowRecord, pool: &[&WindowInfo], frame_tolerance: f64) -> Resolution {
    let saved = record.rect();
    let near: Vec<&WindowInfo> = pool
        .iter()
        .copied()
        .filter(|w| frame_close(&w.frame, &saved, frame_tolerance))
        .collect();
    match near.as_slice() {
        [] => Resolution::NotFound(Unmatched::NoFrameMatch),
        [only] => found(record, only, Strategy::Frame),
        many => {
            let titled: Vec<&WindowInfo> = many
                .iter()
                .copied()
                .filter(|w| !record.title.is_empty() && w.title == record.title)
                .collect();
            match titled.as_slice() {
                [only] => found(record, only, Strategy::FrameAndTitle),
                _ => Resolution::NotFound(Unmatched::Ambiguous(many.len())),
            }
        }
    }
}

/// Resolve `record` against `candidates`, ignoring windows in `claimed`.
pub fn resolve(
    record: &WindowRecord,
    candidates: &[WindowInfo],
    claimed: &HashSet<WindowId>,
    frame_tolerance: f64,
) -> Resolution {
    let pool = match pool(record, candidates, claimed) {
        Ok(pool) => pool,
        Err(why) => return Resolution::NotFound(why),
    };
    exact_match(record, &pool).unwrap_or_else(|| frame_match(record, &pool, frame_tolerance))
}

/// Resolve a batch of records, one result per record in input order.
///
/// Identifier matches are claimed for every record before any frame guess is
/// made, so a heuristic match can never take a window another record owns by
/// id. Matched windows are added to `claimed`.
pub fn resolve_all(
    records: &[&WindowRecord],
    candidates: &[WindowInfo],
    claimed: &mut HashSet<WindowId>,
    frame_tolerance: f64,
) -> Vec<Resolution> {
    let mut out: Vec<Option<Resolution>> = records.iter().map(|_| None).collect();

    for (slot, record) in out.iter_mut().zip(records) {
        let Ok(pool) = pool(record, candidates, claimed) else {
            continue;
        };
        if let Some(res) = exact_match(record, &pool) {
            if let Resolution::Found(w) = &res {
                claimed.insert(w.id);
            }
            *slot = Some(res);
        }
    }

    for (slot, record) in out.iter_mut().zip(records) {
        if slot.is_some() {
            continue;
        }
        let res = match pool(record, candidates, claimed) {
            Ok(pool) => frame_match(record, &pool, frame_tolerance),
            Err(why) => Resolution::NotFound(why),
        };
        if let Resolution::Found(w) = &res {
            claimed.insert(w.id);
        }
        *slot = Some(res);
    }

    out.into_iter().flatten().collect()
}

fn found(record: &WindowRecord, w: &WindowInfo, strategy: Strategy) -> Resolution {
    debug!(
        "resolve: {} z={} -> id={} via {:?}",
        record.app_id,
        record.z_index,
        w.id,
        strategy
    );
    Resolution::Found(w.clone())
}
