//! Per-operation reports returned by [`SpaceManager`](crate::SpaceManager).

use std::fmt;

use space_ids::{MonitorId, WindowId};
use winops::{ConvergenceOutcome, Rect, Size};

use crate::{model::Slot, resolve::Unmatched};

/// Space written by a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSpace {
    pub monitor: MonitorId,
    /// Windows recorded.
    pub windows: usize,
    /// Windows on this monitor left out for being mostly hidden.
    pub hidden: usize,
}

/// Result of saving a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub slot: Slot,
    pub spaces: Vec<SavedSpace>,
}

impl SaveReport {
    /// Windows recorded across all monitors.
    pub fn window_count(&self) -> usize {
        self.spaces.iter().map(|s| s.windows).sum()
    }
}

/// What happened to one saved window during a restore.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowRestoreStatus {
    Converged { attempts: u32 },
    /// The application would not go below `observed`; not a failure.
    AcceptedAtConstraint { observed: Size },
    GaveUp { last: Rect },
    /// No confident live match; the record was not applied.
    Skipped(Unmatched),
    /// The window could not be driven (it closed, or the backend failed).
    Failed(String),
    /// Not started because the restore was cancelled.
    Cancelled,
}

impl WindowRestoreStatus {
    /// Converged or accepted at an application floor.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Converged { .. } | Self::AcceptedAtConstraint { .. }
        )
    }
}

impl From<ConvergenceOutcome> for WindowRestoreStatus {
    fn from(outcome: ConvergenceOutcome) -> Self {
        match outcome {
            ConvergenceOutcome::Converged { attempts, .. } => Self::Converged { attempts },
            ConvergenceOutcome::AcceptedAtConstraint { observed, .. } => {
                Self::AcceptedAtConstraint { observed }
            }
            ConvergenceOutcome::GaveUp { last, .. } => Self::GaveUp { last },
        }
    }
}

impl fmt::Display for WindowRestoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged { attempts } => write!(f, "converged after {attempts} attempts"),
            Self::AcceptedAtConstraint { observed } => {
                write!(f, "accepted at application minimum {observed}")
            }
            Self::GaveUp { last } => write!(f, "gave up at {last}"),
            Self::Skipped(why) => write!(f, "skipped: {why}"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One record's restore result.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowRestore {
    pub monitor: MonitorId,
    pub app_id: String,
    pub title: String,
    pub z_index: u32,
    /// Live window the record resolved to.
    pub window_id: Option<WindowId>,
    pub status: WindowRestoreStatus,
}

/// Result of restoring a slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestoreReport {
    pub slot: Option<Slot>,
    /// In processing order: per monitor, back to front.
    pub windows: Vec<WindowRestore>,
    /// Monitors whose layouts were applied.
    pub restored_monitors: Vec<MonitorId>,
    /// Monitors with a saved layout for the slot that are not connected.
    pub disconnected_monitors: Vec<MonitorId>,
    pub cancelled: bool,
}

impl RestoreReport {
    /// Window ids raised, in raise order.
    pub fn raised(&self) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|w| {
                !matches!(
                    w.status,
                    WindowRestoreStatus::Skipped(_)
                        | WindowRestoreStatus::Failed(_)
                        | WindowRestoreStatus::Cancelled
                )
            })
            .filter_map(|w| w.window_id)
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.windows.iter().filter(|w| w.status.is_success()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.windows
            .iter()
            .filter(|w| matches!(w.status, WindowRestoreStatus::Skipped(_)))
            .count()
    }

    /// True when no layout existed for the slot on any target monitor.
    pub fn is_empty(&self) -> bool {
        self.restored_monitors.is_empty()
    }
}
