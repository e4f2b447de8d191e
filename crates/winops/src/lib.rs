//! winops: window-manager operations for tilespace.
//!
//! The crate is split into a backend trait ([`WinOps`]) and the logic that
//! runs on top of it:
//!
//! - [`geom`]: rectangles, points, grid cells.
//! - [`visibility`]: exact occlusion estimate for stacked windows.
//! - [`converge`]: drive a window onto a target frame despite asynchronous,
//!   partial, or counter-adjusted geometry updates.
//! - [`sim`]: an in-memory window manager used by tests and the CLI.
//!
//! Geometry setters on [`WinOps`] are fire-and-forget; everything that needs
//! a frame to land verifies by reading back.

pub mod converge;
mod error;
pub mod geom;
mod ops;
pub mod sim;
pub mod visibility;
mod window;

pub use converge::{
    ConvergeOptions, ConvergenceCountersSnapshot, ConvergenceEngine, ConvergenceOutcome,
    SettleTiming, convergence_counters_reset, convergence_counters_snapshot,
};
pub use error::{Error, Result};
pub use geom::{Point, Rect, Size};
pub use ops::WinOps;
pub use space_ids::{MonitorId, WindowId, WindowKey};
pub use visibility::{VISIBILITY_THRESHOLD, visibility_percentage, visible_in_stack};
pub use window::{ScreenInfo, WindowInfo, screen_for_frame, visible_frame_containing_point};
