//! Shared identifiers for live windows and monitors.
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// Window-manager window number (`kCGWindowNumber` on macOS).
pub type WindowId = u32;

/// Identifier for a live window as reported by the window manager.
///
/// The key couples the owning process id and the window id. Keys are only
/// meaningful for the enumeration they came from; a restore pass re-resolves
/// saved windows into fresh keys rather than holding on to old ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowKey {
    /// Process identifier that owns the window.
    pid: i32,
    /// Window-manager window identifier.
    window_id: WindowId,
}

impl WindowKey {
    /// Construct a new key from the owning process id and window id.
    #[must_use]
    pub const fn new(pid: i32, window_id: WindowId) -> Self {
        Self { pid, window_id }
    }

    /// Owning process id for this window.
    #[must_use]
    pub const fn pid(self) -> i32 {
        self.pid
    }

    /// Window-manager window id.
    #[must_use]
    pub const fn window_id(self) -> WindowId {
        self.window_id
    }
}

impl From<(i32, WindowId)> for WindowKey {
    fn from(value: (i32, WindowId)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<WindowKey> for (i32, WindowId) {
    fn from(value: WindowKey) -> Self {
        (value.pid(), value.window_id())
    }
}

impl fmt::Display for WindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pid, self.window_id)
    }
}

/// Stable identifier for a monitor (display).
///
/// Serialized as a bare string so it can key persisted maps directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonitorId(String);

impl MonitorId {
    /// Construct a monitor id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MonitorId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MonitorId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
