use crate::{
    Result as WinResult, WindowId,
    geom::{Point, Rect, Size},
    window::{ScreenInfo, WindowInfo},
};

/// Trait abstraction over the window manager, to improve testability.
///
/// Geometry setters are fire-and-forget: a successful return only means the
/// request was accepted. The effect may land later, partially, or be
/// counter-adjusted by the application. Callers verify by reading back.
pub trait WinOps: Send + Sync {
    /// Whether window manipulation permission is currently granted.
    fn permission_granted(&self) -> bool;
    /// Enumerate on-screen windows, frontmost first.
    fn list_windows(&self) -> Vec<WindowInfo>;
    /// Enumerate connected screens.
    fn screens(&self) -> Vec<ScreenInfo>;
    /// Read the current frame of a window.
    fn window_frame(&self, id: WindowId) -> WinResult<Rect>;
    /// Request a new origin for a window.
    fn set_position(&self, id: WindowId, pos: Point) -> WinResult<()>;
    /// Request a new size for a window.
    fn set_size(&self, id: WindowId, size: Size) -> WinResult<()>;
    /// Raise a window above all others.
    fn raise_window(&self, id: WindowId) -> WinResult<()>;
    /// Bring a window (and its application) forward so it accepts geometry
    /// changes. Defaults to a plain raise.
    fn focus_window(&self, id: WindowId) -> WinResult<()> {
        self.raise_window(id)
    }
    /// The currently focused window, if any.
    fn focused_window(&self) -> Option<WindowInfo> {
        self.list_windows().into_iter().find(|w| w.focused)
    }
}
