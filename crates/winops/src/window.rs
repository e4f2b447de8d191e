use space_ids::{MonitorId, WindowKey};

use crate::{
    WindowId,
    geom::{Point, Rect},
};

/// Snapshot of a live window as enumerated by the window manager.
///
/// Handles are only valid for the enumeration that produced them; callers
/// re-enumerate instead of holding on to a `WindowInfo` across long delays.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowInfo {
    /// Application identifier (bundle id on macOS).
    pub app_id: String,
    /// Human-readable application name.
    pub app: String,
    pub title: String,
    pub pid: i32,
    pub id: WindowId,
    /// Window number exposed by the application itself, when it exposes one.
    pub window_number: Option<i64>,
    pub frame: Rect,
    /// True for the globally focused window.
    pub focused: bool,
}

impl WindowInfo {
    pub fn key(&self) -> WindowKey {
        WindowKey::new(self.pid, self.id)
    }
}

/// A connected display.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenInfo {
    pub id: MonitorId,
    /// Full display bounds.
    pub frame: Rect,
    /// Bounds excluding menu bar and dock.
    pub visible_frame: Rect,
}

/// Choose the screen that owns `frame`: the screen containing its center,
/// else the one with the largest overlap.
pub fn screen_for_frame<'a>(screens: &'a [ScreenInfo], frame: &Rect) -> Option<&'a ScreenInfo> {
    let center = frame.center();
    if let Some(s) = screens.iter().find(|s| s.frame.contains(center)) {
        return Some(s);
    }
    screens
        .iter()
        .filter_map(|s| s.frame.intersection(frame).map(|i| (s, i.area())))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(s, _)| s)
}

/// Visible frame of the screen containing `p`, falling back to the first
/// screen. Returns `None` only when no screens are connected.
pub fn visible_frame_containing_point(screens: &[ScreenInfo], p: Point) -> Option<Rect> {
    screens
        .iter()
        .find(|s| s.frame.contains(p))
        .or_else(|| screens.first())
        .map(|s| s.visible_frame)
}
