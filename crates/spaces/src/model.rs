//! Saved layout data: slots, window records, and virtual spaces.

use std::fmt;

use serde::{Deserialize, Serialize};
use space_ids::{MonitorId, WindowId};
use winops::{Rect, WindowInfo};

/// Number of slots available per monitor.
pub const SLOT_COUNT: u8 = 10;

/// A virtual-space slot number, always within `0..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Slot(u8);

impl Slot {
    /// Build a slot, clamping out-of-range values into `0..=9`.
    pub fn new(n: i64) -> Self {
        Self(n.clamp(0, i64::from(SLOT_COUNT - 1)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every slot in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SLOT_COUNT).map(Self)
    }
}

impl From<i64> for Slot {
    fn from(n: i64) -> Self {
        Self::new(n)
    }
}

impl From<Slot> for i64 {
    fn from(slot: Slot) -> Self {
        Self::from(slot.0)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted window frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl From<Rect> for Frame {
    fn from(r: Rect) -> Self {
        Self {
            x: r.x,
            y: r.y,
            w: r.w,
            h: r.h,
        }
    }
}

impl From<Frame> for Rect {
    fn from(f: Frame) -> Self {
        Self::new(f.x, f.y, f.w, f.h)
    }
}

/// One window captured by a save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    pub app_id: String,
    /// Display name of the owning application.
    #[serde(default)]
    pub app_name: String,
    /// Matching hint only.
    pub title: String,
    pub frame: Frame,
    /// Stacking position at save time; 0 is frontmost.
    pub z_index: u32,
    /// Window-manager id at save time, when one was known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<WindowId>,
    /// Application-exposed window number, when the app exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_number: Option<i64>,
}

impl WindowRecord {
    /// Snapshot a live window at stacking position `z_index`.
    pub fn capture(info: &WindowInfo, z_index: u32) -> Self {
        Self {
            app_id: info.app_id.clone(),
            app_name: info.app.clone(),
            title: info.title.clone(),
            frame: info.frame.into(),
            z_index,
            window_id: Some(info.id),
            window_number: info.window_number,
        }
    }

    pub fn rect(&self) -> Rect {
        self.frame.into()
    }

    /// Name shown to users: the app name, falling back to the app id.
    pub fn display_name(&self) -> &str {
        if self.app_name.is_empty() {
            &self.app_id
        } else {
            &self.app_name
        }
    }
}

/// A saved arrangement of windows for one monitor and slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualSpace {
    pub number: Slot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub windows: Vec<WindowRecord>,
    pub display_id: MonitorId,
}

impl VirtualSpace {
    pub fn new(number: Slot, display_id: MonitorId, windows: Vec<WindowRecord>) -> Self {
        Self {
            number,
            name: None,
            windows,
            display_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Records front to back (ascending z-index).
    pub fn windows_by_z_order(&self) -> Vec<&WindowRecord> {
        let mut v: Vec<&WindowRecord> = self.windows.iter().collect();
        v.sort_by_key(|w| w.z_index);
        v
    }

    /// Records back to front (descending z-index): the order windows are
    /// restored and raised in.
    pub fn windows_in_restore_order(&self) -> Vec<&WindowRecord> {
        let mut v = self.windows_by_z_order();
        v.reverse();
        v
    }

    /// Application ids, front to back.
    pub fn app_ids(&self) -> Vec<String> {
        self.windows_by_z_order()
            .into_iter()
            .map(|w| w.app_id.clone())
            .collect()
    }

    /// Application display names, front to back.
    pub fn app_names(&self) -> Vec<String> {
        self.windows_by_z_order()
            .into_iter()
            .map(|w| w.display_name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn record(app: &str, z: u32) -> WindowRecord {
        WindowRecord {
            app_id: app.to_string(),
            app_name: String::new(),
            title: format!("{app} window"),
            frame: Frame {
                x: 0.0,
                y: 0.0,
                w: 100.0,
                h: 100.0,
            },
            z_index: z,
            window_id: None,
            window_number: None,
        }
    }

    #[test]
    fn slot_clamps() {
        assert_eq!(Slot::new(-1).get(), 0);
        assert_eq!(Slot::new(15).get(), 9);
        assert_eq!(Slot::new(4).get(), 4);
        assert_eq!(Slot::all().count(), 10);
    }

    #[test]
    fn slot_decodes_clamped() {
        let s: Slot = serde_json::from_str("42").unwrap();
        assert_eq!(s, Slot::new(9));
    }

    #[test]
    fn restore_order_reverses_z_order() {
        let space = VirtualSpace::new(
            Slot::new(1),
            MonitorId::from("m"),
            vec![record("b", 1), record("c", 2), record("a", 0)],
        );
        let by_z: Vec<&str> = space
            .windows_by_z_order()
            .iter()
            .map(|w| w.app_id.as_str())
            .collect();
        let restore: Vec<&str> = space
            .windows_in_restore_order()
            .iter()
            .map(|w| w.app_id.as_str())
            .collect();
        assert_eq!(by_z, vec!["a", "b", "c"]);
        assert_eq!(restore, vec!["c", "b", "a"]);
    }

    #[test]
    fn single_and_empty_orders_agree() {
        let one = VirtualSpace::new(Slot::new(0), MonitorId::from("m"), vec![record("a", 0)]);
        assert_eq!(one.windows_by_z_order(), one.windows_in_restore_order());
        let none = VirtualSpace::new(Slot::new(0), MonitorId::from("m"), Vec::new());
        assert!(none.windows_by_z_order().is_empty());
        assert!(none.windows_in_restore_order().is_empty());
    }

    #[test]
    fn record_uses_camel_case_and_tolerates_missing_fields() {
        let json = r#"{"appId":"com.a","title":"t","frame":{"x":1.5,"y":2.25,"w":3.0,"h":4.0},"zIndex":2}"#;
        let rec: WindowRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.app_id, "com.a");
        assert_eq!(rec.app_name, "");
        assert_eq!(rec.window_id, None);
        assert_eq!(rec.display_name(), "com.a");
        let out = serde_json::to_string(&rec).unwrap();
        assert!(out.contains("\"zIndex\":2"));
        assert!(!out.contains("windowId"));
    }

    #[test]
    fn app_names_follow_z_order() {
        let mut front = record("com.b", 0);
        front.app_name = "Bee".into();
        let space = VirtualSpace::new(
            Slot::new(2),
            MonitorId::from("m"),
            vec![record("com.a", 1), front],
        );
        assert_eq!(space.app_names(), vec!["Bee", "com.a"]);
        assert_eq!(space.app_ids(), vec!["com.b", "com.a"]);
    }

    proptest! {
        #[test]
        fn any_integer_lands_in_range(n in any::<i64>()) {
            let slot = Slot::new(n);
            prop_assert!(slot.get() < SLOT_COUNT);
            prop_assert_eq!(Slot::new(i64::from(slot)), slot);
            if (0..=9).contains(&n) {
                prop_assert_eq!(i64::from(slot.get()), n);
            }
        }
    }
}
