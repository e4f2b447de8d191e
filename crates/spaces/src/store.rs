use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use space_ids::MonitorId;

use crate::model::{Slot, VirtualSpace};

/// Saved spaces keyed by monitor, then slot.
///
/// At most one space exists per (monitor, slot). Absent pairs are reported as
/// `None`; the store never fabricates default spaces.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualSpacesStore {
    spaces: BTreeMap<MonitorId, BTreeMap<Slot, VirtualSpace>>,
}

impl VirtualSpacesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, monitor: &MonitorId, slot: Slot) -> Option<&VirtualSpace> {
        self.spaces.get(monitor).and_then(|m| m.get(&slot))
    }

    /// Store `space` for `monitor`, replacing whatever was at its slot.
    pub fn set(&mut self, mut space: VirtualSpace, monitor: &MonitorId) {
        space.display_id = monitor.clone();
        self.spaces
            .entry(monitor.clone())
            .or_default()
            .insert(space.number, space);
    }

    /// Spaces for `monitor` in slot order; absent slots are omitted.
    pub fn get_all(&self, monitor: &MonitorId) -> Vec<&VirtualSpace> {
        self.spaces
            .get(monitor)
            .map(|m| m.values().collect())
            .unwrap_or_default()
    }

    /// Spaces for `monitor` holding at least one window, in slot order.
    pub fn get_non_empty(&self, monitor: &MonitorId) -> Vec<&VirtualSpace> {
        self.get_all(monitor)
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Remove the space at (monitor, slot), returning it.
    pub fn remove(&mut self, monitor: &MonitorId, slot: Slot) -> Option<VirtualSpace> {
        let slots = self.spaces.get_mut(monitor)?;
        let removed = slots.remove(&slot);
        if slots.is_empty() {
            self.spaces.remove(monitor);
        }
        removed
    }

    /// Set or clear the display name at (monitor, slot). Returns false when no
    /// space exists there.
    pub fn rename(&mut self, monitor: &MonitorId, slot: Slot, name: Option<String>) -> bool {
        match self.spaces.get_mut(monitor).and_then(|m| m.get_mut(&slot)) {
            Some(space) => {
                space.name = name.filter(|n| !n.is_empty());
                true
            }
            None => false,
        }
    }

    /// Monitors with at least one saved space.
    pub fn monitors(&self) -> Vec<&MonitorId> {
        self.spaces.keys().collect()
    }

    /// Monitors holding a space at `slot`.
    pub fn monitors_with(&self, slot: Slot) -> Vec<MonitorId> {
        self.spaces
            .iter()
            .filter(|(_, m)| m.contains_key(&slot))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frame, WindowRecord};

    fn space(slot: i64, apps: &[&str]) -> VirtualSpace {
        let windows = apps
            .iter()
            .enumerate()
            .map(|(z, app)| WindowRecord {
                app_id: app.to_string(),
                app_name: String::new(),
                title: String::new(),
                frame: Frame {
                    x: 10.125,
                    y: 20.5,
                    w: 640.333,
                    h: 480.0,
                },
                z_index: z as u32,
                window_id: Some(z as u32 + 1),
                window_number: None,
            })
            .collect();
        VirtualSpace::new(Slot::new(slot), MonitorId::from("unset"), windows)
    }

    #[test]
    fn set_overwrites_and_get_reports_absent() {
        let mut store = VirtualSpacesStore::new();
        let m = MonitorId::from("A");
        assert!(store.get(&m, Slot::new(1)).is_none());
        store.set(space(1, &["a"]), &m);
        store.set(space(1, &["b", "c"]), &m);
        let got = store.get(&m, Slot::new(1)).unwrap();
        assert_eq!(got.windows.len(), 2);
        assert_eq!(got.display_id, m);
        assert!(store.get(&MonitorId::from("B"), Slot::new(1)).is_none());
    }

    #[test]
    fn get_all_is_slot_ordered_and_non_empty_filters() {
        let mut store = VirtualSpacesStore::new();
        let m = MonitorId::from("A");
        store.set(space(7, &["x"]), &m);
        store.set(space(2, &[]), &m);
        store.set(space(0, &["y"]), &m);
        let all: Vec<u8> = store.get_all(&m).iter().map(|s| s.number.get()).collect();
        assert_eq!(all, vec![0, 2, 7]);
        let non_empty: Vec<u8> = store
            .get_non_empty(&m)
            .iter()
            .map(|s| s.number.get())
            .collect();
        assert_eq!(non_empty, vec![0, 7]);
    }

    #[test]
    fn rename_and_remove() {
        let mut store = VirtualSpacesStore::new();
        let m = MonitorId::from("A");
        store.set(space(3, &["x"]), &m);
        assert!(store.rename(&m, Slot::new(3), Some("Work".into())));
        assert_eq!(store.get(&m, Slot::new(3)).unwrap().name.as_deref(), Some("Work"));
        assert!(store.rename(&m, Slot::new(3), Some(String::new())));
        assert_eq!(store.get(&m, Slot::new(3)).unwrap().name, None);
        assert!(!store.rename(&m, Slot::new(4), Some("x".into())));
        assert!(store.remove(&m, Slot::new(3)).is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn json_round_trip_is_exact() {
        let mut store = VirtualSpacesStore::new();
        let a = MonitorId::from("display-1");
        let b = MonitorId::from("display-2");
        let mut named = space(1, &["com.a", "com.b", "com.c"]);
        named.name = Some("Code".into());
        store.set(named, &a);
        store.set(space(9, &["com.d"]), &b);

        let json = serde_json::to_string_pretty(&store).unwrap();
        assert!(json.contains("\"display-1\""));
        assert!(json.contains("\"1\""));
        assert!(json.contains("\"displayId\""));
        let back: VirtualSpacesStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
        let w = &back.get(&a, Slot::new(1)).unwrap().windows[0];
        assert_eq!(w.frame.w, 640.333);
    }

    #[test]
    fn decodes_legacy_document() {
        let json = r#"{
            "main": {
                "3": {
                    "number": 3,
                    "windows": [
                        {"appId": "com.a", "title": "A", "frame": {"x": 0, "y": 0, "w": 10, "h": 10}, "zIndex": 0}
                    ],
                    "displayId": "main"
                }
            }
        }"#;
        let store: VirtualSpacesStore = serde_json::from_str(json).unwrap();
        let s = store.get(&MonitorId::from("main"), Slot::new(3)).unwrap();
        assert_eq!(s.name, None);
        assert_eq!(s.windows[0].window_id, None);
        assert_eq!(s.windows[0].app_name, "");
    }
}
