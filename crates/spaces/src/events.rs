//! One-way notifications for external consumers such as status bars.

use std::collections::BTreeMap;

use serde::Serialize;
use space_ids::MonitorId;
use tokio::sync::broadcast;
use tracing::trace;

use crate::{
    model::{Slot, VirtualSpace},
    store::VirtualSpacesStore,
};

/// What happened to a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceAction {
    Save,
    Restore,
    Activate,
    Deactivate,
    Clear,
    Rename,
}

/// Per-slot summary included with every event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSummary {
    pub app_names: Vec<String>,
    pub name: Option<String>,
}

/// Event payload; serializes to the JSON consumed by status-bar integrations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceEvent {
    /// Slot acted on; `None` for a deactivate with no active slot.
    pub space_number: Option<Slot>,
    pub monitor_id: MonitorId,
    pub action: SpaceAction,
    pub app_ids: Vec<String>,
    pub app_names: Vec<String>,
    pub app_count: usize,
    /// Every non-empty slot on the monitor.
    pub slots: BTreeMap<Slot, SlotSummary>,
}

impl SpaceEvent {
    /// Build an event for `action` on `monitor`, describing `space` if any.
    pub fn new(
        action: SpaceAction,
        monitor: &MonitorId,
        slot: Option<Slot>,
        space: Option<&VirtualSpace>,
        store: &VirtualSpacesStore,
    ) -> Self {
        let (app_ids, app_names) = space
            .map(|s| (s.app_ids(), s.app_names()))
            .unwrap_or_default();
        Self {
            space_number: slot,
            monitor_id: monitor.clone(),
            action,
            app_count: app_ids.len(),
            app_ids,
            app_names,
            slots: slot_summaries(store, monitor),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Summaries for every non-empty slot on `monitor`.
pub fn slot_summaries(store: &VirtualSpacesStore, monitor: &MonitorId) -> BTreeMap<Slot, SlotSummary> {
    store
        .get_non_empty(monitor)
        .into_iter()
        .map(|s| {
            (
                s.number,
                SlotSummary {
                    app_names: s.app_names(),
                    name: s.name.clone(),
                },
            )
        })
        .collect()
}

/// Broadcast channel for [`SpaceEvent`]s. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SpaceEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SpaceEvent> {
        self.tx.subscribe()
    }

    /// Publish without blocking; events are dropped when nobody listens.
    pub fn emit(&self, event: SpaceEvent) {
        trace!("event: {:?} slot={:?}", event.action, event.space_number);
        self.tx.send(event).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Frame, WindowRecord};

    fn store_with_two_slots() -> (VirtualSpacesStore, MonitorId) {
        let m = MonitorId::from("main");
        let rec = |app: &str, z| WindowRecord {
            app_id: format!("com.{app}"),
            app_name: app.to_string(),
            title: String::new(),
            frame: Frame {
                x: 0.0,
                y: 0.0,
                w: 1.0,
                h: 1.0,
            },
            z_index: z,
            window_id: None,
            window_number: None,
        };
        let mut store = VirtualSpacesStore::new();
        let mut one = VirtualSpace::new(Slot::new(1), m.clone(), vec![rec("Term", 1), rec("Editor", 0)]);
        one.name = Some("Code".into());
        store.set(one, &m);
        store.set(VirtualSpace::new(Slot::new(2), m.clone(), Vec::new()), &m);
        (store, m)
    }

    #[test]
    fn event_serializes_with_camel_case_keys() {
        let (store, m) = store_with_two_slots();
        let space = store.get(&m, Slot::new(1));
        let ev = SpaceEvent::new(SpaceAction::Save, &m, Some(Slot::new(1)), space, &store);
        assert_eq!(ev.app_count, 2);
        assert_eq!(ev.app_names, vec!["Editor", "Term"]);
        let json = ev.to_json().unwrap();
        assert!(json.contains("\"spaceNumber\":1"), "{json}");
        assert!(json.contains("\"monitorId\":\"main\""), "{json}");
        assert!(json.contains("\"action\":\"save\""), "{json}");
        assert!(json.contains("\"appIds\":[\"com.Editor\",\"com.Term\"]"), "{json}");
        assert!(json.contains("\"slots\":{\"1\":{\"appNames\":[\"Editor\",\"Term\"],\"name\":\"Code\"}}"), "{json}");
    }

    #[tokio::test]
    async fn subscribers_receive_events_and_missing_ones_are_ignored() {
        let bus = EventBus::default();
        let (store, m) = store_with_two_slots();
        bus.emit(SpaceEvent::new(SpaceAction::Clear, &m, Some(Slot::new(3)), None, &store));
        let mut rx = bus.subscribe();
        bus.emit(SpaceEvent::new(SpaceAction::Deactivate, &m, None, None, &store));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.action, SpaceAction::Deactivate);
        assert_eq!(ev.app_count, 0);
        assert_eq!(ev.slots.len(), 1);
    }
}
