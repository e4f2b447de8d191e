mod support;

use std::{fs, sync::Arc};

use spaces::{Error, JsonFileStore, Slot, SpaceManager, SpaceMode};
use winops::{
    MonitorId, Rect, WinOps,
    sim::{SimWinOps, SimWindow},
};

use support::*;

#[test]
fn buried_windows_are_not_saved() {
    let sim = three_window_scene();
    // Entirely behind A.
    sim.add_window(SimWindow::new(4, "com.example.hidden", Rect::new(10.0, 10.0, 100.0, 100.0)));
    let (mgr, _) = manager(&sim, fast_settings(SpaceMode::PerMonitor));

    let report = mgr.save_blocking(Slot::new(0)).unwrap();
    assert_eq!(report.window_count(), 3);
    assert_eq!(report.spaces[0].hidden, 1);

    let space = mgr.get(&MonitorId::from("main"), Slot::new(0)).unwrap();
    let by_z: Vec<(&str, u32)> = space
        .windows_by_z_order()
        .iter()
        .map(|w| (w.app_id.as_str(), w.z_index))
        .collect();
    assert_eq!(
        by_z,
        vec![("com.example.a", 0), ("com.example.b", 1), ("com.example.c", 2)]
    );
    assert_eq!(space.app_names(), vec!["Alpha", "Beta", "Gamma"]);
}

#[test]
fn resave_replaces_windows_but_keeps_name() {
    let sim = three_window_scene();
    let (mgr, backend) = manager(&sim, fast_settings(SpaceMode::PerMonitor));
    let slot = Slot::new(1);
    mgr.save_blocking(slot).unwrap();
    assert_eq!(mgr.rename_blocking(slot, Some("Writing".into())).unwrap(), 1);

    sim.remove_window(3);
    mgr.save_blocking(slot).unwrap();
    let space = mgr.get(&MonitorId::from("main"), slot).unwrap();
    assert_eq!(space.windows.len(), 2);
    assert_eq!(space.name.as_deref(), Some("Writing"));
    assert_eq!(backend.snapshot().unwrap(), mgr.store());
}

#[test]
fn per_monitor_mode_saves_only_the_focused_monitor() {
    let sim = Arc::new(SimWinOps::new(two_screens()));
    sim.add_window(SimWindow::new(1, "com.example.left", Rect::new(100.0, 100.0, 400.0, 300.0)));
    sim.add_window(SimWindow::new(2, "com.example.right", Rect::new(1100.0, 100.0, 400.0, 300.0)));
    sim.set_focused(2);
    let (mgr, _) = manager(&sim, fast_settings(SpaceMode::PerMonitor));

    assert_eq!(mgr.active_monitor().unwrap(), MonitorId::from("right"));
    let report = mgr.save_blocking(Slot::new(2)).unwrap();
    assert_eq!(report.spaces.len(), 1);
    assert_eq!(report.spaces[0].monitor, MonitorId::from("right"));
    assert!(mgr.get(&MonitorId::from("left"), Slot::new(2)).is_none());
    let right = mgr.get(&MonitorId::from("right"), Slot::new(2)).unwrap();
    assert_eq!(right.app_ids(), vec!["com.example.right"]);
}

#[test]
fn shared_mode_propagates_rename_and_clear() {
    let sim = Arc::new(SimWinOps::new(two_screens()));
    sim.add_window(SimWindow::new(1, "com.example.left", Rect::new(100.0, 100.0, 400.0, 300.0)));
    sim.add_window(SimWindow::new(2, "com.example.right", Rect::new(1100.0, 100.0, 400.0, 300.0)));
    let (mgr, _) = manager(&sim, fast_settings(SpaceMode::Shared));
    let slot = Slot::new(5);
    mgr.save_blocking(slot).unwrap();
    mgr.save_blocking(Slot::new(6)).unwrap();

    assert_eq!(mgr.rename_blocking(slot, Some("Review".into())).unwrap(), 2);
    for id in ["left", "right"] {
        let space = mgr.get(&MonitorId::from(id), slot).unwrap();
        assert_eq!(space.name.as_deref(), Some("Review"));
    }

    assert_eq!(mgr.clear_blocking(slot).unwrap(), 2);
    for id in ["left", "right"] {
        assert!(mgr.get(&MonitorId::from(id), slot).is_none());
        assert!(mgr.get(&MonitorId::from(id), Slot::new(6)).is_some());
    }
    assert_eq!(mgr.clear_blocking(slot).unwrap(), 0);
}

#[test]
fn per_monitor_clear_leaves_other_monitors() {
    let sim = Arc::new(SimWinOps::new(two_screens()));
    sim.add_window(SimWindow::new(1, "com.example.left", Rect::new(100.0, 100.0, 400.0, 300.0)));
    sim.add_window(SimWindow::new(2, "com.example.right", Rect::new(1100.0, 100.0, 400.0, 300.0)));
    let (mgr, _) = manager(&sim, fast_settings(SpaceMode::PerMonitor));
    let slot = Slot::new(3);

    sim.set_focused(1);
    mgr.save_blocking(slot).unwrap();
    sim.set_focused(2);
    mgr.save_blocking(slot).unwrap();

    assert_eq!(mgr.clear_blocking(slot).unwrap(), 1);
    assert!(mgr.get(&MonitorId::from("right"), slot).is_none());
    assert!(mgr.get(&MonitorId::from("left"), slot).is_some());
}

#[test]
fn json_store_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spaces.json");
    let sim = three_window_scene();
    let ops: Arc<dyn WinOps> = sim.clone();

    let first = SpaceManager::new(
        ops.clone(),
        Arc::new(JsonFileStore::new(&path)),
        fast_settings(SpaceMode::PerMonitor),
    )
    .unwrap();
    first.save_blocking(Slot::new(7)).unwrap();
    first.rename_blocking(Slot::new(7), Some("Docs".into())).unwrap();

    let second = SpaceManager::new(
        ops,
        Arc::new(JsonFileStore::new(&path)),
        fast_settings(SpaceMode::PerMonitor),
    )
    .unwrap();
    assert_eq!(second.store(), first.store());
    let space = second.get(&MonitorId::from("main"), Slot::new(7)).unwrap();
    assert_eq!(space.name.as_deref(), Some("Docs"));
    assert_eq!(space.windows.len(), 3);
}

#[test]
fn corrupt_store_is_reported_not_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spaces.json");
    fs::write(&path, "{\"main\": {\"1\": 17}}").unwrap();
    let sim = three_window_scene();

    let result = SpaceManager::new(
        sim,
        Arc::new(JsonFileStore::new(&path)),
        fast_settings(SpaceMode::PerMonitor),
    );
    assert!(matches!(result, Err(Error::Decode { .. })));
    // The corrupt document is left for the user to inspect.
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"main\": {\"1\": 17}}");
}
