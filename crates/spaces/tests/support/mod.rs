//! Scene builders shared by the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use spaces::{MemoryStore, Settings, SpaceManager, SpaceMode};
use winops::{
    Rect, ScreenInfo, WinOps,
    sim::{SimWinOps, SimWindow},
};

pub const SCREEN: Rect = Rect::new(0.0, 0.0, 1600.0, 900.0);

pub const FRAME_A: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);
pub const FRAME_B: Rect = Rect::new(400.0, 0.0, 400.0, 300.0);
pub const FRAME_C: Rect = Rect::new(800.0, 0.0, 400.0, 300.0);

pub fn fast_settings(mode: SpaceMode) -> Settings {
    Settings {
        settle_ms: 0,
        mode,
        ..Settings::default()
    }
}

/// One screen with windows A (1, front), B (2), C (3, back), side by side.
pub fn three_window_scene() -> Arc<SimWinOps> {
    let sim = SimWinOps::single_screen("main", SCREEN);
    sim.add_window(SimWindow::new(1, "com.example.a", FRAME_A).app_name("Alpha"));
    sim.add_window(SimWindow::new(2, "com.example.b", FRAME_B).app_name("Beta"));
    sim.add_window(SimWindow::new(3, "com.example.c", FRAME_C).app_name("Gamma"));
    Arc::new(sim)
}

/// Two side-by-side screens, "left" and "right".
pub fn two_screens() -> Vec<ScreenInfo> {
    let left = Rect::new(0.0, 0.0, 1000.0, 800.0);
    let right = Rect::new(1000.0, 0.0, 1000.0, 800.0);
    vec![
        ScreenInfo {
            id: "left".into(),
            frame: left,
            visible_frame: left,
        },
        ScreenInfo {
            id: "right".into(),
            frame: right,
            visible_frame: right,
        },
    ]
}

pub fn manager(sim: &Arc<SimWinOps>, settings: Settings) -> (SpaceManager, Arc<MemoryStore>) {
    let backend = Arc::new(MemoryStore::new());
    let ops: Arc<dyn WinOps> = sim.clone();
    let mgr = SpaceManager::new(ops, backend.clone(), settings).expect("manager");
    (mgr, backend)
}

/// Move every window somewhere else and invert the stacking order.
pub fn scramble(sim: &SimWinOps) {
    sim.set_frame(1, Rect::new(900.0, 500.0, 250.0, 200.0));
    sim.set_frame(2, Rect::new(50.0, 400.0, 600.0, 450.0));
    sim.set_frame(3, Rect::new(300.0, 200.0, 500.0, 300.0));
    sim.set_focused(2);
    sim.set_focused(3);
}

/// Like [`three_window_scene`], but B ignores every geometry request.
pub fn frozen_b_scene() -> Arc<SimWinOps> {
    let sim = SimWinOps::single_screen("main", SCREEN);
    sim.add_window(SimWindow::new(1, "com.example.a", FRAME_A));
    sim.add_window(SimWindow::new(2, "com.example.b", FRAME_B).frozen());
    sim.add_window(SimWindow::new(3, "com.example.c", FRAME_C));
    Arc::new(sim)
}
