//! Implementation for the `simulate` subcommand.
//!
//! Lays out a scripted scene of simulated windows on a grid, saves it into a
//! slot, scrambles positions and stacking, then restores and logs the outcome
//! for every window along with the convergence counters.

use std::{path::Path, sync::Arc};

use spaces::{
    JsonFileStore, MemoryStore, RestoreReport, Settings, Slot, SpaceManager, StoreBackend,
};
use tokio::{runtime::Runtime, signal};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use winops::{
    Rect, ScreenInfo, Size, WinOps, convergence_counters_reset, convergence_counters_snapshot,
    geom::grid_cell_rect,
    sim::{SimWinOps, SimWindow},
};

use crate::{cli::SimulateArgs, error::Result};

/// Full display bounds of the simulated monitor.
const SCREEN: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);
/// Display minus a 25pt menu bar.
const VISIBLE: Rect = Rect::new(0.0, 25.0, 1920.0, 1055.0);

/// Build the scene: four windows on a 2x2 grid plus one buried window that a
/// save leaves out.
pub fn scene(latency: u32) -> SimWinOps {
    let sim = SimWinOps::new(vec![ScreenInfo {
        id: "sim-main".into(),
        frame: SCREEN,
        visible_frame: VISIBLE,
    }]);
    let cell = |col, row| grid_cell_rect(&VISIBLE, 2, 2, col, row);
    sim.add_window(
        SimWindow::new(1, "com.example.editor", cell(0, 0))
            .app_name("Editor")
            .title("main.rs")
            .latency(latency),
    );
    sim.add_window(
        SimWindow::new(2, "com.example.browser", cell(1, 0))
            .app_name("Browser")
            .title("Docs")
            .latency(latency)
            .pin_right_edge(),
    );
    // Refuses to be as narrow as its cell, so restores at its own floor.
    let min_w = cell(0, 1).w + 120.0;
    sim.add_window(
        SimWindow::new(3, "com.example.terminal", cell(0, 1))
            .app_name("Terminal")
            .title("zsh")
            .latency(latency)
            .min_size(Size::new(min_w, 0.0)),
    );
    sim.add_window(
        SimWindow::new(4, "com.example.chat", cell(1, 1))
            .app_name("Chat")
            .title("General")
            .latency(latency),
    );
    let mut buried = cell(0, 0);
    buried.w /= 2.0;
    buried.h /= 2.0;
    sim.add_window(SimWindow::new(5, "com.example.buried", buried).app_name("Buried"));
    sim
}

/// Move every window somewhere else and reverse the stacking order.
pub fn scramble(sim: &SimWinOps) {
    let windows = sim.list_windows();
    for (i, w) in windows.iter().enumerate() {
        let offset = 60.0 * (i as f64 + 1.0);
        sim.set_frame(
            w.id,
            Rect::new(VISIBLE.x + offset, VISIBLE.y + offset, 640.0, 480.0),
        );
    }
    for w in &windows {
        sim.set_focused(w.id);
    }
}

/// Run the simulation workflow.
pub fn run(args: &SimulateArgs, mut settings: Settings, store_path: &Path) -> Result<()> {
    if let Some(settle) = args.settle {
        settings.settle_ms = settle.as_millis() as u64;
    }
    let backend: Arc<dyn StoreBackend> = if args.persist {
        info!(path = %store_path.display(), "simulated layout will be persisted");
        Arc::new(JsonFileStore::new(store_path))
    } else {
        Arc::new(MemoryStore::new())
    };

    let sim = Arc::new(scene(args.latency));
    let manager = SpaceManager::new(sim.clone(), backend, settings)?;
    let slot = Slot::new(i64::from(args.slot));
    let runtime = Runtime::new()?;

    convergence_counters_reset();
    let saved = runtime.block_on(manager.save(slot))?;
    for space in &saved.spaces {
        info!(
            monitor = %space.monitor,
            windows = space.windows,
            hidden = space.hidden,
            "saved slot {slot}"
        );
    }

    scramble(&sim);
    sim.clear_operations();
    info!(stacking = ?sim.stacking(), "scrambled");

    let cancel = CancellationToken::new();
    let report = runtime.block_on(async {
        let watcher = cancel.clone();
        let interrupt = tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                warn!("interrupt received; cancelling restore");
                watcher.cancel();
            }
        });
        let report = manager.restore(slot, cancel).await;
        interrupt.abort();
        report
    })?;
    log_report(&report);
    info!(stacking = ?sim.stacking(), operations = sim.operations().len(), "restored");

    let c = convergence_counters_snapshot();
    info!(
        runs = c.runs,
        converged = c.converged,
        accepted = c.accepted,
        gave_up = c.gave_up,
        attempts = c.attempts,
        "convergence counters"
    );
    Ok(())
}

/// One line per window, then a summary.
fn log_report(report: &RestoreReport) {
    for w in &report.windows {
        if w.status.is_success() {
            info!(app = %w.app_id, z = w.z_index, "{}", w.status);
        } else {
            warn!(app = %w.app_id, z = w.z_index, "{}", w.status);
        }
    }
    for monitor in &report.disconnected_monitors {
        warn!(%monitor, "monitor not connected; layout kept");
    }
    info!(
        succeeded = report.success_count(),
        skipped = report.skipped_count(),
        total = report.windows.len(),
        cancelled = report.cancelled,
        "restore finished"
    );
}

#[cfg(test)]
mod tests {
    use spaces::{SpaceMode, WindowRestoreStatus};

    use super::*;

    #[test]
    fn scene_round_trips_through_save_and_restore() {
        let sim = Arc::new(scene(1));
        let settings = Settings {
            settle_ms: 0,
            mode: SpaceMode::PerMonitor,
            ..Settings::default()
        };
        let manager =
            SpaceManager::new(sim.clone(), Arc::new(MemoryStore::new()), settings).unwrap();
        let slot = Slot::new(3);
        let saved = manager.save_blocking(slot).unwrap();
        assert_eq!(saved.window_count(), 4);
        assert_eq!(saved.spaces[0].hidden, 1);

        let before: Vec<Rect> = [1, 2, 4].iter().filter_map(|id| sim.frame(*id)).collect();
        scramble(&sim);
        assert_eq!(sim.stacking()[0], 5);

        let report = manager
            .restore_blocking(slot, &CancellationToken::new())
            .unwrap();
        assert_eq!(report.success_count(), 4);
        let after: Vec<Rect> = [1, 2, 4].iter().filter_map(|id| sim.frame(*id)).collect();
        assert_eq!(before, after);
        let terminal = report
            .windows
            .iter()
            .find(|w| w.app_id == "com.example.terminal")
            .unwrap();
        assert!(
            matches!(
                terminal.status,
                WindowRestoreStatus::AcceptedAtConstraint { .. }
            ),
            "{:?}",
            terminal.status
        );
        assert_eq!(&sim.stacking()[..4], &[1, 2, 3, 4]);
    }
}
