//! Save and restore orchestration.
//!
//! [`SpaceManager`] composes the visibility filter, the identity resolver, and
//! the convergence engine over an injected [`WinOps`] backend and
//! [`StoreBackend`]. Work that touches windows is blocking (the engine sleeps
//! between corrections); the async entry points move it onto tokio's blocking
//! pool so callers on an interactive thread only await completion.

use std::{collections::HashSet, sync::Arc};

use parking_lot::Mutex;
use space_ids::{MonitorId, WindowId};
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use winops::{
    ConvergenceEngine, Error as WinOpsError, ScreenInfo, WinOps, WindowInfo, screen_for_frame,
    visible_in_stack,
};

use crate::{
    Error, Result,
    events::{EventBus, SpaceAction, SpaceEvent},
    model::{Slot, VirtualSpace, WindowRecord},
    persist::StoreBackend,
    report::{RestoreReport, SaveReport, SavedSpace, WindowRestore, WindowRestoreStatus},
    resolve::{Resolution, resolve_all},
    settings::{Settings, SpaceMode},
    store::VirtualSpacesStore,
};

struct Inner {
    ops: Arc<dyn WinOps>,
    backend: Arc<dyn StoreBackend>,
    store: Mutex<VirtualSpacesStore>,
    settings: Settings,
    events: EventBus,
    active: Mutex<Option<Slot>>,
}

/// Cheap, clonable handle to the save/restore orchestrator.
#[derive(Clone)]
pub struct SpaceManager {
    inner: Arc<Inner>,
}

impl SpaceManager {
    /// Build a manager, loading the store from `backend`.
    ///
    /// Corrupt persisted state is returned as an error rather than replaced
    /// with an empty store.
    pub fn new(
        ops: Arc<dyn WinOps>,
        backend: Arc<dyn StoreBackend>,
        settings: Settings,
    ) -> Result<Self> {
        let store = backend.load()?;
        Ok(Self {
            inner: Arc::new(Inner {
                ops,
                backend,
                store: Mutex::new(store),
                settings,
                events: EventBus::default(),
                active: Mutex::new(None),
            }),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// Copy of the current store.
    pub fn store(&self) -> VirtualSpacesStore {
        self.inner.store.lock().clone()
    }

    pub fn get(&self, monitor: &MonitorId, slot: Slot) -> Option<VirtualSpace> {
        self.inner.store.lock().get(monitor, slot).cloned()
    }

    /// Slot most recently activated, if any.
    pub fn active_slot(&self) -> Option<Slot> {
        *self.inner.active.lock()
    }

    /// Monitor operations act on in per-monitor mode: the monitor holding the
    /// focused window, else the first screen.
    pub fn active_monitor(&self) -> Result<MonitorId> {
        let screens = self.inner.ops.screens();
        active_monitor_in(self.inner.ops.as_ref(), &screens)
    }

    fn require_permission(&self) -> Result<()> {
        if self.inner.ops.permission_granted() {
            Ok(())
        } else {
            warn!("spaces: window manipulation permission denied");
            Err(Error::PermissionDenied)
        }
    }

    fn persist(&self, store: &VirtualSpacesStore) -> Result<()> {
        self.inner.backend.save(store)
    }

    fn emit(
        &self,
        action: SpaceAction,
        monitor: &MonitorId,
        slot: Option<Slot>,
        store: &VirtualSpacesStore,
    ) {
        let space = slot.and_then(|s| store.get(monitor, s));
        self.inner
            .events
            .emit(SpaceEvent::new(action, monitor, slot, space, store));
    }

    // ----- save ---------------------------------------------------------------

    /// Capture the visible windows into `slot`.
    pub fn save_blocking(&self, slot: Slot) -> Result<SaveReport> {
        self.require_permission()?;
        let ops = self.inner.ops.as_ref();
        let screens = ops.screens();
        if screens.is_empty() {
            return Err(Error::NoScreens);
        }
        let windows = ops.list_windows();
        let frames: Vec<_> = windows.iter().map(|w| w.frame).collect();
        let visible: HashSet<usize> =
            visible_in_stack(&frames, self.inner.settings.visibility_threshold)
                .into_iter()
                .collect();

        let monitors = match self.inner.settings.mode {
            SpaceMode::PerMonitor => vec![active_monitor_in(ops, &screens)?],
            SpaceMode::Shared => screens.iter().map(|s| s.id.clone()).collect(),
        };

        let mut report = SaveReport {
            slot,
            spaces: Vec::new(),
        };
        let mut store = self.inner.store.lock();
        for monitor in &monitors {
            let mut records = Vec::new();
            let mut hidden = 0;
            for (idx, w) in windows.iter().enumerate() {
                if screen_for_frame(&screens, &w.frame).map(|s| &s.id) != Some(monitor) {
                    continue;
                }
                if !visible.contains(&idx) {
                    debug!("save: {} '{}' mostly hidden, skipped", w.app_id, w.title);
                    hidden += 1;
                    continue;
                }
                records.push(WindowRecord::capture(w, records.len() as u32));
            }
            let mut space = VirtualSpace::new(slot, monitor.clone(), records);
            space.name = store.get(monitor, slot).and_then(|s| s.name.clone());
            report.spaces.push(SavedSpace {
                monitor: monitor.clone(),
                windows: space.windows.len(),
                hidden,
            });
            store.set(space, monitor);
        }
        self.persist(&store)?;
        for monitor in &monitors {
            self.emit(SpaceAction::Save, monitor, Some(slot), &store);
        }
        info!(
            "save: slot={} windows={} monitors={}",
            slot,
            report.window_count(),
            monitors.len()
        );
        Ok(report)
    }

    // ----- restore ------------------------------------------------------------

    /// Restore `slot` on every applicable connected monitor.
    pub fn restore_blocking(&self, slot: Slot, cancel: &CancellationToken) -> Result<RestoreReport> {
        let report = self.restore_inner(slot, cancel)?;
        let store = self.inner.store.lock();
        for monitor in &report.restored_monitors {
            self.emit(SpaceAction::Restore, monitor, Some(slot), &store);
        }
        Ok(report)
    }

    fn restore_inner(&self, slot: Slot, cancel: &CancellationToken) -> Result<RestoreReport> {
        self.require_permission()?;
        let ops = self.inner.ops.as_ref();
        let screens = ops.screens();
        if screens.is_empty() {
            return Err(Error::NoScreens);
        }
        let connected: HashSet<&MonitorId> = screens.iter().map(|s| &s.id).collect();

        let mut report = RestoreReport {
            slot: Some(slot),
            ..RestoreReport::default()
        };
        let spaces: Vec<VirtualSpace> = {
            let store = self.inner.store.lock();
            let candidates = match self.inner.settings.mode {
                SpaceMode::PerMonitor => vec![active_monitor_in(ops, &screens)?],
                SpaceMode::Shared => store.monitors_with(slot),
            };
            let mut out = Vec::new();
            for monitor in candidates {
                if !connected.contains(&monitor) {
                    info!("restore: monitor {} not connected; layout kept", monitor);
                    report.disconnected_monitors.push(monitor);
                    continue;
                }
                if let Some(space) = store.get(&monitor, slot) {
                    out.push(space.clone());
                }
            }
            out
        };
        if spaces.is_empty() {
            info!("restore: nothing saved in slot {}", slot);
            return Ok(report);
        }

        // Handles are only valid for this enumeration.
        let live = ops.list_windows();
        let engine = ConvergenceEngine::new(ops, self.inner.settings.converge_options());
        let mut claimed: HashSet<WindowId> = HashSet::new();
        for space in &spaces {
            report.restored_monitors.push(space.display_id.clone());
            let records = space.windows_in_restore_order();
            let resolved = resolve_all(
                &records,
                &live,
                &mut claimed,
                self.inner.settings.frame_match_tolerance,
            );
            let mut plan: Vec<(&WindowRecord, WindowInfo)> = Vec::new();
            for (rec, res) in records.into_iter().zip(resolved) {
                match res {
                    Resolution::Found(win) => plan.push((rec, win)),
                    Resolution::NotFound(why) => {
                        warn!("restore: skipping {} '{}': {}", rec.app_id, rec.title, why);
                        report.windows.push(entry(
                            &space.display_id,
                            rec,
                            None,
                            WindowRestoreStatus::Skipped(why),
                        ));
                    }
                }
            }
            // Back to front: each raise lands above everything raised before it.
            for (rec, win) in plan {
                if cancel.is_cancelled() {
                    report.cancelled = true;
                    report.windows.push(entry(
                        &space.display_id,
                        rec,
                        Some(win.id),
                        WindowRestoreStatus::Cancelled,
                    ));
                    continue;
                }
                let status = restore_window(ops, &engine, rec, &win)?;
                report
                    .windows
                    .push(entry(&space.display_id, rec, Some(win.id), status));
            }
        }
        info!(
            "restore: slot={} ok={} skipped={} total={}{}",
            slot,
            report.success_count(),
            report.skipped_count(),
            report.windows.len(),
            if report.cancelled { " (cancelled)" } else { "" }
        );
        Ok(report)
    }

    // ----- activate / deactivate ------------------------------------------------

    /// Restore `slot` and remember it as the active slot.
    pub fn activate_blocking(&self, slot: Slot, cancel: &CancellationToken) -> Result<RestoreReport> {
        let report = self.restore_inner(slot, cancel)?;
        *self.inner.active.lock() = Some(slot);
        let monitor = self.active_monitor()?;
        let store = self.inner.store.lock();
        self.emit(SpaceAction::Activate, &monitor, Some(slot), &store);
        Ok(report)
    }

    /// Forget the active slot, returning it.
    pub fn deactivate(&self) -> Result<Option<Slot>> {
        let previous = self.inner.active.lock().take();
        let monitor = self.active_monitor()?;
        let store = self.inner.store.lock();
        self.emit(SpaceAction::Deactivate, &monitor, previous, &store);
        Ok(previous)
    }

    // ----- clear / rename -------------------------------------------------------

    fn slot_targets(&self, store: &VirtualSpacesStore, slot: Slot) -> Result<Vec<MonitorId>> {
        Ok(match self.inner.settings.mode {
            SpaceMode::PerMonitor => vec![self.active_monitor()?],
            SpaceMode::Shared => store.monitors_with(slot),
        })
    }

    /// Remove `slot`; in shared mode from every monitor. Returns the number of
    /// spaces removed.
    pub fn clear_blocking(&self, slot: Slot) -> Result<usize> {
        let mut store = self.inner.store.lock();
        let monitors = self.slot_targets(&store, slot)?;
        let removed = monitors
            .iter()
            .filter(|m| store.remove(m, slot).is_some())
            .count();
        if removed > 0 {
            self.persist(&store)?;
        }
        for monitor in &monitors {
            self.emit(SpaceAction::Clear, monitor, Some(slot), &store);
        }
        info!("clear: slot={} removed={}", slot, removed);
        Ok(removed)
    }

    /// Set or clear the display name of `slot`; in shared mode on every
    /// monitor. Returns the number of spaces renamed.
    pub fn rename_blocking(&self, slot: Slot, name: Option<String>) -> Result<usize> {
        let mut store = self.inner.store.lock();
        let monitors = self.slot_targets(&store, slot)?;
        let renamed = monitors
            .iter()
            .filter(|m| store.rename(m, slot, name.clone()))
            .count();
        if renamed > 0 {
            self.persist(&store)?;
        }
        for monitor in &monitors {
            self.emit(SpaceAction::Rename, monitor, Some(slot), &store);
        }
        Ok(renamed)
    }

    // ----- async entry points ---------------------------------------------------

    /// [`Self::save_blocking`] on the blocking pool.
    pub async fn save(&self, slot: Slot) -> Result<SaveReport> {
        let this = self.clone();
        task::spawn_blocking(move || this.save_blocking(slot)).await?
    }

    /// [`Self::restore_blocking`] on the blocking pool.
    pub async fn restore(&self, slot: Slot, cancel: CancellationToken) -> Result<RestoreReport> {
        let this = self.clone();
        task::spawn_blocking(move || this.restore_blocking(slot, &cancel)).await?
    }

    /// [`Self::activate_blocking`] on the blocking pool.
    pub async fn activate(&self, slot: Slot, cancel: CancellationToken) -> Result<RestoreReport> {
        let this = self.clone();
        task::spawn_blocking(move || this.activate_blocking(slot, &cancel)).await?
    }

    /// [`Self::clear_blocking`] on the blocking pool.
    pub async fn clear(&self, slot: Slot) -> Result<usize> {
        let this = self.clone();
        task::spawn_blocking(move || this.clear_blocking(slot)).await?
    }

    /// [`Self::rename_blocking`] on the blocking pool.
    pub async fn rename(&self, slot: Slot, name: Option<String>) -> Result<usize> {
        let this = self.clone();
        task::spawn_blocking(move || this.rename_blocking(slot, name)).await?
    }
}

fn active_monitor_in(ops: &dyn WinOps, screens: &[ScreenInfo]) -> Result<MonitorId> {
    let focused = ops
        .focused_window()
        .and_then(|w| screen_for_frame(screens, &w.frame));
    focused
        .or_else(|| screens.first())
        .map(|s| s.id.clone())
        .ok_or(Error::NoScreens)
}

fn entry(
    monitor: &MonitorId,
    rec: &WindowRecord,
    window_id: Option<WindowId>,
    status: WindowRestoreStatus,
) -> WindowRestore {
    WindowRestore {
        monitor: monitor.clone(),
        app_id: rec.app_id.clone(),
        title: rec.title.clone(),
        z_index: rec.z_index,
        window_id,
        status,
    }
}

/// Converge one window onto its record, then raise it.
///
/// Only a permission failure escapes: it ends the whole restore. Everything
/// else is recorded against this window and the batch continues.
fn restore_window(
    ops: &dyn WinOps,
    engine: &ConvergenceEngine<'_>,
    rec: &WindowRecord,
    win: &WindowInfo,
) -> Result<WindowRestoreStatus> {
    let status = match engine.apply(win.id, &rec.rect()) {
        Ok(outcome) => WindowRestoreStatus::from(outcome),
        Err(WinOpsError::Permission) => return Err(Error::PermissionDenied),
        Err(err @ WinOpsError::WindowGone(_)) => {
            warn!("restore: {} id={} failed: {}", rec.app_id, win.id, err);
            return Ok(WindowRestoreStatus::Failed(err.to_string()));
        }
        Err(err) => {
            // The window still exists; raise it so the stacking order holds.
            warn!("restore: {} id={} failed: {}", rec.app_id, win.id, err);
            WindowRestoreStatus::Failed(err.to_string())
        }
    };
    if let WindowRestoreStatus::GaveUp { last } = &status {
        warn!(
            "restore: {} id={} gave up at {} (target {})",
            rec.app_id,
            win.id,
            last,
            rec.rect()
        );
    }
    match ops.raise_window(win.id) {
        Ok(()) => Ok(status),
        Err(WinOpsError::Permission) => Err(Error::PermissionDenied),
        Err(err) => {
            warn!("restore: raise {} id={} failed: {}", rec.app_id, win.id, err);
            Ok(WindowRestoreStatus::Failed(err.to_string()))
        }
    }
}
