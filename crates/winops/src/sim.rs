//! In-memory window manager implementing [`WinOps`].
//!
//! `SimWinOps` models the behaviours that make real window placement hard:
//! geometry requests land only after a number of frame reads, applications
//! enforce minimum sizes, some windows re-anchor to the right screen edge
//! while resizing, and some report transitional frames before settling. It
//! backs the convergence tests, the orchestrator tests, and the CLI's
//! `simulate` command.

use std::collections::VecDeque;

use parking_lot::Mutex;
use space_ids::MonitorId;

use crate::{
    Error, Result, WindowId,
    geom::{Point, Rect, Size},
    ops::WinOps,
    window::{ScreenInfo, WindowInfo, screen_for_frame},
};

/// Operation recorded by the simulator, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum SimOp {
    Focus(WindowId),
    Raise(WindowId),
    SetPosition(WindowId, Point),
    SetSize(WindowId, Size),
}

/// Description of a simulated window.
#[derive(Debug, Clone)]
pub struct SimWindow {
    pub id: WindowId,
    pub app_id: String,
    pub app: String,
    pub title: String,
    pub pid: i32,
    pub window_number: Option<i64>,
    pub frame: Rect,
    /// Smallest size the application accepts.
    pub min_size: Option<Size>,
    /// Frame reads that pass before a geometry request takes effect.
    pub latency_reads: u32,
    /// Keep the right edge anchored when resizing while flush with the
    /// screen's right edge.
    pub pin_right_edge: bool,
    /// Ignore every geometry request.
    pub frozen: bool,
    /// Frames reported by successive reads before the real frame.
    pub read_script: Vec<Rect>,
}

impl SimWindow {
    /// A plain, immediately-responsive window.
    pub fn new(id: WindowId, app_id: impl Into<String>, frame: Rect) -> Self {
        let app_id = app_id.into();
        Self {
            id,
            app: app_id.clone(),
            app_id,
            title: String::new(),
            pid: 1000 + id as i32,
            window_number: None,
            frame,
            min_size: None,
            latency_reads: 0,
            pin_right_edge: false,
            frozen: false,
            read_script: Vec::new(),
        }
    }

    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app = name.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn pid(mut self, pid: i32) -> Self {
        self.pid = pid;
        self
    }

    pub fn window_number(mut self, number: i64) -> Self {
        self.window_number = Some(number);
        self
    }

    pub fn min_size(mut self, min: Size) -> Self {
        self.min_size = Some(min);
        self
    }

    pub fn latency(mut self, reads: u32) -> Self {
        self.latency_reads = reads;
        self
    }

    pub fn pin_right_edge(mut self) -> Self {
        self.pin_right_edge = true;
        self
    }

    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    pub fn read_script(mut self, frames: Vec<Rect>) -> Self {
        self.read_script = frames;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Change {
    Position(Point),
    Size(Size),
}

#[derive(Debug)]
struct Pending {
    remaining: u32,
    change: Change,
}

#[derive(Debug)]
struct WindowState {
    spec: SimWindow,
    frame: Rect,
    pending: Vec<Pending>,
    script: VecDeque<Rect>,
}

impl WindowState {
    fn info(&self, focused: bool) -> WindowInfo {
        WindowInfo {
            app_id: self.spec.app_id.clone(),
            app: self.spec.app.clone(),
            title: self.spec.title.clone(),
            pid: self.spec.pid,
            id: self.spec.id,
            window_number: self.spec.window_number,
            frame: self.frame,
            focused,
        }
    }
}

#[derive(Debug)]
struct SimState {
    /// Front-to-back stacking order.
    windows: Vec<WindowState>,
    screens: Vec<ScreenInfo>,
    focused: Option<WindowId>,
    permission: bool,
    ops: Vec<SimOp>,
}

impl SimState {
    fn index(&self, id: WindowId) -> Result<usize> {
        self.windows
            .iter()
            .position(|w| w.spec.id == id)
            .ok_or(Error::WindowGone(id))
    }

    fn check_permission(&self) -> Result<()> {
        if self.permission {
            Ok(())
        } else {
            Err(Error::Permission)
        }
    }

    fn bring_to_front(&mut self, idx: usize) {
        let win = self.windows.remove(idx);
        self.focused = Some(win.spec.id);
        self.windows.insert(0, win);
    }

    fn enqueue(&mut self, id: WindowId, change: Change) -> Result<()> {
        self.check_permission()?;
        let idx = self.index(id)?;
        let screens = self.screens.clone();
        let win = &mut self.windows[idx];
        if win.spec.frozen {
            return Ok(());
        }
        if win.spec.latency_reads == 0 {
            apply_change(win, change, &screens);
        } else {
            win.pending.push(Pending {
                remaining: win.spec.latency_reads,
                change,
            });
        }
        Ok(())
    }
}

fn apply_change(win: &mut WindowState, change: Change, screens: &[ScreenInfo]) {
    match change {
        Change::Position(p) => {
            win.frame.x = p.x;
            win.frame.y = p.y;
        }
        Change::Size(s) => {
            let (min_w, min_h) = win.spec.min_size.map_or((0.0, 0.0), |m| (m.w, m.h));
            let w = s.w.max(min_w);
            let h = s.h.max(min_h);
            if win.spec.pin_right_edge {
                let flush_right = screen_for_frame(screens, &win.frame)
                    .is_some_and(|scr| (scr.visible_frame.right() - win.frame.right()).abs() < 1.0);
                if flush_right {
                    win.frame.x = win.frame.right() - w;
                }
            }
            win.frame.w = w;
            win.frame.h = h;
        }
    }
}

/// Simulated window manager. See the module docs.
#[derive(Debug)]
pub struct SimWinOps {
    state: Mutex<SimState>,
}

impl SimWinOps {
    /// Simulator with the given screens and no windows.
    pub fn new(screens: Vec<ScreenInfo>) -> Self {
        Self {
            state: Mutex::new(SimState {
                windows: Vec::new(),
                screens,
                focused: None,
                permission: true,
                ops: Vec::new(),
            }),
        }
    }

    /// Simulator with one screen whose visible frame equals its frame.
    pub fn single_screen(id: impl Into<MonitorId>, frame: Rect) -> Self {
        Self::new(vec![ScreenInfo {
            id: id.into(),
            frame,
            visible_frame: frame,
        }])
    }

    /// Add a window behind every existing window.
    pub fn add_window(&self, spec: SimWindow) {
        let state = WindowState {
            frame: spec.frame,
            script: spec.read_script.iter().copied().collect(),
            pending: Vec::new(),
            spec,
        };
        self.state.lock().windows.push(state);
    }

    /// Close a window; further operations on it report `WindowGone`.
    pub fn remove_window(&self, id: WindowId) {
        let mut st = self.state.lock();
        st.windows.retain(|w| w.spec.id != id);
        if st.focused == Some(id) {
            st.focused = None;
        }
    }

    /// Teleport a window, dropping queued changes.
    pub fn set_frame(&self, id: WindowId, frame: Rect) {
        let mut st = self.state.lock();
        if let Some(win) = st.windows.iter_mut().find(|w| w.spec.id == id) {
            win.frame = frame;
            win.pending.clear();
        }
    }

    pub fn set_permission(&self, granted: bool) {
        self.state.lock().permission = granted;
    }

    pub fn set_screens(&self, screens: Vec<ScreenInfo>) {
        self.state.lock().screens = screens;
    }

    /// Focus a window and bring it to the front without recording an op.
    pub fn set_focused(&self, id: WindowId) {
        let mut st = self.state.lock();
        if let Ok(idx) = st.index(id) {
            st.bring_to_front(idx);
        }
    }

    /// Current frame, without advancing queued changes.
    pub fn frame(&self, id: WindowId) -> Option<Rect> {
        let st = self.state.lock();
        st.windows
            .iter()
            .find(|w| w.spec.id == id)
            .map(|w| w.frame)
    }

    /// Window ids front to back.
    pub fn stacking(&self) -> Vec<WindowId> {
        self.state.lock().windows.iter().map(|w| w.spec.id).collect()
    }

    pub fn operations(&self) -> Vec<SimOp> {
        self.state.lock().ops.clone()
    }

    pub fn clear_operations(&self) {
        self.state.lock().ops.clear();
    }

    /// Ids passed to `raise_window`, in call order.
    pub fn raise_order(&self) -> Vec<WindowId> {
        self.state
            .lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                SimOp::Raise(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl WinOps for SimWinOps {
    fn permission_granted(&self) -> bool {
        self.state.lock().permission
    }

    fn list_windows(&self) -> Vec<WindowInfo> {
        let st = self.state.lock();
        st.windows
            .iter()
            .map(|w| w.info(st.focused == Some(w.spec.id)))
            .collect()
    }

    fn screens(&self) -> Vec<ScreenInfo> {
        self.state.lock().screens.clone()
    }

    fn window_frame(&self, id: WindowId) -> Result<Rect> {
        let mut st = self.state.lock();
        let idx = st.index(id)?;
        let screens = st.screens.clone();
        let win = &mut st.windows[idx];
        let mut due = Vec::new();
        for p in &mut win.pending {
            p.remaining = p.remaining.saturating_sub(1);
            if p.remaining == 0 {
                due.push(p.change);
            }
        }
        win.pending.retain(|p| p.remaining > 0);
        for change in due {
            apply_change(win, change, &screens);
        }
        Ok(win.script.pop_front().unwrap_or(win.frame))
    }

    fn set_position(&self, id: WindowId, pos: Point) -> Result<()> {
        let mut st = self.state.lock();
        st.ops.push(SimOp::SetPosition(id, pos));
        st.enqueue(id, Change::Position(pos))
    }

    fn set_size(&self, id: WindowId, size: Size) -> Result<()> {
        let mut st = self.state.lock();
        st.ops.push(SimOp::SetSize(id, size));
        st.enqueue(id, Change::Size(size))
    }

    fn raise_window(&self, id: WindowId) -> Result<()> {
        let mut st = self.state.lock();
        st.check_permission()?;
        let idx = st.index(id)?;
        st.ops.push(SimOp::Raise(id));
        st.bring_to_front(idx);
        Ok(())
    }

    fn focus_window(&self, id: WindowId) -> Result<()> {
        let mut st = self.state.lock();
        st.check_permission()?;
        let idx = st.index(id)?;
        st.ops.push(SimOp::Focus(id));
        st.bring_to_front(idx);
        Ok(())
    }

    fn focused_window(&self) -> Option<WindowInfo> {
        let st = self.state.lock();
        let id = st.focused?;
        st.windows
            .iter()
            .find(|w| w.spec.id == id)
            .map(|w| w.info(true))
    }
}
