//! RON settings for saving and restoring spaces.

use std::{fs, path::Path};

use serde::Deserialize;
use winops::{ConvergeOptions, SettleTiming, VISIBILITY_THRESHOLD};

use crate::{Error, Result, resolve::FRAME_MATCH_TOLERANCE};

/// How saved spaces relate to monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SpaceMode {
    /// Each monitor has its own independent set of slots; operations act on
    /// the active monitor only.
    #[default]
    PerMonitor,
    /// A slot spans every monitor: saving writes one space per connected
    /// monitor, and clear/rename propagate to all of them.
    Shared,
}

/// Tunables, every one optional in the RON document.
///
/// ```ron
/// (tolerance: 8.0, settle_ms: 30, mode: Shared)
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Position/size tolerance for convergence.
    pub tolerance: f64,
    pub max_attempts: u32,
    pub stuck_limit: u32,
    pub safe_zone_retries: u32,
    /// Settle delay after each geometry request, in milliseconds.
    pub settle_ms: u64,
    /// Minimum visible percentage for a window to be saved.
    pub visibility_threshold: f64,
    /// Per-component distance for frame-based identity matching.
    pub frame_match_tolerance: f64,
    pub mode: SpaceMode,
}

impl Default for Settings {
    fn default() -> Self {
        let converge = ConvergeOptions::default();
        Self {
            tolerance: converge.tolerance,
            max_attempts: converge.max_attempts,
            stuck_limit: converge.stuck_limit,
            safe_zone_retries: converge.safe_zone_retries,
            settle_ms: converge.timing.settle_ms,
            visibility_threshold: VISIBILITY_THRESHOLD,
            frame_match_tolerance: FRAME_MATCH_TOLERANCE,
            mode: SpaceMode::default(),
        }
    }
}

impl Settings {
    /// Parse settings from RON text.
    pub fn from_ron(text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load settings from a RON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Engine options derived from these settings.
    pub fn converge_options(&self) -> ConvergeOptions {
        ConvergeOptions {
            tolerance: self.tolerance,
            max_attempts: self.max_attempts,
            stuck_limit: self.stuck_limit,
            safe_zone_retries: self.safe_zone_retries,
            timing: SettleTiming {
                settle_ms: self.settle_ms,
            },
        }
    }
}
