//! Command-line interface definitions for tilespace.

use std::{env, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface for the `tilespace` binary.
#[derive(Parser, Debug)]
#[command(
    name = "tilespace",
    about = "Inspect and exercise saved window layouts",
    version
)]
pub struct Cli {
    /// Logging controls shared across tilespace binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Path to the JSON layout store. Defaults to ~/.tilespace/spaces.json.
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Optional RON settings file.
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Which command to run.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Store path from `--store`, else the per-user default.
    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(default_store_path)
    }
}

/// `$HOME/.tilespace/spaces.json`.
pub fn default_store_path() -> PathBuf {
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".tilespace");
    p.push("spaces.json");
    p
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every monitor and its non-empty slots.
    List,
    /// Print the windows saved in one slot.
    Show(SlotArgs),
    /// Delete a saved slot.
    Clear(SlotArgs),
    /// Name or unname a saved slot.
    Rename(RenameArgs),
    /// Save, scramble and restore a scripted scene of simulated windows.
    Simulate(SimulateArgs),
}

/// Selects a slot, optionally on a single monitor.
#[derive(Args, Debug, Clone)]
pub struct SlotArgs {
    /// Slot number (0-9).
    #[arg(value_parser = clap::value_parser!(u8).range(0..=9))]
    pub slot: u8,

    /// Restrict to one monitor; all monitors holding the slot otherwise.
    #[arg(long, value_name = "ID")]
    pub monitor: Option<String>,
}

/// Arguments for `rename`.
#[derive(Args, Debug, Clone)]
pub struct RenameArgs {
    /// Slot to rename.
    #[command(flatten)]
    pub target: SlotArgs,

    /// New name; omit to clear the name.
    pub name: Option<String>,
}

/// Arguments for `simulate`.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Slot to save into and restore from.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub slot: u8,

    /// Frame reads before a simulated window applies a geometry request.
    #[arg(long, default_value_t = 1)]
    pub latency: u32,

    /// Settle delay after each geometry request (overrides the settings file).
    #[arg(long, value_parser = humantime::parse_duration, value_name = "DURATION")]
    pub settle: Option<Duration>,

    /// Write the simulated layout into the store instead of a scratch store.
    #[arg(long)]
    pub persist: bool,
}
