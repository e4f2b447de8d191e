//! Error handling for the tilespace binary.

use std::{io, result};

use space_ids::MonitorId;
use thiserror::Error;

/// Convenient result type for tilespace commands.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Errors surfaced by the spaces library.
    #[error("{0}")]
    Spaces(#[from] spaces::Error),
    /// The requested (monitor, slot) has no saved layout.
    #[error("no space saved in slot {slot} on monitor {monitor}")]
    NoSuchSpace {
        /// Monitor that was queried.
        monitor: MonitorId,
        /// Slot that was queried.
        slot: u8,
    },
    /// Generic error for unexpected conditions.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Helper for wrapping generic string errors.
    pub fn other<M: Into<String>>(msg: M) -> Self {
        Self::Other(msg.into())
    }
}
