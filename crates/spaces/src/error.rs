use std::{io, path::PathBuf};

use thiserror::Error;
use tokio::task::JoinError;
use winops::Error as WinOpsError;

/// Errors surfaced by the spaces crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Window manipulation permission is not granted.
    #[error("Window manipulation permission denied")]
    PermissionDenied,

    /// The focused or target window disappeared mid-operation.
    #[error("Window not found")]
    WindowNotFound,

    /// The window manager reported no connected screens.
    #[error("No screens connected")]
    NoScreens,

    /// Persisted state exists but could not be decoded.
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// Failed to encode state for persistence.
    #[error("Failed to encode state: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Settings document could not be parsed.
    #[error("Invalid settings: {0}")]
    Config(String),

    /// Malformed inbound control request.
    #[error("Invalid control request: {0}")]
    ControlParse(String),

    /// A background task panicked or was aborted.
    #[error("Background task failed: {0}")]
    Join(String),

    /// Window-manager failure not covered by a more specific variant.
    #[error("Window operation failed: {0}")]
    WinOps(WinOpsError),
}

impl From<WinOpsError> for Error {
    fn from(err: WinOpsError) -> Self {
        match err {
            WinOpsError::Permission => Self::PermissionDenied,
            WinOpsError::WindowGone(_) => Self::WindowNotFound,
            other => Self::WinOps(other),
        }
    }
}

impl From<JoinError> for Error {
    fn from(err: JoinError) -> Self {
        Self::Join(err.to_string())
    }
}

/// Result alias for the spaces crate.
pub type Result<T> = std::result::Result<T, Error>;
