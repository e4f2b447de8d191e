use thiserror::Error;

use crate::WindowId;

/// Errors that can occur during window operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Window manipulation permission is required but not granted.
    #[error("Window manipulation permission missing")]
    Permission,

    /// The window disappeared (closed, or its owner quit) during the operation.
    #[error("Window {0} is gone")]
    WindowGone(WindowId),

    /// The requested attribute or operation is not supported by the window.
    #[error("Unsupported attribute")]
    Unsupported,

    /// The window-manager backend reported an error.
    #[error("Window backend error: {0}")]
    Backend(String),
}

/// Result alias for window operations.
pub type Result<T> = std::result::Result<T, Error>;
