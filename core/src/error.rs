//! Error types for the IME catalog model.

use thiserror::Error;

/// Failures reported by an [`ImeService`](crate::ImeService) implementation.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("input method service unavailable: {0}")]
    Unavailable(String),

    #[error("unknown input method: {0}")]
    UnknownApp(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed service state: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections produced by the selection controller.
///
/// None of these are shown to the user; the controller logs them and leaves
/// its state unchanged.
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("index {index} out of range for catalog of {len} entries")]
    InvalidIndex { index: usize, len: usize },

    #[error("row context refers to a catalog that has since been reloaded")]
    StaleContext,

    #[error("{0} cannot be disabled")]
    Locked(String),

    #[error("no active input method")]
    NoActiveIme,

    #[error("{0} has no option window")]
    NoOption(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}
