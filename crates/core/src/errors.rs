//! Core error types for the Keymote remote.
//!
//! This module defines transport-agnostic error types. The HTTP server and the
//! remote client translate these into status codes or user-facing messages.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the remote.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Library(#[from] LibraryError),

    #[error("{0}")]
    Presenter(#[from] PresenterError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid time '{0}'. Use M:SS or a number of seconds.")]
    InvalidTime(String),

    #[error("Timeline index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Entry {0} is not a break")]
    NotABreak(usize),

    #[error("No presentation is currently open")]
    NoCurrentPresentation,
}

/// Errors raised while browsing or resolving presentation files.
///
/// The messages are shown verbatim to the remote user.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Access denied.")]
    AccessDenied,

    #[error("{0}")]
    NotFound(String),

    #[error("Filename not provided.")]
    MissingFilename,

    #[error("Invalid filename. Absolute paths are not allowed.")]
    AbsolutePath,

    #[error("Invalid filename. Path traversal attempt detected.")]
    PathTraversal,
}

/// Errors raised by a presenter driver.
#[derive(Error, Debug)]
pub enum PresenterError {
    /// The scripting host (`osascript`) is not installed on this machine.
    #[error("This feature is only available on macOS.")]
    Unavailable,

    /// The script ran and exited non-zero; carries its stderr.
    #[error("{0}")]
    ScriptFailed(String),

    #[error("Failed to parse {0} from the presentation application.")]
    Parse(&'static str),
}

impl Error {
    /// True when the underlying failure is a missing presenter host.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Presenter(PresenterError::Unavailable))
    }
}
