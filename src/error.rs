//! Error types for a capture run

use thiserror::Error;

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing a page
///
/// A region that matches nothing, or a capture that produced an empty file,
/// is not an error: both are reported as `None` by the functions involved.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to launch or configure the browser
    #[error("Browser initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load the target URL
    #[error("Failed to load URL: {0}")]
    LoadError(String),

    /// An in-page evaluation failed or returned something unexpected
    #[error("Script execution failed: {0}")]
    ScriptError(String),

    /// Screenshot capture failed
    #[error("Capture failed: {0}")]
    CaptureError(String),

    /// Invalid run configuration (bad URL, unreadable helper script, ...)
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Palette extraction failed for an image
    #[error("Color extraction failed: {0}")]
    Extraction(String),

    /// A background task panicked or was cancelled
    #[error("Task failed: {0}")]
    Task(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CDP-specific error
    #[cfg(feature = "cdp")]
    #[error("CDP error: {0}")]
    CdpError(String),
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::CdpError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Extraction(err.to_string())
    }
}
