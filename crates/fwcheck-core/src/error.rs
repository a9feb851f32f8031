//! Error types for fwcheck.

use thiserror::Error;

use crate::WindowId;

/// Main error type for fwcheck operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The accessibility backend is not available on this platform
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A window vanished between enumeration and inspection
    #[error("Window gone: {0}")]
    WindowGone(WindowId),

    /// Invalid version pattern
    #[error("Invalid version pattern: {0}")]
    InvalidPattern(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// History store error
    #[error("History store error: {0}")]
    History(String),

    /// Invalid input or parameters (generic)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{0}")]
    Other(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
