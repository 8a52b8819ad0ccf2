//! Error types for the voicebrush engine

use thiserror::Error;

/// Result type alias for voicebrush operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the voicebrush engine
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Capture backend could not be acquired or has stopped
    #[error("capture unavailable: {0}")]
    CaptureUnavailable(String),

    /// Drawing surface rejected an operation
    #[error("surface error: {0}")]
    Surface(String),

    /// Shape name has no generator
    #[error("unsupported shape: {0}")]
    UnsupportedShape(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
