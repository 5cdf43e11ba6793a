//! Error types for the hand pose estimation library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filter construction or reconfiguration error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// The static finger-to-joint layout is inconsistent
    #[error("Joint layout error: {0}")]
    LayoutError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Recorded frame file could not be read or written
    #[error("Recording error: {0}")]
    RecordingError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
