//! Error types for the nodevec pipeline.

use thiserror::Error;

/// Error type for pipeline runs.
#[derive(Error, Debug)]
pub enum Error {
    /// Graph loading or walk generation failed.
    #[error(transparent)]
    Core(#[from] nodevec_core::Error),

    /// Vocabulary, training or embedding I/O failed.
    #[error(transparent)]
    Nn(#[from] nodevec_nn::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for nodevec.
pub type Result<T> = std::result::Result<T, Error>;
