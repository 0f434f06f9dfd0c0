//! Error types for nodevec-nn.

use thiserror::Error;

/// Error type for vocabulary, training and embedding operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The walk corpus contained no tokens.
    #[error("Empty corpus: no walks were produced")]
    EmptyCorpus,

    /// Node never appeared in any walk, so it has no vector.
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// A line of an embedding file could not be parsed.
    #[error("Malformed embedding file on line {line}: {reason}")]
    MalformedEmbedding {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// A training parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from graph loading or walk generation.
    #[error(transparent)]
    Core(#[from] nodevec_core::Error),
}

/// Result type for nodevec-nn.
pub type Result<T> = std::result::Result<T, Error>;
