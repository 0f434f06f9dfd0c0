use thiserror::Error;

/// Errors raised while building a graph or generating walks.
#[derive(Error, Debug)]
pub enum Error {
    /// An edge record could not be parsed into two node identifiers.
    #[error("Malformed edge on line {line}: {reason}")]
    MalformedEdge {
        /// 1-based line number in the edge stream.
        line: usize,
        /// What was wrong with the record.
        reason: String,
    },

    /// The edge stream yielded no edges.
    #[error("Empty graph: the edge stream contained no edges")]
    EmptyGraph,

    /// A walk or sampler parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for nodevec-core.
pub type Result<T> = std::result::Result<T, Error>;
