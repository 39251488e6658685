//! Error types for the tdlearn crate

use thiserror::Error;

/// Main error type for the tdlearn crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid bound: min {min} must be strictly less than max {max}")]
    InvalidBound { min: f64, max: f64 },

    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        context: String,
    },

    #[error("index {index} is out of range for a feature space of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("value {value} at position {index} is outside [{min}, {max}]")]
    OutOfBounds {
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("cannot enumerate continuous feature at position {index}")]
    ContinuousEnumeration { index: usize },

    #[error("malformed bound triple at token {position} ('{token}') in '{input}'")]
    BoundParse {
        position: usize,
        token: String,
        input: String,
    },

    #[error("multi-objective rewards not supported: reward has {dimensions} dimensions")]
    MultiObjectiveReward { dimensions: usize },

    #[error("cannot {operation} while brain is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unsupported brain save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("no brain stored under key '{key}'")]
    MissingBrain { key: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    pub(crate) fn dimension_mismatch(
        expected: usize,
        actual: usize,
        context: impl Into<String>,
    ) -> Self {
        Error::DimensionMismatch {
            expected,
            actual,
            context: context.into(),
        }
    }
}
