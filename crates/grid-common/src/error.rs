//! Error types shared by the grid coordinate crates.

use thiserror::Error;

/// Result type alias using GridError.
pub type GridResult<T> = Result<T, GridError>;

/// Primary error type for axis, coordinate system and vertical transform operations.
#[derive(Debug, Error)]
pub enum GridError {
    // === Invalid arguments ===
    #[error("Index {index} out of range [0, {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Shape mismatch for '{name}': expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    // === Invalid state ===
    #[error("Invalid state: {0}")]
    InvalidState(String),

    // === Formula resolution ===
    #[error("Vertical transform '{transform}' is missing formula term '{term}'")]
    MissingFormulaTerm { transform: String, term: String },

    #[error("Formula term '{term}' of '{transform}' names variable '{variable}' which is not in the dataset")]
    UnresolvedFormulaTerm {
        transform: String,
        term: String,
        variable: String,
    },

    #[error("Unknown vertical transform: {0}")]
    UnknownTransform(String),

    // === Time ===
    #[error("Time index {index} out of bounds for {ntimes} time steps")]
    InvalidTimeIndex { index: usize, ntimes: usize },

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    // === Collaborator failures ===
    #[error(transparent)]
    Read(Box<dyn std::error::Error + Send + Sync>),
}

/// Broad classification of a [`GridError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    InvalidState,
    UnresolvableFormula,
    Read,
}

impl GridError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an InvalidState error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create an InvalidRange error.
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    /// Wrap a failure reported by a dataset reader. The source error is kept as is.
    pub fn read<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Read(Box::new(err))
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GridError::IndexOutOfRange { .. }
            | GridError::InvalidArgument(_)
            | GridError::InvalidRange(_)
            | GridError::ShapeMismatch { .. }
            | GridError::InvalidTimeIndex { .. }
            | GridError::InvalidTime(_) => ErrorKind::InvalidArgument,

            GridError::InvalidState(_) => ErrorKind::InvalidState,

            GridError::MissingFormulaTerm { .. }
            | GridError::UnresolvedFormulaTerm { .. }
            | GridError::UnknownTransform(_) => ErrorKind::UnresolvableFormula,

            GridError::Read(_) => ErrorKind::Read,
        }
    }
}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        GridError::Read(Box::new(err))
    }
}
