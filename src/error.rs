//! Error types for symres.
//!
//! Only invalid caller input and unreadable record sets are errors. Per-item
//! anomalies (blank, unknown, ambiguous, withdrawn, duplicate queries) are
//! reported inside the batch outcomes and never surface here.

use thiserror::Error;

/// Validation errors raised before any item is processed.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required argument '{argument}' is empty")]
    EmptyArgument {
        argument: String,
    },
}

impl ValidationError {
    /// Creates an empty-argument error.
    #[must_use]
    pub fn empty(argument: impl Into<String>) -> Self {
        Self::EmptyArgument {
            argument: argument.into(),
        }
    }
}

/// Errors raised while reading a raw record set.
#[derive(Debug, Error)]
pub enum RecordSetError {
    #[error("Record set has no header row")]
    MissingHeader,

    #[error("Required column '{column}' is missing from the header")]
    MissingColumn {
        column: String,
    },

    #[error("Line {line} has {actual} cells, header has {expected}")]
    RowWidth {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Record set JSON is malformed: {message}")]
    Shape {
        message: String,
    },

    #[error("Failed to read record set: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse record set JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level error type for symres.
#[derive(Debug, Error)]
pub enum SymresError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Record set error: {0}")]
    RecordSet(#[from] RecordSetError),
}

impl SymresError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a record set error.
    #[must_use]
    pub const fn is_record_set(&self) -> bool {
        matches!(self, Self::RecordSet(_))
    }
}

/// Result type alias for symres operations.
pub type SymresResult<T> = Result<T, SymresError>;
