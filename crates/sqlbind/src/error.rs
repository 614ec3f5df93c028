//! Error types for sqlbind

use thiserror::Error;

/// Result type alias for fragment construction
pub type SqlBindResult<T> = Result<T, SqlBindError>;

/// Errors raised while building a fragment.
///
/// Rendering never fails; every variant here surfaces at the builder call that
/// received the offending input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqlBindError {
    /// A value of this kind cannot be written as a SQL literal
    #[error("Cannot escape {kind} value into a SQL literal")]
    UnsupportedEscape { kind: &'static str },

    /// VALUES needs at least one row
    #[error("VALUES requires at least one row")]
    EmptyValues,

    /// A VALUES row lacks a field present in the first row
    #[error("VALUES row {row} is missing field '{field}'")]
    MissingField { row: usize, field: String },

    /// The omission sentinel was used where a column cannot be dropped
    #[error("Field '{field}' is undefined; VALUES cannot omit columns")]
    UndefinedValue { field: String },
}

impl SqlBindError {
    /// Create an unsupported-escape error for the given value kind
    pub fn unsupported_escape(kind: &'static str) -> Self {
        Self::UnsupportedEscape { kind }
    }

    /// Create a missing-field error
    pub fn missing_field(row: usize, field: impl Into<String>) -> Self {
        Self::MissingField {
            row,
            field: field.into(),
        }
    }

    /// Check if this error comes from the escaping fallback
    pub fn is_unsupported_escape(&self) -> bool {
        matches!(self, Self::UnsupportedEscape { .. })
    }

    /// Check if this error comes from a malformed VALUES input
    pub fn is_values_shape(&self) -> bool {
        matches!(
            self,
            Self::EmptyValues | Self::MissingField { .. } | Self::UndefinedValue { .. }
        )
    }
}
