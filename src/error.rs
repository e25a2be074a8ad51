use thiserror::Error;

/// A required column is absent or holds a value of the wrong kind.
///
/// `row` is the index of the offending record within the slice handed to the
/// engine, so callers can point at the bad line of the source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("row {row}: missing column '{column}'")]
    MissingColumn { column: String, row: usize },

    #[error("row {row}: column '{column}' is not numeric (got '{value}')")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("row {row}: column '{column}' is not a calendar date (got '{value}')")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },
}

impl SchemaError {
    /// Name of the column the error refers to.
    pub fn column(&self) -> &str {
        match self {
            SchemaError::MissingColumn { column, .. }
            | SchemaError::NotNumeric { column, .. }
            | SchemaError::InvalidDate { column, .. } => column,
        }
    }
}
