use thiserror::Error;

/// Result type used by the filter / aggregate engine.
pub type DataResult<T> = Result<T, DataError>;

/// Failures of a single recomputation pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// A column the operation needs is not part of the table.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// A count or rate column holds a value that is not a number.
    #[error("row {row} column '{column}': expected a number, found '{raw}'")]
    NotNumeric {
        row: usize,
        column: String,
        raw: String,
    },

    /// Summing a count column ran past the `i64` range.
    #[error("sum of column '{0}' overflows")]
    Overflow(String),
}
