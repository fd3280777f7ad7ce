//! Error types for the statement parser.
//!
//! Individual statement lines that fail to classify are not errors in this
//! sense; they are reported as [`ParseError`](crate::ParseError) records.

use thiserror::Error;

/// Result type alias for statement operations
pub type Result<T> = std::result::Result<T, StatementError>;

/// Errors that can occur around the parser: I/O, output encoding, arguments.
#[derive(Error, Debug)]
pub enum StatementError {
    /// Failed to read the input or write an output file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A figure that is not a non-negative decimal
    #[error("Invalid amount: {value:?}")]
    InvalidAmount { value: String },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: kbank-statement <extracted.txt> [output-dir]")]
    MissingArgument,

    /// Unexpected extra command line argument
    #[error("Unexpected argument {0:?}. Usage: kbank-statement <extracted.txt> [output-dir]")]
    InvalidArgument(String),
}
