//! # K PLUS Statement Parser
//!
//! Turns the extracted text of a K PLUS account statement PDF into typed
//! transactions plus a list of lines that could not be classified.
//!
//! ## Pipeline
//!
//! 1. **Preprocess**: stitch fragmented physical lines into one candidate
//!    line per transaction and drop page headers and footers.
//! 2. **Classify**: match each candidate against the known transaction
//!    shapes (refcoded, transfer, deposit, bill payment, payroll).
//! 3. **Aggregate**: split transactions from errors and sort transactions
//!    newest first.
//!
//! ## Design Principles
//!
//! - **Errors are data**: a malformed line becomes a [`ParseError`] and never
//!   affects its neighbours
//! - **Exact decimals**: amounts use `rust_decimal` and keep their printed digits
//! - **Deterministic output**: the same text always yields the same result
//!
//! ## Example
//!
//! ```no_run
//! use kbank_statement::parse_statement;
//!
//! let text = std::fs::read_to_string("statement.txt").unwrap();
//! let parsed = parse_statement(&text);
//! parsed.write_transactions_csv(std::io::stdout()).unwrap();
//! ```

pub mod classifier;
pub mod decimal;
pub mod error;
pub mod preprocess;
pub mod statement;
pub mod transaction;

pub use classifier::classify;
pub use decimal::Amount;
pub use error::{Result, StatementError};
pub use preprocess::{preprocess, LineStitcher};
pub use statement::{parse_statement, ParsedStatement};
pub use transaction::{Classified, ParseError, ParseErrorKind, Transaction, TransactionType};
