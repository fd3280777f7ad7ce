//! Statement aggregation and output.
//!
//! Runs the stitcher and classifier over a statement's extracted text and
//! splits the results into transactions and parse errors.

use crate::classifier::classify;
use crate::error::Result;
use crate::preprocess::preprocess;
use crate::transaction::{Classified, ParseError, Transaction};
use log::info;
use std::io::Write;

/// Result of parsing one statement.
///
/// # Ordering
///
/// Transactions are sorted by date, newest first. The sort is stable, so
/// transactions sharing a timestamp keep their statement order. Errors and
/// candidate lines keep statement order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStatement {
    pub transactions: Vec<Transaction>,
    pub errors: Vec<ParseError>,

    /// Stitched candidate lines, exposed for diagnostics.
    pub lines: Vec<String>,
}

/// Parses the extracted text of a statement.
///
/// This never fails: lines that cannot be classified end up in
/// [`ParsedStatement::errors`], and an input without any transaction simply
/// produces empty collections.
///
/// # Example
///
/// ```
/// use kbank_statement::{parse_statement, TransactionType};
///
/// let text = "01-02-2310:15K+  1,234.56Ref Code ODD12345Direct Debit100.00";
/// let parsed = parse_statement(text);
/// assert_eq!(parsed.transactions.len(), 1);
/// assert_eq!(parsed.transactions[0].tx_type, TransactionType::DirectDebit);
/// ```
pub fn parse_statement(text: &str) -> ParsedStatement {
    ParsedStatement::from_lines(preprocess(text))
}

impl ParsedStatement {
    /// Classifies already stitched candidate lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut transactions = Vec::new();
        let mut errors = Vec::new();

        for line in &lines {
            match classify(line) {
                Classified::Transaction(tx) => transactions.push(tx),
                Classified::Error(err) => errors.push(err),
                Classified::Skip => {}
            }
        }

        transactions.sort_by(|a, b| b.date.cmp(&a.date));

        info!(
            "Parsed {} candidate lines: {} transactions, {} errors",
            lines.len(),
            transactions.len(),
            errors.len()
        );

        ParsedStatement {
            transactions,
            errors,
            lines,
        }
    }

    /// Writes transactions as a pretty-printed JSON array.
    pub fn write_transactions_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, &self.transactions)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes parse errors as a pretty-printed JSON array.
    pub fn write_errors_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, &self.errors)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the candidate lines joined by newlines.
    pub fn write_lines<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.lines.join("\n").as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Writes transactions to CSV, one row per transaction in sorted order.
    ///
    /// Amounts keep the decimal digits printed on the statement.
    pub fn write_transactions_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "type", "date", "channel", "ref", "ref2", "bank", "payee", "amount", "balance",
        ])?;

        for tx in &self.transactions {
            let date = tx.date.format("%Y-%m-%dT%H:%M:%S").to_string();
            let amount = tx.amount.to_string();
            let balance = tx.balance.to_string();

            csv_writer.write_record([
                tx.tx_type.as_str(),
                date.as_str(),
                tx.channel.as_str(),
                tx.reference.as_str(),
                tx.ref2.as_deref().unwrap_or(""),
                tx.bank.as_deref().unwrap_or(""),
                tx.payee.as_deref().unwrap_or(""),
                amount.as_str(),
                balance.as_str(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
