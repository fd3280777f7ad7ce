//! K PLUS statement parser CLI
//!
//! Reads text already extracted from a statement PDF and writes the parsed
//! transactions.
//!
//! # Usage
//!
//! ```bash
//! # Transactions as CSV on stdout
//! cargo run -- statement.txt > transactions.csv
//!
//! # raw.txt, lines.log, transactions.json and errors.json in logs/
//! cargo run -- statement.txt logs
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug`, `info` or `warn` to control logging verbosity

use kbank_statement::{parse_statement, ParsedStatement, Result, StatementError};
use log::info;
use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (input_path, output_dir) = match args.as_slice() {
        [] => return Err(StatementError::MissingArgument),
        [input] => (input, None),
        [input, dir] => (input, Some(dir)),
        [_, _, extra, ..] => return Err(StatementError::InvalidArgument(extra.clone())),
    };

    let text = fs::read_to_string(input_path)?;
    let parsed = parse_statement(&text);

    match output_dir {
        Some(dir) => write_reports(Path::new(dir), &text, &parsed)?,
        None => {
            let stdout = io::stdout();
            let handle = stdout.lock();
            parsed.write_transactions_csv(handle)?;
            info!("{} transactions available.", parsed.transactions.len());
        }
    }

    Ok(())
}

/// Writes the raw text, candidate lines, transactions and errors into `dir`.
fn write_reports(dir: &Path, text: &str, parsed: &ParsedStatement) -> Result<()> {
    fs::create_dir_all(dir)?;

    fs::write(dir.join("raw.txt"), text)?;
    parsed.write_lines(BufWriter::new(File::create(dir.join("lines.log"))?))?;
    parsed.write_transactions_json(BufWriter::new(File::create(
        dir.join("transactions.json"),
    )?))?;
    parsed.write_errors_json(BufWriter::new(File::create(dir.join("errors.json"))?))?;

    println!("{} transactions available.", parsed.transactions.len());
    Ok(())
}
