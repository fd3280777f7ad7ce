//! Edge case tests for statement parsing.
//!
//! Exercises the public pipeline end to end: stitching, classification and
//! aggregation.

use chrono::{NaiveDate, NaiveDateTime};
use kbank_statement::{
    parse_statement, preprocess, ParseErrorKind, ParsedStatement, Transaction, TransactionType,
};

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn single_tx(line: &str) -> Transaction {
    let parsed = parse_statement(line);
    assert!(parsed.errors.is_empty(), "unexpected errors: {:?}", parsed.errors);
    assert_eq!(parsed.transactions.len(), 1);
    parsed.transactions[0].clone()
}

fn single_error(line: &str) -> ParseErrorKind {
    let parsed = parse_statement(line);
    assert!(parsed.transactions.is_empty());
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].line, line);
    parsed.errors[0].kind
}

/// Invariants that hold for any input.
fn check_invariants(parsed: &ParsedStatement) {
    let digit_lines = parsed
        .lines
        .iter()
        .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
        .count();
    assert_eq!(parsed.transactions.len() + parsed.errors.len(), digit_lines);
    assert!(parsed.transactions.len() + parsed.errors.len() <= parsed.lines.len());

    for pair in parsed.transactions.windows(2) {
        assert!(pair[0].date >= pair[1].date);
    }
    for tx in &parsed.transactions {
        assert!(!tx.channel.is_empty());
        assert!(!tx.reference.is_empty());
    }
}

// ==================== STATEMENT SCENARIOS ====================

#[test]
fn test_scenario_refcoded_direct_debit() {
    let tx = single_tx("01-02-2310:15K+  1,234.56Ref Code ODD12345Direct Debit100.00");
    assert_eq!(tx.tx_type, TransactionType::DirectDebit);
    assert_eq!(tx.date, dt(2023, 2, 1, 10, 15));
    assert_eq!(tx.channel, "K+  ");
    assert_eq!(tx.reference, "ODD12345");
    assert_eq!(tx.amount.to_string(), "100.00");
    assert_eq!(tx.balance.to_string(), "1234.56");
}

#[test]
fn test_scenario_promptpay_transfer() {
    let tx = single_tx(
        "05-06-2308:00ATM  5,000.00To KTB X1234 PromptPay X5678JOHN DOE++Transfer Withdrawal500.00",
    );
    assert_eq!(tx.tx_type, TransactionType::PromptPayTransfer);
    assert_eq!(tx.reference, "X1234");
    assert_eq!(tx.ref2.as_deref(), Some("X5678"));
    assert_eq!(tx.bank.as_deref(), Some("KTB"));
    assert_eq!(tx.payee.as_deref(), Some("JOHN DOE"));
    assert_eq!(tx.amount.to_string(), "500.00");
    assert_eq!(tx.balance.to_string(), "5000.00");
}

#[test]
fn test_scenario_transfer_deposit() {
    let tx = single_tx("10-10-2309:30K+  9,000.00From SCB X9999 JANE DOE++Transfer Deposit1,000.00");
    assert_eq!(tx.tx_type, TransactionType::TransferDeposit);
    assert_eq!(tx.reference, "X9999");
    assert_eq!(tx.bank.as_deref(), Some("SCB"));
    assert_eq!(tx.payee.as_deref(), Some("JANE DOE"));
    assert_eq!(tx.amount.to_string(), "1000.00");
    assert_eq!(tx.balance.to_string(), "9000.00");
}

#[test]
fn test_scenario_bill_payment() {
    let tx = single_tx("15-11-2312:00K+  2,500.00Paid for Ref XA1B2 TRUE-H Payment250.50");
    assert_eq!(tx.tx_type, TransactionType::Payment);
    assert_eq!(tx.reference, "XA1B2");
    assert_eq!(tx.payee.as_deref(), Some("TRUE-H "));
    assert_eq!(tx.amount.to_string(), "250.50");
    assert_eq!(tx.balance.to_string(), "2500.00");
}

#[test]
fn test_scenario_payroll() {
    let tx = single_tx("20-12-2306:00K+  50,000.00KBANK PAYROLL Ref 12345678Transfer Deposit30,000.00");
    assert_eq!(tx.tx_type, TransactionType::Payroll);
    assert_eq!(tx.reference, "12345678");
    assert_eq!(tx.amount.to_string(), "30000.00");
    assert_eq!(tx.balance.to_string(), "50000.00");
}

#[test]
fn test_scenario_unknown_shape() {
    assert_eq!(
        single_error("25-12-2311:11K+  100.00SomethingWeird"),
        ParseErrorKind::Unknown
    );
}

// ==================== STITCHING ====================

#[test]
fn test_row_split_over_many_lines() {
    // Extraction keeps the space that preceded each line break
    let text = [
        "05-06-2308:00K+  5,000.00To SCB X4321 ",
        "ACME ",
        "TRADING ",
        "CO++Transfer Withdrawal",
        "1,200.00",
        "06-06-2308:00K+  3,800.00Ref Code ODD00001Direct Debit1.00",
    ]
    .join("\n");

    let parsed = parse_statement(&text);
    check_invariants(&parsed);

    let transfer = parsed
        .transactions
        .iter()
        .find(|t| t.tx_type == TransactionType::BankTransfer)
        .unwrap();
    assert_eq!(transfer.payee.as_deref(), Some("ACME TRADING CO"));
    assert_eq!(transfer.amount.to_string(), "1200.00");
    assert_eq!(
        parsed.lines.iter().filter(|l| l.contains("X4321")).count(),
        1
    );
}

#[test]
fn test_furniture_discards_in_progress_row() {
    let text = "\
01-02-2310:15K+  1,234.56Ref Code ODD12345
Direct Debit100.00
Issued by K PLUS
02-02-2310:15K+  1,134.56Ref Code ODD12346Direct Debit100.00
03-02-2310:15K+  1,034.56Ref Code ODD12347Direct Debit100.00";

    let parsed = parse_statement(text);
    check_invariants(&parsed);

    assert!(parsed.lines.iter().all(|l| !l.contains("ODD12345")));
    let refs: Vec<_> = parsed
        .transactions
        .iter()
        .map(|t| t.reference.as_str())
        .collect();
    assert_eq!(refs, vec!["ODD12347", "ODD12346"]);
}

#[test]
fn test_furniture_lines_never_reach_output() {
    let text = "\
KBPDF (FM251-1)
01-02-2310:15K+  1,234.56Ref Code ODD12345Direct Debit100.00
For more information please contact 02-888-8888
Issued by K PLUS
02-02-2310:15K+  1,134.56Ref Code ODD12346Direct Debit100.00";

    let lines = preprocess(text);
    for prefix in ["KBPDF", "For more information", "Issued by K PLUS"] {
        assert!(lines.iter().all(|l| !l.contains(prefix)));
    }
}

#[test]
fn test_noise_before_first_row_is_silent() {
    let text = "\
Account Statement
Page 1 of 2
01-02-2310:15K+  1,234.56Ref Code ODD12345Direct Debit100.00
02-02-2310:15K+  1,134.56Ref Code ODD12346Direct Debit100.00";

    let parsed = parse_statement(text);
    check_invariants(&parsed);
    assert_eq!(parsed.transactions.len(), 2);
    assert!(parsed.errors.is_empty());
}

#[test]
fn test_non_digit_candidates_are_skipped() {
    // The trailing fragment is emitted as the last candidate but not
    // classified; the row it continued is not emitted
    let text = "\
01-02-2310:15K+  1,234.56Ref Code ODD12345Direct Debit100.00
02-02-2310:15K+  1,134.56Ref Code ODD12346Direct Debit100.00
End of statement";

    let parsed = parse_statement(text);
    check_invariants(&parsed);
    assert_eq!(parsed.lines.last().map(String::as_str), Some("End of statement"));
    assert_eq!(parsed.transactions.len(), 1);
    assert!(parsed.errors.is_empty());
}

// ==================== CLASSIFICATION ====================

#[test]
fn test_promptpay_ref2_wins_over_bank_method() {
    let tx = single_tx("05-06-2308:00K+  5,000.00To BBL X1234 PromptPay X9876SHOP++Transfer Withdrawal5.00");
    assert_eq!(tx.tx_type, TransactionType::PromptPayTransfer);
    assert_eq!(tx.bank.as_deref(), Some("BBL"));
    assert_eq!(tx.ref2.as_deref(), Some("X9876"));
}

#[test]
fn test_unknown_refcode_method_is_a_transaction() {
    let tx = single_tx("01-02-2310:15K+  1,234.56Ref Code EDC12345Annual Fee200.00");
    assert_eq!(tx.tx_type, TransactionType::Unknown);
    assert_eq!(tx.reference, "EDC12345");
}

#[test]
fn test_refcode_whole_number_amount() {
    assert_eq!(
        single_error("01-02-2310:15K+  1,234.56Ref Code ODD12345Direct Debit100"),
        ParseErrorKind::RefCode
    );
}

#[test]
fn test_thai_payee_is_kept() {
    let tx = single_tx("10-10-2309:30K+  9,000.00From KBANK X1111 นาย สมชาย ใจดี++Transfer Deposit50.00");
    assert_eq!(tx.bank.as_deref(), Some("KBANK"));
    assert_eq!(tx.payee.as_deref(), Some("นาย สมชาย ใจดี"));
}

#[test]
fn test_large_amounts_keep_every_digit_group() {
    let tx = single_tx("20-12-2306:00K+  1,250,000.00KBANK PAYROLL Ref 12345678Transfer Deposit30,000.00");
    assert_eq!(tx.balance.to_string(), "1250000.00");
}

#[test]
fn test_each_error_kind_is_isolated() {
    let text = "\
01-02-2310:15K+  1,234.56Ref Code ODD12345Direct Debit100.00
02-02-2310:15K+  1,134.56Ref Code XYZDirect Debit100.00
03-02-2310:15K+  1,034.56To nobody
04-02-2310:15K+  934.56From nobody
05-02-2310:15K+  834.56Paid for nothing
06-02-2310:15K+  734.56KBANK PAYROLL Ref nope
07-02-2310:15K+  634.56Mystery
08-02-2310bad
09-02-2310:15K+  534.56Ref Code ODD12346Direct Debit100.00";

    let parsed = parse_statement(text);
    check_invariants(&parsed);

    let kinds: Vec<_> = parsed.errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ParseErrorKind::RefCode,
            ParseErrorKind::Transfer,
            ParseErrorKind::Deposit,
            ParseErrorKind::Payment,
            ParseErrorKind::Payroll,
            ParseErrorKind::Unknown,
            ParseErrorKind::Line,
        ]
    );
    assert_eq!(parsed.transactions.len(), 2);
}

// ==================== AGGREGATION ====================

#[test]
fn test_sorted_newest_first_across_years() {
    let text = "\
31-12-2223:59K+  100.00Ref Code ODD00001Direct Debit1.00
01-01-2300:00K+  99.00Ref Code ODD00002Direct Debit1.00
15-06-2212:00K+  98.00Ref Code ODD00003Direct Debit1.00";

    let parsed = parse_statement(text);
    check_invariants(&parsed);

    let dates: Vec<_> = parsed.transactions.iter().map(|t| t.date).collect();
    assert_eq!(
        dates,
        vec![
            dt(2023, 1, 1, 0, 0),
            dt(2022, 12, 31, 23, 59),
            dt(2022, 6, 15, 12, 0),
        ]
    );
}

#[test]
fn test_parsing_is_deterministic() {
    let text = "\
01-02-2310:15K+  1,234.56Ref Code ODD12345Direct Debit100.00
05-06-2308:00ATM  5,000.00To KTB X1234 PromptPay X5678JOHN
DOE++Transfer Withdrawal500.00
25-12-2311:11K+  100.00SomethingWeird";

    let first = parse_statement(text);
    let second = parse_statement(text);
    assert_eq!(first, second);

    let a = serde_json::to_string(&first.transactions).unwrap();
    let b = serde_json::to_string(&second.transactions).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_no_transactions_is_not_an_error() {
    let parsed = parse_statement("Nothing to see here\nat all");
    check_invariants(&parsed);
    assert!(parsed.transactions.is_empty());
    assert!(parsed.errors.is_empty());
}
