//! Classification of stitched candidate lines.
//!
//! Every classifiable line has the shape
//!
//! ```text
//! DD-MM-YYhh:mm<channel><balance><meta>
//! ```
//!
//! and the leading text of `meta` selects the transaction shape:
//!
//! | meta starts with     | shape                 | error on mismatch |
//! |----------------------|-----------------------|-------------------|
//! | `Ref Code`           | refcoded debit/credit | `REF_CODE`        |
//! | `To `                | outgoing transfer     | `TRANSFER`        |
//! | `From`               | incoming deposit      | `DEPOSIT`         |
//! | `Paid for`           | bill payment          | `PAYMENT*`        |
//! | `KBANK PAYROLL Ref`  | payroll credit        | `PAYROLL`         |
//!
//! Character classes are ASCII-only; statement payees may contain Thai
//! text, which must never be taken for a digit or a word character.

use crate::decimal::Amount;
use crate::transaction::{Classified, ParseError, ParseErrorKind, Transaction, TransactionType};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, warn};
use regex::{Captures, Regex};
use std::str::FromStr;
use std::sync::OnceLock;

type ShapeResult = std::result::Result<Transaction, ParseErrorKind>;

/// Amounts always carry a fractional part: `1,234.56`, `100.00`, `1,250,000.00`.
macro_rules! amount_pattern {
    () => {
        r"[0-9]+(?:,[0-9]+)*\.[0-9]+"
    };
}

fn line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?P<day>[0-9]{2})-(?P<month>[0-9]{2})-(?P<year>[0-9]{2})",
            r"(?P<hour>[0-9]{2}):(?P<minute>[0-9]{2})",
            r"(?P<channel>[^0-9]+)",
            r"(?P<balance>",
            amount_pattern!(),
            r")(?P<meta>.*)"
        ))
        .expect("invalid line regex")
    })
}

fn refcode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"Ref Code (?P<ref>(?:ODD|EDC)[0-9]{5})(?P<method>[^0-9]+)(?P<amount>",
            amount_pattern!(),
            r")"
        ))
        .expect("invalid refcode regex")
    })
}

fn transfer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"To (?P<method>[A-Za-z0-9_]+\s)?(?P<ref>X[0-9]{4})",
            r"(?: PromptPay (?P<ref2>X[0-9]{4}))?",
            r"(?P<payee>.*)Transfer Withdrawal(?P<amount>",
            amount_pattern!(),
            r")"
        ))
        .expect("invalid transfer regex")
    })
}

fn deposit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"From(?P<bank>\s[A-Za-z0-9_]+)? (?P<ref>X[0-9]{4}) ",
            r"(?P<payee>.*)Transfer Deposit(?P<amount>",
            amount_pattern!(),
            r")"
        ))
        .expect("invalid deposit regex")
    })
}

fn payment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Paid for Ref (?P<ref>X[A-Za-z0-9]{4}) (?P<rest>.*)")
            .expect("invalid payment regex")
    })
}

fn payment_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?P<payee>.*)Payment(?P<amount>",
            amount_pattern!(),
            r")"
        ))
        .expect("invalid payment amount regex")
    })
}

fn payroll_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"KBANK PAYROLL Ref (?P<ref>[0-9]{8})Transfer Deposit(?P<amount>",
            amount_pattern!(),
            r")"
        ))
        .expect("invalid payroll regex")
    })
}

/// Fields shared by every transaction shape.
#[derive(Debug, Clone)]
struct LineHeader {
    date: NaiveDateTime,
    channel: String,
    balance: Amount,
}

impl LineHeader {
    fn transaction(&self, tx_type: TransactionType, reference: &str, amount: Amount) -> Transaction {
        Transaction::new(
            tx_type,
            self.date,
            self.channel.clone(),
            reference.to_string(),
            amount,
            self.balance,
        )
    }
}

/// Classifies one candidate line.
///
/// Lines that do not start with a digit are page residue and yield
/// [`Classified::Skip`]. Anything else becomes a transaction or a
/// [`ParseError`] carrying the line verbatim.
pub fn classify(line: &str) -> Classified {
    if !line.starts_with(|c: char| c.is_ascii_digit()) {
        return Classified::Skip;
    }

    match classify_line(line) {
        Ok(tx) => {
            debug!("Classified {} {}: {:?}", tx.tx_type, tx.reference, line);
            Classified::Transaction(tx)
        }
        Err(kind) => {
            warn!("{}: {:?}", kind, line);
            Classified::Error(ParseError::new(kind, line))
        }
    }
}

fn classify_line(line: &str) -> ShapeResult {
    let caps = line_re().captures(line).ok_or(ParseErrorKind::Line)?;

    let date = parse_date(&caps).ok_or(ParseErrorKind::Line)?;
    let balance = parse_amount(&caps["balance"], ParseErrorKind::Line)?;
    let header = LineHeader {
        date,
        channel: caps["channel"].to_string(),
        balance,
    };

    let meta = &caps["meta"];
    if meta.starts_with("Ref Code") {
        parse_refcoded(&header, meta)
    } else if meta.starts_with("To ") {
        parse_transfer(&header, meta)
    } else if meta.starts_with("From") {
        parse_deposit(&header, meta)
    } else if meta.starts_with("Paid for") {
        parse_payment(&header, meta)
    } else if meta.starts_with("KBANK PAYROLL Ref") {
        parse_payroll(&header, meta)
    } else {
        Err(ParseErrorKind::Unknown)
    }
}

/// Builds the wall-clock timestamp. Two-digit years are read as 20YY.
fn parse_date(caps: &Captures<'_>) -> Option<NaiveDateTime> {
    let field = |name: &str| caps[name].parse::<u32>().ok();

    let year = 2000 + i32::try_from(field("year")?).ok()?;
    NaiveDate::from_ymd_opt(year, field("month")?, field("day")?)?.and_hms_opt(
        field("hour")?,
        field("minute")?,
        0,
    )
}

fn parse_amount(text: &str, on_error: ParseErrorKind) -> std::result::Result<Amount, ParseErrorKind> {
    Amount::from_str(text).map_err(|e| {
        debug!("{}", e);
        on_error
    })
}

/// Strips the first `++` marker and surrounding whitespace from a payee.
fn clean_payee(raw: &str) -> String {
    raw.replacen("++", "", 1).trim().to_string()
}

fn parse_refcoded(header: &LineHeader, meta: &str) -> ShapeResult {
    let caps = refcode_re().captures(meta).ok_or(ParseErrorKind::RefCode)?;
    let amount = parse_amount(&caps["amount"], ParseErrorKind::RefCode)?;
    let tx_type = TransactionType::from_method(&caps["method"]);

    Ok(header.transaction(tx_type, &caps["ref"], amount))
}

fn parse_transfer(header: &LineHeader, meta: &str) -> ShapeResult {
    let caps = transfer_re().captures(meta).ok_or(ParseErrorKind::Transfer)?;
    let amount = parse_amount(&caps["amount"], ParseErrorKind::Transfer)?;

    let method = caps.name("method").map(|m| m.as_str().trim());
    let ref2 = caps.name("ref2").map(|m| m.as_str().to_string());

    let is_promptpay = method == Some("PromptPay") || ref2.is_some();
    let tx_type = if is_promptpay {
        TransactionType::PromptPayTransfer
    } else {
        TransactionType::BankTransfer
    };
    let bank = method
        .filter(|m| *m != "PromptPay")
        .map(str::to_string);

    Ok(header
        .transaction(tx_type, &caps["ref"], amount)
        .with_ref2(ref2)
        .with_bank(bank)
        .with_payee(clean_payee(&caps["payee"])))
}

fn parse_deposit(header: &LineHeader, meta: &str) -> ShapeResult {
    let caps = deposit_re().captures(meta).ok_or(ParseErrorKind::Deposit)?;
    let amount = parse_amount(&caps["amount"], ParseErrorKind::Deposit)?;

    let bank = caps
        .name("bank")
        .map(|m| m.as_str().trim())
        .filter(|b| !b.is_empty())
        .map(str::to_string);

    Ok(header
        .transaction(TransactionType::TransferDeposit, &caps["ref"], amount)
        .with_bank(bank)
        .with_payee(clean_payee(&caps["payee"])))
}

fn parse_payment(header: &LineHeader, meta: &str) -> ShapeResult {
    let caps = payment_re().captures(meta).ok_or(ParseErrorKind::Payment)?;
    let rest = caps["rest"].trim();

    let inner = payment_amount_re()
        .captures(rest)
        .ok_or(ParseErrorKind::PaymentAmountMissing)?;
    let payee = &inner["payee"];
    if payee.is_empty() {
        return Err(ParseErrorKind::PaymentPayeeMissing);
    }
    let amount = parse_amount(&inner["amount"], ParseErrorKind::PaymentAmountMissing)?;

    // Payee is kept as matched, including the space before "Payment"
    Ok(header
        .transaction(TransactionType::Payment, &caps["ref"], amount)
        .with_payee(payee.to_string()))
}

fn parse_payroll(header: &LineHeader, meta: &str) -> ShapeResult {
    let caps = payroll_re().captures(meta).ok_or(ParseErrorKind::Payroll)?;
    let amount = parse_amount(&caps["amount"], ParseErrorKind::Payroll)?;

    Ok(header.transaction(TransactionType::Payroll, &caps["ref"], amount))
}
