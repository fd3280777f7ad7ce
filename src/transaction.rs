//! Transaction and parse error records produced by the classifier.

use crate::decimal::Amount;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a statement transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    DirectDebit,
    DebitCardSpending,
    ErrorCorrection,
    TransferDeposit,
    #[serde(rename = "PROMPTPAY_TRANSFER")]
    PromptPayTransfer,
    BankTransfer,
    Payroll,
    Payment,
    Unknown,
}

impl TransactionType {
    /// Maps the method text of a refcoded line to its type.
    ///
    /// Methods outside the known set map to `Unknown`.
    pub fn from_method(method: &str) -> Self {
        match method {
            "Direct Debit" => TransactionType::DirectDebit,
            "Debit Card Spending" => TransactionType::DebitCardSpending,
            "Error Correction" => TransactionType::ErrorCorrection,
            "Transfer Deposit" => TransactionType::TransferDeposit,
            _ => TransactionType::Unknown,
        }
    }

    /// Wire name, as used in JSON and CSV output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::DirectDebit => "DIRECT_DEBIT",
            TransactionType::DebitCardSpending => "DEBIT_CARD_SPENDING",
            TransactionType::ErrorCorrection => "ERROR_CORRECTION",
            TransactionType::TransferDeposit => "TRANSFER_DEPOSIT",
            TransactionType::PromptPayTransfer => "PROMPTPAY_TRANSFER",
            TransactionType::BankTransfer => "BANK_TRANSFER",
            TransactionType::Payroll => "PAYROLL",
            TransactionType::Payment => "PAYMENT",
            TransactionType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified statement transaction.
///
/// `date` is the statement's wall-clock time; no timezone is attached.
/// Optional fields are only filled for the shapes that carry them:
/// `ref2` for PromptPay proxies, `bank` for inter-bank transfers and
/// deposits, `payee` for transfers, deposits and bill payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,

    pub date: NaiveDateTime,

    /// Origination channel, verbatim (trailing spaces included)
    pub channel: String,

    #[serde(rename = "ref")]
    pub reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref2: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payee: Option<String>,

    pub amount: Amount,

    /// Account balance after this transaction
    pub balance: Amount,
}

impl Transaction {
    /// Creates a transaction with no optional fields set.
    pub fn new(
        tx_type: TransactionType,
        date: NaiveDateTime,
        channel: String,
        reference: String,
        amount: Amount,
        balance: Amount,
    ) -> Self {
        Transaction {
            tx_type,
            date,
            channel,
            reference,
            ref2: None,
            bank: None,
            payee: None,
            amount,
            balance,
        }
    }

    pub fn with_ref2(mut self, ref2: Option<String>) -> Self {
        self.ref2 = ref2;
        self
    }

    pub fn with_bank(mut self, bank: Option<String>) -> Self {
        self.bank = bank;
        self
    }

    pub fn with_payee(mut self, payee: String) -> Self {
        self.payee = Some(payee);
        self
    }
}

/// Why a candidate line could not be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParseErrorKind {
    /// Line does not have the date/time/channel/balance shape
    Line,
    RefCode,
    Transfer,
    Deposit,
    /// No known transaction shape follows the balance
    Unknown,
    Payment,
    PaymentAmountMissing,
    PaymentPayeeMissing,
    Payroll,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseErrorKind::Line => "LINE",
            ParseErrorKind::RefCode => "REF_CODE",
            ParseErrorKind::Transfer => "TRANSFER",
            ParseErrorKind::Deposit => "DEPOSIT",
            ParseErrorKind::Unknown => "UNKNOWN",
            ParseErrorKind::Payment => "PAYMENT",
            ParseErrorKind::PaymentAmountMissing => "PAYMENT_AMOUNT_MISSING",
            ParseErrorKind::PaymentPayeeMissing => "PAYMENT_PAYEE_MISSING",
            ParseErrorKind::Payroll => "PAYROLL",
        };
        f.write_str(name)
    }
}

/// A candidate line that failed classification, kept verbatim for replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    #[serde(rename = "error")]
    pub kind: ParseErrorKind,
    pub line: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: &str) -> Self {
        ParseError {
            kind,
            line: line.to_string(),
        }
    }
}

/// Outcome of classifying one candidate line.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Transaction(Transaction),
    Error(ParseError),
    /// Line does not start with a digit; dropped without a report.
    Skip,
}
