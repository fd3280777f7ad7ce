//! Money type for statement amounts and balances.
//!
//! Statement figures are printed with thousands separators (`1,234.56`).
//! `Amount` strips the separators and keeps the scale exactly as written,
//! so formatting an amount reproduces the source digits.

use crate::error::StatementError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A non-negative decimal amount in the statement's implicit currency.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use kbank_statement::Amount;
///
/// let amount = Amount::from_str("1,234.56").unwrap();
/// assert_eq!(amount.to_string(), "1234.56");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Amount {
    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Wraps a decimal value. Returns `None` for negative values.
    pub fn new(value: Decimal) -> Option<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return None;
        }
        Some(Amount(value))
    }

    /// The underlying decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for Amount {
    type Err = StatementError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || StatementError::InvalidAmount {
            value: s.to_string(),
        };

        let digits: String = s.trim().chars().filter(|c| *c != ',').collect();
        let decimal = Decimal::from_str(&digits).map_err(|_| invalid())?;
        Amount::new(decimal).ok_or_else(invalid)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
