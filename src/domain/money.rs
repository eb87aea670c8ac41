//! Fixed-point currency amounts.
//!
//! Amounts are kept at exactly two decimal places. Storage uses integer
//! cents; arithmetic and the wire format use `rust_decimal`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

const SCALE: u32 = 2;

/// Non-negative currency amount with two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Round `amount` half away from zero to two places.
    pub fn new(amount: Decimal) -> AppResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AppError::validation("Amount must not be negative"));
        }
        let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(SCALE);
        Ok(Self(rounded))
    }

    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, SCALE))
    }

    /// Amount in integer cents, as persisted.
    pub fn cents(&self) -> AppResult<i64> {
        (self.0 * Decimal::ONE_HUNDRED)
            .to_i64()
            .ok_or_else(|| AppError::validation("Amount is out of range"))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units at this unit price.
    pub fn times(&self, quantity: i32) -> AppResult<Self> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| AppError::validation("Amount is out of range"))
            .and_then(Self::new)
    }

    pub fn checked_add(&self, other: Money) -> AppResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| AppError::validation("Amount is out of range"))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl TryFrom<Decimal> for Money {
    type Error = AppError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl FromStr for Money {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s)
            .map_err(|_| AppError::validation(format!("Invalid amount: {}", s)))?;
        Money::new(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn test_line_totals_are_exact() {
        assert_eq!(money("4.99").times(5).unwrap(), money("24.95"));
        assert_eq!(money("2.49").times(2).unwrap(), money("4.98"));
    }

    #[test]
    fn test_sum_of_lines() {
        let total = money("24.95").checked_add(money("4.98")).unwrap();
        assert_eq!(total, money("29.93"));
        assert_eq!(total.to_string(), "29.93");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(money("1.005"), money("1.01"));
        assert_eq!(money("1.004"), money("1.00"));
    }

    #[test]
    fn test_display_keeps_two_places() {
        assert_eq!(money("3").to_string(), "3.00");
        assert_eq!(money("3.5").to_string(), "3.50");
    }

    #[test]
    fn test_cents_conversion() {
        assert_eq!(money("29.93").cents().unwrap(), 2993);
        assert_eq!(Money::from_cents(499), money("4.99"));
        assert_eq!(Money::from_cents(0), Money::ZERO);
    }

    #[test]
    fn test_negative_rejected() {
        assert!("-0.01".parse::<Money>().is_err());
        assert!(Money::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_serde_uses_decimal_strings() {
        let json = serde_json::to_string(&money("4.99")).unwrap();
        assert_eq!(json, "\"4.99\"");

        let from_number: Money = serde_json::from_str("2.49").unwrap();
        let from_string: Money = serde_json::from_str("\"2.49\"").unwrap();
        assert_eq!(from_number, from_string);
        assert!(serde_json::from_str::<Money>("\"-1.00\"").is_err());
    }
}
