//! `Money`: decimal currency amount with the domain's 2-decimal rounding rule.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub};
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of decimal places amounts are rounded to.
pub const CURRENCY_SCALE: u32 = 2;

/// A currency amount.
///
/// Stored unrounded (an expense of `10.005` keeps all its digits and contributes
/// them to the session total); rounding happens explicitly via [`Money::round2`]
/// at the points where the settlement rules call for it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, CURRENCY_SCALE));
    /// Largest amount accepted from user input (10^15).
    ///
    /// Twenty participants times millions of expenses at this size still sum
    /// well inside the `Decimal` range.
    pub const MAX_INPUT: Money = Money(Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0));

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Amount from an integer number of cents (`1050` → `10.50`).
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, CURRENCY_SCALE))
    }

    /// Parse user input into a strictly positive amount.
    ///
    /// Surrounding whitespace is ignored; plain and scientific notation are
    /// accepted. Empty, non-numeric, zero, negative and above-[`Money::MAX_INPUT`]
    /// inputs are rejected.
    pub fn parse_positive(input: &str) -> DomainResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("amount cannot be empty"));
        }

        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| DomainError::validation(format!("amount is not a number: {trimmed:?}")))?;

        if value <= Decimal::ZERO {
            return Err(DomainError::validation("amount must be positive"));
        }
        if value > Self::MAX_INPUT.0 {
            return Err(DomainError::validation(format!(
                "amount must not exceed {}",
                Self::MAX_INPUT
            )));
        }

        Ok(Self(value))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Round to 2 decimal places, midpoint away from zero.
    pub fn round2(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Share of this amount for one of `ways` people, rounded to 2 decimals.
    ///
    /// Returns zero for `ways == 0`.
    pub fn split(self, ways: usize) -> Self {
        if ways == 0 {
            return Self::ZERO;
        }
        Self(self.0 / Decimal::from(ways)).round2()
    }

    /// Unrounded share of this amount for one of `ways` people.
    pub fn exact_share(self, ways: usize) -> Self {
        if ways == 0 {
            return Self::ZERO;
        }
        Self(self.0 / Decimal::from(ways))
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiply by a count (e.g. share × number of people).
    pub fn times(self, count: usize) -> Self {
        Self(self.0.saturating_mul(Decimal::from(count)))
    }
}

impl core::fmt::Display for Money {
    /// Fixed-point, two decimals, no grouping separators (`1234.50`).
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut rounded = self.round2().0;
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }
        rounded.rescale(CURRENCY_SCALE);
        core::fmt::Display::fmt(&rounded, f)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|e| DomainError::validation(format!("invalid amount {s:?}: {e}")))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

// Arithmetic saturates at the `Decimal` bounds rather than panicking.

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn round2_uses_midpoint_away_from_zero() {
        assert_eq!(money("1.005").round2(), money("1.01"));
        assert_eq!(money("1.004").round2(), money("1.00"));
        assert_eq!(money("-1.005").round2(), money("-1.01"));
        assert_eq!(money("33.333333").round2(), money("33.33"));
    }

    #[test]
    fn split_rounds_the_share() {
        assert_eq!(money("10").split(3), money("3.33"));
        assert_eq!(money("100").split(2), money("50"));
        assert_eq!(money("0.05").split(2), money("0.03"));
        assert_eq!(money("10").split(0), Money::ZERO);
    }

    #[test]
    fn display_is_fixed_two_decimals_without_grouping() {
        assert_eq!(money("50").to_string(), "50.00");
        assert_eq!(money("1234567.891").to_string(), "1234567.89");
        assert_eq!(money("3.3333").to_string(), "3.33");
        assert_eq!(money("-0.001").to_string(), "0.00");
        assert_eq!(money("-12.5").to_string(), "-12.50");
    }

    #[test]
    fn parse_positive_accepts_plain_and_padded_numbers() {
        assert_eq!(Money::parse_positive("12.50").unwrap(), money("12.5"));
        assert_eq!(Money::parse_positive("  7 ").unwrap(), money("7"));
        assert_eq!(Money::parse_positive("1e2").unwrap(), money("100"));
    }

    #[test]
    fn parse_positive_rejects_invalid_input() {
        for input in ["", "   ", "abc", "0", "-3", "0.00", "12,50"] {
            match Money::parse_positive(input) {
                Err(DomainError::Validation(_)) => {}
                other => panic!("expected validation error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_positive_caps_the_amount() {
        assert_eq!(Money::parse_positive("1000000000000000").unwrap(), Money::MAX_INPUT);
        assert_eq!(Money::MAX_INPUT.to_string(), "1000000000000000.00");

        for input in ["1000000000000000.01", "1e16", "50000000000000000000000000000"] {
            match Money::parse_positive(input) {
                Err(DomainError::Validation(_)) => {}
                other => panic!("expected validation error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn arithmetic_saturates_instead_of_panicking() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max + max, max);
        assert_eq!([max, max, Money::CENT].iter().sum::<Money>(), max);
        assert_eq!(-max - max, -max);
        assert_eq!(max.times(20), max);

        let mut total = max;
        total += Money::CENT;
        assert_eq!(total, max);
    }

    #[test]
    fn equality_ignores_scale() {
        assert_eq!(money("50"), money("50.00"));
    }

    #[test]
    fn serializes_as_decimal_string() {
        let json = serde_json::to_string(&money("12.30")).unwrap();
        assert_eq!(json, "\"12.30\"");
    }

    proptest! {
        /// Property: a rounded split never differs from the exact share by more
        /// than half a cent.
        #[test]
        fn split_stays_within_half_a_cent(cents in 1i64..10_000_000i64, ways in 1usize..20usize) {
            let amount = Money::from_cents(cents);
            let drift = (amount.split(ways) - amount.exact_share(ways)).abs();
            prop_assert!(drift <= money("0.005"));
        }
    }
}
