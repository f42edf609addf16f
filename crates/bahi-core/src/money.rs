//! # Money Module
//!
//! Provides the `Money` type for stored invoice figures.
//!
//! ## Exact In, Integer Out
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rate (Decimal) × qty (Decimal) × tax% (Decimal)                        │
//! │        │                                                                │
//! │        │  exact decimal arithmetic, never f64                           │
//! │        ▼                                                                │
//! │  Money::from_decimal() ── round half up to 2 dp ──► i64 paise           │
//! │                                                                         │
//! │  0.1 + 0.2 in f64 = 0.30000000000000004  ❌                              │
//! │  Decimal 0.1 + 0.2 = 0.3, stored as 30 paise ✅                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bahi_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let price = Money::from_paise(109_950); // ₹1,099.50
//! let doubled = price * 2;
//! assert_eq!(doubled.paise(), 219_900);
//!
//! // 10.005 rounds half up
//! let rounded = Money::from_decimal(Decimal::new(10_005, 3)).unwrap();
//! assert_eq!(rounded.paise(), 1001);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Decimal places kept on every stored monetary figure.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an exact decimal to 2 places, midpoint away from zero.
///
/// This is the single rounding rule of the engine: 0.005 → 0.01,
/// 0.004 → 0.00.
#[inline]
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 rupee).
///
/// ## Where Money is Used
/// ```text
/// InvoiceLine.amount ─┬─► InvoiceLine.total ─► Invoice.subtotal
/// InvoiceLine.cgst ───┤                        Invoice.total_tax
/// InvoiceLine.sgst ───┘                        Invoice.grand_total ─► words
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ```rust
    /// use bahi_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees_paise(236, 0).paise(), 23_600);
    /// assert_eq!(Money::from_rupees_paise(-5, 50).paise(), -550);
    /// ```
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Rounds an exact decimal amount (in rupees) half up to paise.
    ///
    /// Fails with [`CoreError::AmountOverflow`] when the rounded value does
    /// not fit in an `i64` count of paise.
    pub fn from_decimal(value: Decimal) -> CoreResult<Self> {
        let paise = round_half_up(value)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|p| p.to_i64())
            .ok_or(CoreError::AmountOverflow)?;
        Ok(Money(paise))
    }

    /// Returns the exact decimal value in rupees (always 2 dp).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Adds two values, failing instead of wrapping.
    pub fn checked_add(self, other: Money) -> CoreResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(CoreError::AmountOverflow)
    }

    /// Sums values, failing on the first overflow.
    pub fn checked_sum<I>(values: I) -> CoreResult<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        values
            .into_iter()
            .try_fold(Money::zero(), |acc, value| acc.checked_add(value))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain `1234.50` rendering for logs and debugging.
///
/// Use [`crate::format::MoneyFormat`] for anything a customer sees.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(123_450);
        assert_eq!(money.paise(), 123_450);
        assert_eq!(money.rupees(), 1234);
        assert_eq!(money.paise_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(23_600).to_string(), "236.00");
        assert_eq!(Money::from_paise(5).to_string(), "0.05");
        assert_eq!(Money::from_paise(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(Decimal::new(5, 3)), Decimal::new(1, 2)); // 0.005 → 0.01
        assert_eq!(round_half_up(Decimal::new(4, 3)), Decimal::ZERO); // 0.004 → 0.00
        assert_eq!(round_half_up(Decimal::new(1_125, 3)), Decimal::new(113, 2)); // not banker's
        assert_eq!(round_half_up(Decimal::new(-5, 3)), Decimal::new(-1, 2));
    }

    #[test]
    fn test_from_decimal() {
        let money = Money::from_decimal(Decimal::new(23_600, 2)).unwrap();
        assert_eq!(money.paise(), 23_600);

        // 4.5045 → 4.50
        let money = Money::from_decimal(Decimal::new(45_045, 4)).unwrap();
        assert_eq!(money.paise(), 450);
    }

    #[test]
    fn test_from_decimal_overflow() {
        let huge = Decimal::MAX;
        assert!(matches!(
            Money::from_decimal(huge),
            Err(CoreError::AmountOverflow)
        ));
    }

    #[test]
    fn test_to_decimal_keeps_two_places() {
        let d = Money::from_paise(20_000).to_decimal();
        assert_eq!(d.to_string(), "200.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.paise(), 2000);
    }

    #[test]
    fn test_checked_add_overflow() {
        let max = Money::from_paise(i64::MAX);
        assert!(max.checked_add(Money::from_paise(1)).is_err());
        assert_eq!(
            Money::from_paise(1).checked_add(Money::from_paise(2)).unwrap(),
            Money::from_paise(3)
        );
    }
}
