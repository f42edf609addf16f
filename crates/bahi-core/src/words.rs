//! # Amount in Words
//!
//! Spells a rupee amount using Indian grouping.
//!
//! ```text
//! 12,34,567.50
//! ── ── ─── ──
//! │  │  │   └── "and Fifty Paise"
//! │  │  └────── "Five Hundred Sixty-Seven"
//! │  └───────── "Thirty-Four Thousand"
//! └──────────── "Twelve Lakh"
//! ```
//!
//! ## Usage
//! ```rust
//! use bahi_core::words::amount_in_words;
//! use rust_decimal::Decimal;
//!
//! assert_eq!(
//!     amount_in_words(Decimal::new(236, 0)).unwrap(),
//!     "Two Hundred Thirty-Six Rupees Only"
//! );
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::money::{round_half_up, Money};

/// Largest rupee amount that can be spelled (10^12 − 1).
pub const MAX_WORDS_RUPEES: i64 = 999_999_999_999;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

/// Spells `amount` (rupees, rounded half up to paise) in words.
///
/// ## Errors
/// [`CoreError::OutOfRange`] for negative amounts or more than
/// [`MAX_WORDS_RUPEES`] rupees.
pub fn amount_in_words(amount: Decimal) -> CoreResult<String> {
    let out_of_range = || CoreError::OutOfRange {
        value: amount.to_string(),
        max: MAX_WORDS_RUPEES.to_string(),
    };

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(out_of_range());
    }

    let rounded = round_half_up(amount);
    let rupees = rounded.trunc().to_i64().ok_or_else(out_of_range)?;
    if rupees > MAX_WORDS_RUPEES {
        return Err(out_of_range());
    }
    let paise = (rounded.fract() * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(out_of_range)?;

    Ok(spell(rupees, paise))
}

/// Spells a stored money figure.
pub fn money_in_words(amount: Money) -> CoreResult<String> {
    amount_in_words(amount.to_decimal())
}

fn spell(rupees: i64, paise: i64) -> String {
    let mut out = String::new();

    if rupees > 0 || paise == 0 {
        out.push_str(&integer_words(rupees));
        out.push_str(if rupees == 1 { " Rupee" } else { " Rupees" });
    }

    if paise > 0 {
        if !out.is_empty() {
            out.push_str(" and ");
        }
        out.push_str(&integer_words(paise));
        out.push_str(if paise == 1 { " Paisa" } else { " Paise" });
    }

    out.push_str(" Only");
    out
}

/// Spells a non-negative integer below 10^12.
fn integer_words(n: i64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    // crore takes everything above 10^7, so 1,00,000 crore reads
    // "One Lakh Crore"
    let groups = [
        (n / 10_000_000, "Crore"),
        (n / 100_000 % 100, "Lakh"),
        (n / 1_000 % 100, "Thousand"),
    ];

    let mut parts: Vec<String> = Vec::new();
    for (value, unit) in groups {
        if value > 0 {
            let head = if value >= 1_000 {
                integer_words(value)
            } else {
                below_thousand(value)
            };
            parts.push(format!("{} {}", head, unit));
        }
    }

    let rest = n % 1_000;
    if rest > 0 {
        parts.push(below_thousand(rest));
    }

    parts.join(" ")
}

fn below_thousand(n: i64) -> String {
    let hundreds = n / 100;
    let rest = n % 100;

    let mut parts: Vec<String> = Vec::new();
    if hundreds > 0 {
        parts.push(format!("{} Hundred", ONES[hundreds as usize]));
    }
    if rest > 0 {
        parts.push(below_hundred(rest));
    }
    parts.join(" ")
}

fn below_hundred(n: i64) -> String {
    let n = n as usize;
    if n < 20 {
        ONES[n].to_string()
    } else if n % 10 == 0 {
        TENS[n / 10].to_string()
    } else {
        format!("{}-{}", TENS[n / 10], ONES[n % 10])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> String {
        amount_in_words(s.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_pinned_literals() {
        assert_eq!(words("0"), "Zero Rupees Only");
        assert_eq!(words("1"), "One Rupee Only");
        assert_eq!(words("100"), "One Hundred Rupees Only");
        assert_eq!(words("100000"), "One Lakh Rupees Only");
        assert_eq!(words("236"), "Two Hundred Thirty-Six Rupees Only");
        assert_eq!(
            words("1234567.50"),
            "Twelve Lakh Thirty-Four Thousand Five Hundred Sixty-Seven Rupees and Fifty Paise Only"
        );
    }

    #[test]
    fn test_crore_and_upper_bound() {
        assert_eq!(words("10000000"), "One Crore Rupees Only");
        assert_eq!(
            words("999999999999"),
            "Ninety-Nine Thousand Nine Hundred Ninety-Nine Crore Ninety-Nine Lakh \
             Ninety-Nine Thousand Nine Hundred Ninety-Nine Rupees Only"
        );
    }

    #[test]
    fn test_paise_forms() {
        assert_eq!(words("0.50"), "Fifty Paise Only");
        assert_eq!(words("0.01"), "One Paisa Only");
        assert_eq!(words("1.01"), "One Rupee and One Paisa Only");
        assert_eq!(words("21.99"), "Twenty-One Rupees and Ninety-Nine Paise Only");
    }

    #[test]
    fn test_rounds_half_up_before_spelling() {
        assert_eq!(words("10.005"), "Ten Rupees and One Paisa Only");
        assert_eq!(words("0.999"), "One Rupee Only");
    }

    #[test]
    fn test_tens_and_teens() {
        assert_eq!(words("40"), "Forty Rupees Only");
        assert_eq!(words("1019"), "One Thousand Nineteen Rupees Only");
        assert_eq!(words("110"), "One Hundred Ten Rupees Only");
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            amount_in_words(Decimal::new(-1, 2)),
            Err(CoreError::OutOfRange { .. })
        ));
        assert!(matches!(
            amount_in_words(Decimal::from(MAX_WORDS_RUPEES + 1)),
            Err(CoreError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_money_in_words() {
        let text = money_in_words(Money::from_paise(23_600)).unwrap();
        assert_eq!(text, "Two Hundred Thirty-Six Rupees Only");
    }
}
