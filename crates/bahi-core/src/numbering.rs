//! # Invoice Number Generator
//!
//! Produces the next invoice number from the numbers already issued.
//!
//! ## Schemes
//! ```text
//! Global       INV-001, INV-002, ... INV-1000      max suffix + 1
//! YearScoped   INV-2026-0001, INV-2026-0002, ...   count in year + 1
//! ```
//!
//! Exactly one scheme is active per deployment. The function is pure: the
//! caller supplies the authoritative history and must serialize issuance
//! (see `bahi-store`).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

fn default_prefix() -> String {
    "INV-".to_string()
}

fn default_global_width() -> usize {
    3
}

fn default_year_width() -> usize {
    4
}

/// Invoice numbering scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NumberingScheme {
    /// `<prefix><n>`, zero padded to `width`.
    Global {
        #[serde(default = "default_prefix")]
        prefix: String,
        #[serde(default = "default_global_width")]
        width: usize,
    },
    /// `<prefix><year>-<n>`, restarting every calendar year.
    YearScoped {
        #[serde(default = "default_prefix")]
        prefix: String,
        #[serde(default = "default_year_width")]
        width: usize,
    },
}

impl NumberingScheme {
    pub fn global() -> Self {
        NumberingScheme::Global {
            prefix: default_prefix(),
            width: default_global_width(),
        }
    }

    pub fn year_scoped() -> Self {
        NumberingScheme::YearScoped {
            prefix: default_prefix(),
            width: default_year_width(),
        }
    }

    pub fn prefix(&self) -> &str {
        match self {
            NumberingScheme::Global { prefix, .. } | NumberingScheme::YearScoped { prefix, .. } => {
                prefix
            }
        }
    }
}

impl Default for NumberingScheme {
    fn default() -> Self {
        NumberingScheme::year_scoped()
    }
}

/// Generates the next invoice number.
///
/// ## Example
/// ```rust
/// use bahi_core::numbering::{next_invoice_number, NumberingScheme};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
/// let next = next_invoice_number(&NumberingScheme::global(), &["INV-001", "INV-002"], today);
/// assert_eq!(next.unwrap(), "INV-003");
/// ```
///
/// ## Errors
/// - [`CoreError::InvoiceNumberCollision`] when the produced number is already
///   in `existing`
/// - [`CoreError::SequenceExhausted`] when the highest existing number is
///   `u64::MAX`
pub fn next_invoice_number<S: AsRef<str>>(
    scheme: &NumberingScheme,
    existing: &[S],
    today: NaiveDate,
) -> CoreResult<String> {
    let candidate = match scheme {
        NumberingScheme::Global { prefix, width } => {
            let max = existing
                .iter()
                .filter_map(|n| trailing_number(n.as_ref()))
                .max()
                .unwrap_or(0);
            let next = max
                .checked_add(1)
                .ok_or_else(|| CoreError::SequenceExhausted(format!("{}{}", prefix, max)))?;
            format!("{}{:0width$}", prefix, next, width = *width)
        }
        NumberingScheme::YearScoped { prefix, width } => {
            let year_tag = format!("{}{}", prefix, today.year());
            let count = existing
                .iter()
                .filter(|n| n.as_ref().contains(&year_tag))
                .count();
            format!("{}-{:0width$}", year_tag, count + 1, width = *width)
        }
    };

    if existing.iter().any(|n| n.as_ref() == candidate) {
        return Err(CoreError::InvoiceNumberCollision(candidate));
    }

    Ok(candidate)
}

/// Checks that `number` has the shape produced by `scheme`.
pub fn is_valid_invoice_number(scheme: &NumberingScheme, number: &str) -> bool {
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());

    match scheme {
        NumberingScheme::Global { prefix, width } => match number.strip_prefix(prefix.as_str()) {
            Some(seq) => all_digits(seq) && seq.len() >= *width,
            None => false,
        },
        NumberingScheme::YearScoped { prefix, width } => {
            let Some(rest) = number.strip_prefix(prefix.as_str()) else {
                return false;
            };
            match rest.split_once('-') {
                Some((year, seq)) => {
                    year.len() == 4 && all_digits(year) && all_digits(seq) && seq.len() >= *width
                }
                None => false,
            }
        }
    }
}

/// Trailing run of ASCII digits, parsed.
fn trailing_number(s: &str) -> Option<u64> {
    let start = s
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    s[start..].parse().ok()
}
