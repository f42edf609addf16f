//! # Monetary Formatter
//!
//! Display formatting for amounts, quantities, percentages and dates.
//!
//! ```text
//! format_amount     1234567.5  ──► 12,34,567.50      (print table cells)
//! format_currency   1234567.5  ──► ₹12,34,567.50     (screen preview)
//! Western grouping  1234567.5  ──► 1,234,567.50
//! ```

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

fn default_symbol() -> String {
    "₹".to_string()
}

/// Digit grouping style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// `12,34,567` (thousand, then pairs).
    #[default]
    Indian,
    /// `1,234,567`.
    Western,
}

impl Grouping {
    /// The `num_format` locale carrying this grouping and `,` separators.
    fn locale(self) -> Locale {
        match self {
            Grouping::Indian => Locale::en_IN,
            Grouping::Western => Locale::en,
        }
    }
}

/// How money is printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MoneyFormat {
    #[serde(default = "default_symbol")]
    pub symbol: String,
    #[serde(default)]
    pub grouping: Grouping,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        MoneyFormat {
            symbol: default_symbol(),
            grouping: Grouping::Indian,
        }
    }
}

impl MoneyFormat {
    /// Grouped amount with two decimals and no symbol.
    pub fn format_amount(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let rupees = amount
            .rupees()
            .unsigned_abs()
            .to_formatted_string(&self.grouping.locale());
        format!("{}{}.{:02}", sign, rupees, amount.paise_part())
    }

    /// Grouped amount prefixed with the currency symbol.
    pub fn format_currency(&self, amount: Money) -> String {
        let plain = self.format_amount(amount);
        match plain.strip_prefix('-') {
            Some(abs) => format!("-{}{}", self.symbol, abs),
            None => format!("{}{}", self.symbol, plain),
        }
    }
}

/// Quantity without trailing zeros (`2`, `1.5`, `0.125`).
pub fn format_quantity(qty: Decimal) -> String {
    qty.normalize().to_string()
}

/// Rate in rupees, always two decimals (`72.50`).
pub fn format_rate(rate: Decimal) -> String {
    format!("{:.2}", crate::money::round_half_up(rate))
}

/// Percentage without the sign (`9`, `2.5`).
pub fn format_percent(rate: TaxRate) -> String {
    rate.to_string()
}

/// `dd/mm/yyyy`, as printed on Indian invoices.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
