//! # Sales Register Summary
//!
//! Headline figures over the stored invoices.
//!
//! ```text
//!   billed      = Σ grand_total            (every invoice in range)
//!   collected   = Σ grand_total            (status = paid)
//!   outstanding = billed - collected       (status = pending)
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bahi_core::{CoreResult, Invoice, InvoiceStatus, Money};

/// Inclusive date window on the invoice date. An open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub invoice_count: usize,
    pub paid_count: usize,
    pub pending_count: usize,
    pub billed: Money,
    pub collected: Money,
    pub outstanding: Money,
}

impl SalesSummary {
    /// Summarizes the invoices whose date falls in `range`.
    ///
    /// ## Errors
    /// [`bahi_core::CoreError::AmountOverflow`] if a sum leaves the `i64`
    /// paise range.
    pub fn from_invoices<'a, I>(invoices: I, range: DateRange) -> CoreResult<Self>
    where
        I: IntoIterator<Item = &'a Invoice>,
    {
        let mut summary = SalesSummary::default();

        for invoice in invoices.into_iter().filter(|i| range.contains(i.date)) {
            summary.invoice_count += 1;
            summary.billed = summary.billed.checked_add(invoice.grand_total)?;

            match invoice.status {
                InvoiceStatus::Paid => {
                    summary.paid_count += 1;
                    summary.collected = summary.collected.checked_add(invoice.grand_total)?;
                }
                InvoiceStatus::Pending => {
                    summary.pending_count += 1;
                    summary.outstanding = summary.outstanding.checked_add(invoice.grand_total)?;
                }
            }
        }

        Ok(summary)
    }
}
