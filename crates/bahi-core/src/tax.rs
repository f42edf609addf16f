//! # Line-Item Tax Computer
//!
//! Computes line amounts, CGST/SGST and invoice totals.
//!
//! ## Rounding Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  amount_exact = rate × qty                         (exact Decimal)      │
//! │  cgst_exact   = amount_exact × cgst% / 100         (from UNROUNDED amt) │
//! │  sgst_exact   = amount_exact × sgst% / 100                              │
//! │        │                                                                │
//! │        ▼  each rounded half up to 2 dp, independently                   │
//! │  amount, cgst_amount, sgst_amount                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  total = amount + cgst_amount + sgst_amount        (exact in paise)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invoice totals are integer sums of the stored line figures, so every
//! figure printed on the document adds up and no order of lines changes
//! the result.
//!
//! ## Example
//! ```rust
//! use bahi_core::tax::compute_figures;
//! use bahi_core::types::TaxRate;
//! use rust_decimal::Decimal;
//!
//! let f = compute_figures(
//!     Decimal::new(100, 0),
//!     Decimal::new(2, 0),
//!     TaxRate::from_percent(Decimal::new(18, 0)),
//!     None,
//! )
//! .unwrap();
//! assert_eq!(f.amount.paise(), 20_000);
//! assert_eq!(f.cgst_amount.paise(), 1_800);
//! assert_eq!(f.sgst_amount.paise(), 1_800);
//! assert_eq!(f.total.paise(), 23_600);
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{DraftLine, Invoice, InvoiceDraft, InvoiceLine, TaxRate, TaxSplit};
use crate::validation::{
    validate_hsn_code, validate_name, validate_quantity, validate_rate, validate_tax_percent,
};
use crate::MAX_INVOICE_LINES;

/// Tolerance when comparing CGST + SGST against the declared total (0.0001%).
pub const SPLIT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

// =============================================================================
// Line Figures
// =============================================================================

/// The four rounded figures of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFigures {
    pub amount: Money,
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub total: Money,
}

/// Computes the figures for a single line.
///
/// `split` defaults to an even CGST/SGST split of `tax_percent`.
///
/// ## Errors
/// [`CoreError::InvalidLine`] when qty ≤ 0, rate < 0, a percent is outside
/// 0..=100, the split does not add up to `tax_percent`, or the amount does
/// not fit in the money range.
pub fn compute_figures(
    rate: Decimal,
    qty: Decimal,
    tax_percent: TaxRate,
    split: Option<TaxSplit>,
) -> CoreResult<LineFigures> {
    validate_quantity(qty).map_err(line_error)?;
    validate_rate(rate).map_err(line_error)?;
    validate_tax_percent("tax percent", tax_percent.percent()).map_err(line_error)?;

    let split = split.unwrap_or_else(|| TaxSplit::even(tax_percent));
    validate_tax_percent("cgst percent", split.cgst.percent()).map_err(line_error)?;
    validate_tax_percent("sgst percent", split.sgst.percent()).map_err(line_error)?;

    if (split.total() - tax_percent.percent()).abs() > SPLIT_EPSILON {
        return Err(CoreError::invalid_line(format!(
            "CGST {}% + SGST {}% does not equal tax {}%",
            split.cgst, split.sgst, tax_percent
        )));
    }

    let amount_exact = rate.checked_mul(qty).ok_or_else(overflow)?;
    let cgst_exact = share(amount_exact, split.cgst)?;
    let sgst_exact = share(amount_exact, split.sgst)?;

    let amount = Money::from_decimal(amount_exact).map_err(|_| overflow())?;
    let cgst_amount = Money::from_decimal(cgst_exact).map_err(|_| overflow())?;
    let sgst_amount = Money::from_decimal(sgst_exact).map_err(|_| overflow())?;
    let total = amount
        .checked_add(cgst_amount)
        .and_then(|t| t.checked_add(sgst_amount))
        .map_err(|_| overflow())?;

    Ok(LineFigures {
        amount,
        cgst_amount,
        sgst_amount,
        total,
    })
}

/// Validates a draft line and computes it into an [`InvoiceLine`].
///
/// Blank HSN codes are stored as `None`; non-blank ones must be valid.
pub fn compute_line(draft: &DraftLine) -> CoreResult<InvoiceLine> {
    validate_name("name", &draft.name).map_err(line_error)?;

    let hsn_code = match draft.hsn_code.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(code) => {
            validate_hsn_code(code).map_err(line_error)?;
            Some(code.to_string())
        }
    };

    let split = draft.effective_split();
    let figures = compute_figures(draft.rate, draft.qty, draft.tax_percent, Some(split))?;

    Ok(InvoiceLine {
        item_id: draft.item_id.clone(),
        name: draft.name.trim().to_string(),
        hsn_code,
        rate: draft.rate,
        qty: draft.qty,
        cgst_percent: split.cgst,
        sgst_percent: split.sgst,
        amount: figures.amount,
        cgst_amount: figures.cgst_amount,
        sgst_amount: figures.sgst_amount,
        total: figures.total,
    })
}

fn share(amount: Decimal, rate: TaxRate) -> CoreResult<Decimal> {
    amount
        .checked_mul(rate.percent())
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(overflow)
}

fn line_error(err: ValidationError) -> CoreError {
    CoreError::invalid_line(err.to_string())
}

fn overflow() -> CoreError {
    CoreError::invalid_line("amount overflows the supported money range")
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// Aggregate figures of an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub cgst_total: Money,
    pub sgst_total: Money,
    pub total_tax: Money,
    pub grand_total: Money,
}

impl InvoiceTotals {
    /// Sums computed lines. Order-independent.
    pub fn from_lines(lines: &[InvoiceLine]) -> CoreResult<Self> {
        let mut totals = InvoiceTotals::default();
        for line in lines {
            totals.subtotal = totals.subtotal.checked_add(line.amount)?;
            totals.cgst_total = totals.cgst_total.checked_add(line.cgst_amount)?;
            totals.sgst_total = totals.sgst_total.checked_add(line.sgst_amount)?;
        }
        totals.total_tax = totals.cgst_total.checked_add(totals.sgst_total)?;
        totals.grand_total = totals.subtotal.checked_add(totals.total_tax)?;
        Ok(totals)
    }
}

// =============================================================================
// Invoice Assembly
// =============================================================================

/// Computes every line of `draft` and assembles an issued invoice.
///
/// All lines are computed before anything is assembled; the first invalid
/// line aborts the whole operation and its 1-based position is reported.
///
/// ## Errors
/// - [`CoreError::Validation`] for a blank customer name, no lines, or more
///   than [`MAX_INVOICE_LINES`] lines
/// - [`CoreError::InvalidLine`] for the first malformed line
pub fn build_invoice(
    draft: &InvoiceDraft,
    invoice_number: impl Into<String>,
    id: impl Into<String>,
    now: DateTime<Utc>,
) -> CoreResult<Invoice> {
    validate_name("customer name", &draft.customer.name)?;

    if draft.lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        }
        .into());
    }

    if draft.lines.len() > MAX_INVOICE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "lines".to_string(),
            min: "1".to_string(),
            max: MAX_INVOICE_LINES.to_string(),
        }
        .into());
    }

    let lines = draft
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| compute_line(line).map_err(|e| e.at_line(i + 1)))
        .collect::<CoreResult<Vec<_>>>()?;

    let totals = InvoiceTotals::from_lines(&lines)?;

    Ok(Invoice {
        id: id.into(),
        invoice_number: invoice_number.into(),
        date: draft.date,
        po: non_blank(draft.po.as_deref()),
        customer_id: draft.customer_id.clone(),
        customer: draft.customer.clone(),
        lines,
        subtotal: totals.subtotal,
        total_tax: totals.total_tax,
        grand_total: totals.grand_total,
        status: draft.status,
        created_at: now,
        updated_at: now,
    })
}

impl Invoice {
    /// Re-derives an edited invoice, keeping its id, number and creation time.
    pub fn recompute(&self, draft: &InvoiceDraft, now: DateTime<Utc>) -> CoreResult<Invoice> {
        let mut revised = build_invoice(draft, self.invoice_number.clone(), self.id.clone(), now)?;
        revised.created_at = self.created_at;
        Ok(revised)
    }
}

/// Checks that the stored figures of an invoice agree with each other.
///
/// Uses only the stored values: no tax is recomputed from rates.
pub fn verify_invoice(invoice: &Invoice) -> CoreResult<()> {
    let overflow = |what: String| {
        CoreError::InconsistentTotals(format!("{} overflows the amount range", what))
    };

    for (i, line) in invoice.lines.iter().enumerate() {
        let summed = line
            .amount
            .checked_add(line.cgst_amount)
            .and_then(|sum| sum.checked_add(line.sgst_amount))
            .map_err(|_| overflow(format!("line {} amount + CGST + SGST", i + 1)))?;
        if summed != line.total {
            return Err(CoreError::InconsistentTotals(format!(
                "line {} total {} != amount {} + CGST {} + SGST {}",
                i + 1,
                line.total,
                line.amount,
                line.cgst_amount,
                line.sgst_amount
            )));
        }
    }

    let totals = InvoiceTotals::from_lines(&invoice.lines)
        .map_err(|_| overflow("sum of the line figures".to_string()))?;
    let checks = [
        ("subtotal", invoice.subtotal, totals.subtotal),
        ("total tax", invoice.total_tax, totals.total_tax),
        ("grand total", invoice.grand_total, totals.grand_total),
    ];
    for (field, stored, summed) in checks {
        if stored != summed {
            return Err(CoreError::InconsistentTotals(format!(
                "{} is {} but lines add up to {}",
                field, stored, summed
            )));
        }
    }

    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================
