//! # Domain Types
//!
//! Core records of the invoicing tool.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │   CatalogItem   │   │    Invoice      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  name           │   │  invoice_number │       │
//! │  │  gstin?         │   │  hsn_code?      │   │  customer (snap)│       │
//! │  │  address?       │   │  rate           │   │  lines          │       │
//! │  └────────┬────────┘   └────────┬────────┘   │  totals, status │       │
//! │           │ snapshot()          │ draft_line()└────────▲────────┘       │
//! │           ▼                     ▼                      │                │
//! │    CustomerSnapshot ───────► DraftLine ── tax ──► InvoiceLine           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Invoices copy customer and catalog fields at creation time. Editing or
//! deleting a customer or catalog item never changes an issued invoice.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// A tax rate as an exact percentage (`9` = 9%, `2.5` = 2.5%).
///
/// Percent rather than basis points because GST sub-rates such as 0.125%
/// (half of the 0.25% slab) are not whole basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(#[ts(as = "String")] Decimal);

impl TaxRate {
    /// Creates a tax rate from a percentage.
    #[inline]
    pub const fn from_percent(pct: Decimal) -> Self {
        TaxRate(pct)
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Half of this rate (the CGST/SGST share of an intra-state rate).
    #[inline]
    pub fn half(&self) -> TaxRate {
        TaxRate(self.0 / Decimal::TWO)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// `9`, `2.5`, `0.125` - trailing zeros dropped.
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// The two co-equal components of a line's GST rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxSplit {
    /// Central GST percent.
    pub cgst: TaxRate,
    /// State GST percent.
    pub sgst: TaxRate,
}

impl TaxSplit {
    /// Splits a total rate into two equal halves.
    pub fn even(total: TaxRate) -> Self {
        let half = total.half();
        TaxSplit {
            cgst: half,
            sgst: half,
        }
    }

    /// Combined rate.
    pub fn total(&self) -> Decimal {
        self.cgst.percent() + self.sgst.percent()
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A billed party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,

    /// Display name printed in the billed-to block.
    pub name: String,

    /// GST registration number, if the customer is registered.
    pub gstin: Option<String>,

    pub address: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Freezes the display fields for an invoice.
    pub fn snapshot(&self) -> CustomerSnapshot {
        CustomerSnapshot {
            name: self.name.clone(),
            gstin: self.gstin.clone(),
            address: self.address.clone(),
        }
    }
}

/// Customer fields as they were when the invoice was created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    pub name: String,
    pub gstin: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Catalog Item
// =============================================================================

/// A reusable item template. Its rate is only a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,

    /// HSN (goods) or SAC (services) classification code.
    pub hsn_code: Option<String>,

    /// Default unit rate in rupees.
    #[ts(as = "String")]
    pub rate: Decimal,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Starts a draft line from this item, copying name, HSN and rate.
    ///
    /// Later catalog edits do not flow into the line.
    pub fn draft_line(&self, qty: Decimal, tax_percent: Decimal) -> DraftLine {
        DraftLine {
            item_id: Some(self.id.clone()),
            name: self.name.clone(),
            hsn_code: self.hsn_code.clone(),
            rate: self.rate,
            qty,
            tax_percent: TaxRate::from_percent(tax_percent),
            split: None,
        }
    }
}

// =============================================================================
// Draft Line
// =============================================================================

/// An invoice line as entered, before any computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DraftLine {
    /// Catalog item this line was created from, if any.
    #[serde(default)]
    pub item_id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub hsn_code: Option<String>,

    /// Unit rate in rupees.
    #[ts(as = "String")]
    pub rate: Decimal,

    #[ts(as = "String")]
    pub qty: Decimal,

    /// Total GST percent on the line.
    #[serde(default)]
    pub tax_percent: TaxRate,

    /// Explicit CGST/SGST split. `None` splits `tax_percent` evenly.
    #[serde(default)]
    pub split: Option<TaxSplit>,
}

impl DraftLine {
    /// Creates an untaxed draft line.
    pub fn new(name: impl Into<String>, rate: Decimal, qty: Decimal) -> Self {
        DraftLine {
            item_id: None,
            name: name.into(),
            hsn_code: None,
            rate,
            qty,
            tax_percent: TaxRate::zero(),
            split: None,
        }
    }

    pub fn with_hsn(mut self, hsn_code: impl Into<String>) -> Self {
        self.hsn_code = Some(hsn_code.into());
        self
    }

    pub fn with_tax_percent(mut self, pct: Decimal) -> Self {
        self.tax_percent = TaxRate::from_percent(pct);
        self
    }

    /// Declares the total and an explicit CGST/SGST split.
    pub fn with_split(mut self, cgst: Decimal, sgst: Decimal) -> Self {
        self.split = Some(TaxSplit {
            cgst: TaxRate::from_percent(cgst),
            sgst: TaxRate::from_percent(sgst),
        });
        self
    }

    /// The split that will be applied.
    pub fn effective_split(&self) -> TaxSplit {
        self.split.unwrap_or_else(|| TaxSplit::even(self.tax_percent))
    }
}

// =============================================================================
// Invoice Line
// =============================================================================

/// A computed invoice line.
///
/// ## Invariants
/// - `amount = round(rate × qty)`
/// - `cgst_amount = round(rate × qty × cgst% / 100)`, same for SGST
/// - `total = amount + cgst_amount + sgst_amount`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub item_id: Option<String>,
    pub name: String,
    pub hsn_code: Option<String>,
    #[ts(as = "String")]
    pub rate: Decimal,
    #[ts(as = "String")]
    pub qty: Decimal,
    pub cgst_percent: TaxRate,
    pub sgst_percent: TaxRate,
    /// Taxable value.
    pub amount: Money,
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    /// Amount including tax.
    pub total: Money,
}

impl InvoiceLine {
    /// Combined GST percent.
    pub fn tax_percent(&self) -> Decimal {
        self.cgst_percent.percent() + self.sgst_percent.percent()
    }

    /// CGST + SGST.
    pub fn tax_amount(&self) -> CoreResult<Money> {
        self.cgst_amount.checked_add(self.sgst_amount)
    }
}

// =============================================================================
// Invoice Status
// =============================================================================

/// Payment status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Pending,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Pending => write!(f, "pending"),
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// An invoice as entered by the user, before numbering and computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    #[serde(default)]
    pub customer_id: Option<String>,
    pub customer: CustomerSnapshot,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Purchase order reference.
    #[serde(default)]
    pub po: Option<String>,
    pub lines: Vec<DraftLine>,
    #[serde(default)]
    pub status: InvoiceStatus,
}

/// An issued invoice with every figure resolved.
///
/// ## Invariants
/// - `subtotal = Σ line.amount`
/// - `total_tax = Σ (line.cgst_amount + line.sgst_amount)`
/// - `grand_total = subtotal + total_tax`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub po: Option<String>,
    pub customer_id: Option<String>,
    pub customer: CustomerSnapshot,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: Money,
    pub total_tax: Money,
    pub grand_total: Money,
    pub status: InvoiceStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Σ CGST over all lines.
    pub fn cgst_total(&self) -> CoreResult<Money> {
        Money::checked_sum(self.lines.iter().map(|l| l.cgst_amount))
    }

    /// Σ SGST over all lines.
    pub fn sgst_total(&self) -> CoreResult<Money> {
        Money::checked_sum(self.lines.iter().map(|l| l.sgst_amount))
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_display_drops_trailing_zeros() {
        assert_eq!(TaxRate::from_percent(Decimal::new(900, 2)).to_string(), "9");
        assert_eq!(TaxRate::from_percent(Decimal::new(25, 1)).to_string(), "2.5");
        assert_eq!(TaxRate::from_percent(Decimal::new(125, 3)).to_string(), "0.125");
    }

    #[test]
    fn test_even_split() {
        let split = TaxSplit::even(TaxRate::from_percent(Decimal::new(18, 0)));
        assert_eq!(split.cgst.percent(), Decimal::new(9, 0));
        assert_eq!(split.sgst.percent(), Decimal::new(9, 0));
        assert_eq!(split.total(), Decimal::new(18, 0));

        let split = TaxSplit::even(TaxRate::from_percent(Decimal::new(25, 2)));
        assert_eq!(split.cgst.percent(), Decimal::new(125, 3));
    }

    #[test]
    fn test_tax_rate_equality_ignores_scale() {
        assert_eq!(
            TaxRate::from_percent(Decimal::new(9, 0)),
            TaxRate::from_percent(Decimal::new(900, 2))
        );
    }

    #[test]
    fn test_catalog_draft_line_copies_fields() {
        let item = CatalogItem {
            id: "item-1".to_string(),
            name: "MS Angle 40x40".to_string(),
            hsn_code: Some("7216".to_string()),
            rate: Decimal::new(7250, 2),
            created_at: Utc::now(),
        };
        let line = item.draft_line(Decimal::new(3, 0), Decimal::new(18, 0));
        assert_eq!(line.item_id.as_deref(), Some("item-1"));
        assert_eq!(line.hsn_code.as_deref(), Some("7216"));
        assert_eq!(line.rate, Decimal::new(7250, 2));
        assert!(line.split.is_none());
    }

    #[test]
    fn test_customer_snapshot() {
        let customer = Customer {
            id: "c-1".to_string(),
            name: "Patel Traders".to_string(),
            gstin: Some("24AAACP1234C1Z5".to_string()),
            address: None,
            created_at: Utc::now(),
        };
        let snap = customer.snapshot();
        assert_eq!(snap.name, "Patel Traders");
        assert_eq!(snap.gstin.as_deref(), Some("24AAACP1234C1Z5"));
        assert!(snap.address.is_none());
    }

    #[test]
    fn test_status_default_and_serde() {
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Pending);
        let json = serde_json::to_string(&InvoiceStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
    }

    #[test]
    fn test_draft_line_json_defaults() {
        let line: DraftLine =
            serde_json::from_str(r#"{"name":"Labour","rate":"500","qty":"1.5"}"#).unwrap();
        assert_eq!(line.qty, Decimal::new(15, 1));
        assert!(line.tax_percent.is_zero());
        assert!(line.hsn_code.is_none());
    }
}
