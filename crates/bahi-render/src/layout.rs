//! # Document Layout Model
//!
//! Everything the HTML and paged renderers print, resolved to strings.
//!
//! ## Document Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GSTIN NO: 24AAACP1234C1Z5                                             │
//! │                          MK INDUSTRIES                                 │
//! │                 Unit 28, Sardar Nagar Road, Jamnagar                   │
//! │                           TAX INVOICE                                  │
//! ├────────────────────────────────────┬────────────────────────────────────┤
//! │  BILLED TO: name / address / GSTIN │  Invoice No / Date / PO            │
//! ├────┬───────────┬─────┬────┬────────┴┬───────┬─────┬─────┬─────┬────┬────┤
//! │ SR │PARTICULARS│ HSN │QTY │ RATE    │AMOUNT │CGST%│ AMT │SGST%│AMT │TOT │
//! │  1 │ ...       │     │    │         │       │     │     │     │    │    │
//! │    │ (filler rows up to row_capacity)                                   │
//! ├────┴───────────┴─────┴────┴─────────┴───────┴─────┴─────┴─────┴────┴────┤
//! │  TOTAL                                                                 │
//! ├────────────────────────────────────┬────────────────────────────────────┤
//! │  Grand total in words              │  Tax slab summary                  │
//! ├────────────────────────────────────┴────────────────────────────────────┤
//! │  BANK DETAILS                                  For, MK INDUSTRIES      │
//! │                                                Authorized Signatory    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The model only formats stored figures. No tax is computed here.

use tracing::debug;

use bahi_core::format::{format_date, format_percent, format_quantity, format_rate};
use bahi_core::slab::{SlabGrouping, TaxSlab, TaxSlabSummary};
use bahi_core::tax::verify_invoice;
use bahi_core::words::money_in_words;
use bahi_core::{CoreError, Invoice, InvoiceLine, MoneyFormat};

use crate::config::{BankDetails, RenderConfig};
use crate::error::{RenderError, RenderResult};

/// Printed when an optional field is missing.
pub const PLACEHOLDER: &str = "-";

pub const DOCUMENT_TITLE: &str = "TAX INVOICE";

// =============================================================================
// Table Columns
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    /// Width in characters on the paged document. PARTICULARS takes the
    /// remaining page width instead.
    pub width: usize,
    pub align: Align,
}

const fn col(title: &'static str, width: usize, align: Align) -> Column {
    Column {
        title,
        width,
        align,
    }
}

/// Index of the PARTICULARS column.
pub const PARTICULARS: usize = 1;

/// The item table, in print order.
pub const COLUMNS: [Column; 11] = [
    col("SR", 3, Align::Center),
    col("PARTICULARS", 24, Align::Left),
    col("HSN", 8, Align::Center),
    col("QTY", 8, Align::Right),
    col("RATE", 11, Align::Right),
    col("AMOUNT", 13, Align::Right),
    col("CGST %", 6, Align::Center),
    col("CGST AMT", 11, Align::Right),
    col("SGST %", 6, Align::Center),
    col("SGST AMT", 11, Align::Right),
    col("TOTAL", 13, Align::Right),
];

// =============================================================================
// Model
// =============================================================================

/// The billed-to block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyBlock {
    pub name: String,
    /// Empty when the customer has no address.
    pub address: String,
    /// [`PLACEHOLDER`] when the customer is unregistered.
    pub gstin: String,
}

/// One row of the item table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Item([String; 11]),
    /// Blank row keeping the table at a fixed height.
    Filler,
}

impl TableRow {
    pub fn is_filler(&self) -> bool {
        matches!(self, TableRow::Filler)
    }
}

/// Figures of the TOTAL row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsRow {
    pub amount: String,
    pub cgst: String,
    pub sgst: String,
    pub total: String,
}

/// One line of the slab summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlabRow {
    pub hsn: String,
    pub taxable: String,
    pub cgst_rate: String,
    pub cgst_amount: String,
    pub sgst_rate: String,
    pub sgst_amount: String,
}

/// Fully resolved document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentModel {
    pub seller_name: String,
    pub seller_gstin: Option<String>,
    pub seller_address: Option<String>,
    pub title: &'static str,
    pub billed_to: PartyBlock,
    pub invoice_number: String,
    pub date: String,
    pub po: String,
    pub rows: Vec<TableRow>,
    pub totals: TotalsRow,
    pub slabs: Vec<SlabRow>,
    /// Grand total with the currency symbol.
    pub grand_total: String,
    pub amount_in_words: String,
    pub bank: Option<BankDetails>,
    pub signatory: String,
}

impl DocumentModel {
    /// Lays out a computed invoice.
    ///
    /// ## Errors
    /// [`RenderError::MalformedInvoice`] when the stored figures do not add up.
    pub fn build(invoice: &Invoice, config: &RenderConfig) -> RenderResult<Self> {
        verify_invoice(invoice).map_err(|err| match err {
            CoreError::InconsistentTotals(reason) => RenderError::MalformedInvoice {
                invoice_number: invoice.invoice_number.clone(),
                reason,
            },
            other => RenderError::Core(other),
        })?;

        let money = &config.money;

        let mut rows: Vec<TableRow> = invoice
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| TableRow::Item(item_cells(i + 1, line, money)))
            .collect();
        let filler = config.layout.row_capacity.saturating_sub(rows.len());
        rows.extend(std::iter::repeat(TableRow::Filler).take(filler));

        let summary = TaxSlabSummary::aggregate(&invoice.lines, config.slab_grouping)?;
        let slabs = summary.iter().map(|s| slab_row(s, summary.grouping, money)).collect();

        let customer = &invoice.customer;
        let model = DocumentModel {
            seller_name: config.seller.name.clone(),
            seller_gstin: config.seller.gstin.clone(),
            seller_address: config.seller.address.clone(),
            title: DOCUMENT_TITLE,
            billed_to: PartyBlock {
                name: customer.name.clone(),
                address: customer.address.clone().unwrap_or_default(),
                gstin: or_placeholder(customer.gstin.as_deref()),
            },
            invoice_number: invoice.invoice_number.clone(),
            date: format_date(invoice.date),
            po: or_placeholder(invoice.po.as_deref()),
            rows,
            totals: TotalsRow {
                amount: money.format_amount(invoice.subtotal),
                cgst: money.format_amount(invoice.cgst_total()?),
                sgst: money.format_amount(invoice.sgst_total()?),
                total: money.format_amount(invoice.grand_total),
            },
            slabs,
            grand_total: money.format_currency(invoice.grand_total),
            amount_in_words: money_in_words(invoice.grand_total)?,
            bank: config.seller.bank.clone(),
            signatory: config.seller.signatory.clone(),
        };

        debug!(
            invoice_number = %model.invoice_number,
            lines = invoice.lines.len(),
            rows = model.rows.len(),
            slabs = model.slabs.len(),
            "Laid out invoice"
        );

        Ok(model)
    }

    /// Rows holding invoice lines.
    pub fn item_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_filler()).count()
    }
}

fn item_cells(sr: usize, line: &InvoiceLine, money: &MoneyFormat) -> [String; 11] {
    [
        sr.to_string(),
        line.name.clone(),
        or_placeholder(line.hsn_code.as_deref()),
        format_quantity(line.qty),
        format_rate(line.rate),
        money.format_amount(line.amount),
        format_percent(line.cgst_percent),
        money.format_amount(line.cgst_amount),
        format_percent(line.sgst_percent),
        money.format_amount(line.sgst_amount),
        money.format_amount(line.total),
    ]
}

fn slab_row(slab: &TaxSlab, grouping: SlabGrouping, money: &MoneyFormat) -> SlabRow {
    let hsn = match grouping {
        SlabGrouping::HsnAndRate => or_placeholder(slab.key.hsn_code.as_deref()),
        SlabGrouping::RateOnly if slab.hsn_codes.is_empty() => PLACEHOLDER.to_string(),
        SlabGrouping::RateOnly => slab.hsn_codes.join(", "),
    };

    SlabRow {
        hsn,
        taxable: money.format_amount(slab.amount_total),
        cgst_rate: format!("{}%", format_percent(slab.key.cgst)),
        cgst_amount: money.format_amount(slab.cgst_total),
        sgst_rate: format!("{}%", format_percent(slab.key.sgst)),
        sgst_amount: money.format_amount(slab.sgst_total),
    }
}

fn or_placeholder(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}
