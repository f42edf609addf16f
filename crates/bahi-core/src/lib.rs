//! # bahi-core: Pure Invoice Computation for Bahi
//!
//! This crate turns a draft GST invoice into validated, rounded figures,
//! a tax slab summary, the amount in words and the next invoice number.
//! Everything here is a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Bahi Data Flow                                 │
//! │                                                                         │
//! │  DraftLine ──► tax (Line-Item Tax Computer) ──► InvoiceLine            │
//! │                                                    │                    │
//! │                     ┌──────────────────────────────┤                    │
//! │                     ▼                              ▼                    │
//! │           slab (Tax-Slab Aggregator)      InvoiceTotals                 │
//! │                     │                              │                    │
//! │                     │     numbering ──► invoice_number                  │
//! │                     │     words ──────► grand total in words            │
//! │                     ▼                              ▼                    │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              bahi-render (Document Renderer)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Customer, CatalogItem, Invoice, ...)
//! - [`money`] - Money type in integer paise
//! - [`tax`] - Line-item tax computer and invoice assembly
//! - [`slab`] - Tax slab aggregation
//! - [`words`] - Amount in words (lakh/crore grouping)
//! - [`numbering`] - Invoice number generation
//! - [`format`] - Monetary and numeric display formatting
//! - [`validation`] - Field validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bahi_core::tax::compute_line;
//! use bahi_core::types::DraftLine;
//! use rust_decimal::Decimal;
//!
//! let draft = DraftLine::new("Steel bracket", Decimal::new(100, 0), Decimal::new(2, 0))
//!     .with_tax_percent(Decimal::new(18, 0));
//! let line = compute_line(&draft).unwrap();
//!
//! assert_eq!(line.amount.paise(), 20000);
//! assert_eq!(line.cgst_amount.paise(), 1800);
//! assert_eq!(line.total.paise(), 23600);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod money;
pub mod numbering;
pub mod slab;
pub mod tax;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use format::{Grouping, MoneyFormat};
pub use money::Money;
pub use numbering::NumberingScheme;
pub use slab::{SlabGrouping, SlabKey, TaxSlab, TaxSlabSummary};
pub use tax::InvoiceTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity accepted on a single invoice line.
///
/// Keeps `rate × qty` comfortably inside the money range.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Maximum number of lines on one invoice.
pub const MAX_INVOICE_LINES: usize = 500;
