//! # Error Types
//!
//! Domain-specific error types for bahi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bahi-core errors (this file)                                          │
//! │  ├── CoreError        - Invoice computation failures                   │
//! │  └── ValidationError  - Field validation failures                      │
//! │                                                                         │
//! │  bahi-render errors (separate crate)                                   │
//! │  └── RenderError      - Layout / artifact emission failures            │
//! │                                                                         │
//! │  bahi-store errors (separate crate)                                    │
//! │  └── StoreError       - Repository and issuance failures               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → RenderError / StoreError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Monetary fields never fall back to a default value: every failure in the
//! computation path surfaces as one of these variants.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Invoice computation errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A draft line is malformed or internally inconsistent.
    ///
    /// ## When This Occurs
    /// - Quantity is zero or negative
    /// - Rate is negative
    /// - Tax percent outside 0..=100
    /// - CGST + SGST does not add up to the declared tax percent
    ///
    /// `line` is the 1-based position on the invoice (0 when the line was
    /// computed on its own).
    #[error("Invalid line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },

    /// Amount cannot be expressed in words.
    #[error("Amount {value} is out of range (must be between 0 and {max})")]
    OutOfRange { value: String, max: String },

    /// The generated invoice number is already taken.
    ///
    /// Raised instead of silently picking another suffix; the caller owns
    /// the retry policy.
    #[error("Invoice number {0} already exists")]
    InvoiceNumberCollision(String),

    /// The highest existing sequence number has no successor.
    #[error("Invoice sequence is exhausted after {0}")]
    SequenceExhausted(String),

    /// A figure does not fit in the money range.
    #[error("Amount overflows the supported money range")]
    AmountOverflow,

    /// Stored figures of an invoice contradict each other.
    ///
    /// ## When This Occurs
    /// - A record was edited outside the engine (e.g. grand total patched)
    /// - A persistence collaborator truncated a field
    #[error("Invoice figures are inconsistent: {0}")]
    InconsistentTotals(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidLine error for an unpositioned line.
    pub fn invalid_line(reason: impl Into<String>) -> Self {
        CoreError::InvalidLine {
            line: 0,
            reason: reason.into(),
        }
    }

    /// Attaches the 1-based line position to an InvalidLine error.
    pub fn at_line(self, position: usize) -> Self {
        match self {
            CoreError::InvalidLine { reason, .. } => CoreError::InvalidLine {
                line: position,
                reason,
            },
            other => other,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed GSTIN or HSN code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
