//! # Validation Module
//!
//! Field validation for customers, catalog items and draft lines.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI forms (TypeScript)                                        │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Names, GSTIN, HSN codes (ValidationError)                         │
//! │  └── Quantity, rate, tax percent (used by the tax computer)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Repository                                                   │
//! │  └── Uniqueness of ids and invoice numbers                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bahi_core::validation::{validate_gstin, validate_hsn_code};
//!
//! assert!(validate_gstin("24AAACP1234C1Z5").is_ok());
//! assert!(validate_hsn_code("7216").is_ok());
//! assert!(validate_hsn_code("72A").is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (customer, item, line particulars).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a GSTIN.
///
/// ## Format
/// ```text
/// 24 AAACP1234C 1 Z 5
/// ── ────────── ─ ─ ─
/// │  │          │ │ └── check character (alphanumeric)
/// │  │          │ └──── always 'Z'
/// │  │          └────── entity number (alphanumeric)
/// │  └───────────────── PAN: 5 letters, 4 digits, 1 letter
/// └──────────────────── state code (2 digits)
/// ```
/// The check character itself is not verified.
pub fn validate_gstin(gstin: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "gstin".to_string(),
        reason: reason.to_string(),
    };

    let chars: Vec<char> = gstin.trim().chars().collect();
    if chars.len() != 15 {
        return Err(invalid("must be exactly 15 characters"));
    }

    let digits = |range: std::ops::Range<usize>| chars[range].iter().all(|c| c.is_ascii_digit());
    let letters =
        |range: std::ops::Range<usize>| chars[range].iter().all(|c| c.is_ascii_uppercase());

    if !digits(0..2) {
        return Err(invalid("must start with a 2-digit state code"));
    }
    if !(letters(2..7) && digits(7..11) && letters(11..12)) {
        return Err(invalid("characters 3-12 must be a PAN"));
    }
    if !chars[12].is_ascii_alphanumeric() || !chars[14].is_ascii_alphanumeric() {
        return Err(invalid("must contain only uppercase letters and digits"));
    }
    if chars[13] != 'Z' {
        return Err(invalid("14th character must be 'Z'"));
    }

    Ok(())
}

/// Validates an HSN or SAC classification code.
///
/// ## Rules
/// - Digits only
/// - 4, 6 or 8 digits long
pub fn validate_hsn_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "hsn_code".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if !matches!(code.len(), 4 | 6 | 8) {
        return Err(ValidationError::InvalidFormat {
            field: "hsn_code".to_string(),
            reason: "must be 4, 6 or 8 digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0); fractional quantities are allowed
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: Decimal) -> ValidationResult<()> {
    if qty <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > Decimal::from(MAX_LINE_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: "0".to_string(),
            max: MAX_LINE_QUANTITY.to_string(),
        });
    }

    Ok(())
}

/// Validates a unit rate in rupees.
///
/// ## Rules
/// - Must be non-negative (>= 0); zero is a free line
pub fn validate_rate(rate: Decimal) -> ValidationResult<()> {
    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(ValidationError::OutOfRange {
            field: "rate".to_string(),
            min: "0".to_string(),
            max: "unbounded".to_string(),
        });
    }

    Ok(())
}

/// Validates a tax percentage.
///
/// ## Rules
/// - Between 0 and 100 inclusive
pub fn validate_tax_percent(field: &str, pct: Decimal) -> ValidationResult<()> {
    if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
