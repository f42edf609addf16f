//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError / CoreError (bahi-core)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds NotFound / Duplicate                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UI / API layer ← Shows a user-facing message                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use bahi_core::{CoreError, ValidationError};

/// Repository and service errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found.
    ///
    /// ## When This Occurs
    /// - Unknown id passed to get/update/delete
    /// - Catalog item or customer removed before use
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Uniqueness violation.
    ///
    /// ## When This Occurs
    /// - Inserting a record whose id already exists
    /// - Duplicate invoice number
    /// - Customer or item name already taken (case-insensitive)
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Invoice computation or numbering failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Field validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Store configuration could not be parsed.
    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::Config(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
