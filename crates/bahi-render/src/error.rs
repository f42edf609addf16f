//! # Render Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Render Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Input       │  │     Output      │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │ MalformedInvoice│  │ ChannelUnavail. │  │  Config                 │ │
//! │  │ Core            │  │ Finalize, Io    │  │  ConfigLoad             │ │
//! │  │                 │  │ Template        │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Output resources are released before any of these propagate.

use thiserror::Error;

use bahi_core::CoreError;

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// The invoice's stored figures violate the line or invoice identities.
    #[error("Malformed invoice {invoice_number}: {reason}")]
    MalformedInvoice {
        invoice_number: String,
        reason: String,
    },

    /// A core operation (words, slabs) failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Output Errors
    // =========================================================================
    /// The output destination could not be opened.
    #[error("Output channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// The artifact was written but could not be committed.
    #[error("Failed to finalize output: {0}")]
    Finalize(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTML template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are out of range.
    #[error("Invalid render configuration: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),
}

impl From<toml::de::Error> for RenderError {
    fn from(err: toml::de::Error) -> Self {
        RenderError::ConfigLoad(err.to_string())
    }
}
