//! # bahi-render: Invoice Document Renderer
//!
//! Turns a computed [`Invoice`] into a printable artifact.
//!
//! ## Rendering Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Invoice ──► layout::DocumentModel::build ──┬──► html::render_html      │
//! │               (consistency gate, slabs,     │     (A4, inline CSS)      │
//! │                words, filler rows)          │                           │
//! │                                             └──► paged::render_paged    │
//! │                                                   (fixed-width pages)   │
//! │                                                          │              │
//! │                                output::emit ◄────────────┘              │
//! │                     (FileChannel / MemoryChannel)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Seller profile, layout and money format (TOML + env)
//! - [`layout`] - Document model shared by both renderers
//! - [`html`] - Self-contained HTML markup
//! - [`paged`] - Paginated fixed-width print document
//! - [`output`] - Output channels with scoped acquisition
//! - [`error`] - Render error types

pub mod config;
pub mod error;
pub mod html;
pub mod layout;
pub mod output;
pub mod paged;

pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use layout::DocumentModel;
pub use output::{emit, FileChannel, MemoryChannel, OutputChannel};

use serde::{Deserialize, Serialize};
use tracing::info;

use bahi_core::Invoice;

/// Artifact kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// Self-contained HTML page.
    #[default]
    Html,
    /// Fixed-width pages separated by form feeds.
    Paged,
}

impl Format {
    /// File extension for the artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Paged => "txt",
        }
    }
}

/// Renders `invoice` to bytes in the chosen format.
pub fn render(invoice: &Invoice, config: &RenderConfig, format: Format) -> RenderResult<Vec<u8>> {
    config.validate()?;
    let model = DocumentModel::build(invoice, config)?;
    let bytes = match format {
        Format::Html => html::render_html(&model)?.into_bytes(),
        Format::Paged => paged::render_paged(&model, &config.layout)?.to_bytes(),
    };
    info!(
        invoice_number = %invoice.invoice_number,
        ?format,
        bytes = bytes.len(),
        "Rendered invoice"
    );
    Ok(bytes)
}

/// Renders `invoice` into `channel`, releasing it if anything fails.
pub fn render_to<C>(
    invoice: &Invoice,
    config: &RenderConfig,
    format: Format,
    channel: &mut C,
) -> RenderResult<()>
where
    C: OutputChannel + ?Sized,
{
    emit(channel, || render(invoice, config, format))
}
