//! # bahi-render CLI
//!
//! Renders a computed invoice (JSON, as stored by `bahi-store`) to a file.
//!
//! ## Usage
//! ```bash
//! bahi-render invoice.json                        # INV-2026-0001.html
//! bahi-render invoice.json --format paged -o out.txt
//! RUST_LOG=debug bahi-render invoice.json --config ./bahi.toml
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use bahi_core::Invoice;
use bahi_render::{render_to, FileChannel, Format, RenderConfig};

/// Render a GST invoice to HTML or a paginated print document.
#[derive(Parser, Debug)]
#[command(name = "bahi-render", version, about)]
struct Cli {
    /// Invoice JSON file.
    input: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Output file. Defaults to `<invoice number>.<ext>` in the current
    /// directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,bahi=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .init();
}

/// `<invoice number>.<ext>` in the current directory. Refuses invoice
/// numbers that could name another directory.
fn default_target(invoice_number: &str, format: Format) -> anyhow::Result<PathBuf> {
    let unsafe_name = invoice_number.trim().is_empty()
        || invoice_number.starts_with('.')
        || invoice_number
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':') || c.is_control());
    if unsafe_name {
        bail!(
            "invoice number {:?} cannot be used as a file name; pass --output",
            invoice_number
        );
    }

    Ok(PathBuf::from(format!(
        "{}.{}",
        invoice_number,
        format.extension()
    )))
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = RenderConfig::load(cli.config.clone()).context("loading render config")?;

    let raw = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let invoice: Invoice = serde_json::from_str(&raw)
        .with_context(|| format!("parsing invoice JSON in {}", cli.input.display()))?;

    let target = match cli.output {
        Some(path) => path,
        None => default_target(&invoice.invoice_number, cli.format)?,
    };

    let mut channel = FileChannel::new(&target);
    render_to(&invoice, &config, cli.format, &mut channel)
        .with_context(|| format!("rendering {}", invoice.invoice_number))?;

    info!(path = %target.display(), "Done");
    Ok(())
}
