//! # HTML Renderer
//!
//! Renders a [`DocumentModel`] as a single self-contained HTML page through
//! the `templates/invoice.html` askama template.
//!
//! - All styling is inline CSS with an `@page` A4 rule for printing
//! - No scripts, fonts, images or other external resources
//! - Every interpolated value is HTML-escaped by the template engine

use askama::Template;

use crate::error::RenderResult;
use crate::layout::{Align, DocumentModel, TableRow, COLUMNS};

/// Column header and its share of the table width.
struct ColumnView {
    title: &'static str,
    /// Percentage, one decimal.
    width: String,
}

struct CellView<'a> {
    text: &'a str,
    class: &'static str,
}

/// An item row; no cells means a filler row.
struct RowView<'a> {
    cells: Vec<CellView<'a>>,
}

#[derive(Template)]
#[template(path = "invoice.html")]
struct InvoiceTemplate<'a> {
    model: &'a DocumentModel,
    columns: Vec<ColumnView>,
    rows: Vec<RowView<'a>>,
}

impl<'a> InvoiceTemplate<'a> {
    fn new(model: &'a DocumentModel) -> Self {
        let total_width: usize = COLUMNS.iter().map(|c| c.width).sum();
        let columns = COLUMNS
            .iter()
            .map(|c| ColumnView {
                title: c.title,
                width: format!("{:.1}", c.width as f64 * 100.0 / total_width as f64),
            })
            .collect();

        let rows = model
            .rows
            .iter()
            .map(|row| match row {
                TableRow::Item(cells) => RowView {
                    cells: cells
                        .iter()
                        .zip(COLUMNS.iter())
                        .map(|(text, column)| CellView {
                            text,
                            class: class(column.align),
                        })
                        .collect(),
                },
                TableRow::Filler => RowView { cells: Vec::new() },
            })
            .collect();

        Self {
            model,
            columns,
            rows,
        }
    }
}

fn class(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Right => "right",
        Align::Center => "center",
    }
}

/// Renders the document model to an HTML string.
pub fn render_html(model: &DocumentModel) -> RenderResult<String> {
    Ok(InvoiceTemplate::new(model).render()?)
}
