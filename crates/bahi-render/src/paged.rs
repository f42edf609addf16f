//! # Paged Print Renderer
//!
//! Renders a [`DocumentModel`] as fixed-width character pages for line
//! printers and plain-text archives.
//!
//! ## Pagination Rules
//! ```text
//! ┌──────────────── page 1 ────────────────┐  ┌──────────────── page 2 ────────────────┐
//! │ seller header, billed-to block         │  │ +--+-----------+---+...  (repeated)    │
//! │ +--+-----------+---+...  table header  │  │ |SR|PARTICULARS|HSN|...                │
//! │ | 1| Steel     |   |...                │  │ +--+-----------+---+...                │
//! │ |  | bracket   |   |...  ◄─ one row,   │  │ |24| ...                               │
//! │ | 2| ...       |   |...     never split│  │ TOTAL, words, slabs, bank (whole)      │
//! │                                        │  │                                        │
//! │                           Page 1 of 2  │  │                           Page 2 of 2  │
//! └────────────────────────────────────────┘  └────────────────────────────────────────┘
//!                    pages are separated by a form feed (0x0C)
//! ```

use tracing::debug;

use crate::config::LayoutConfig;
use crate::error::{RenderError, RenderResult};
use crate::layout::{Align, DocumentModel, TableRow, COLUMNS, PARTICULARS};

/// Page separator in the byte stream.
pub const FORM_FEED: char = '\u{0C}';

/// Blank line plus the "Page i of n" line.
const FOOTER_LINES: usize = 2;

/// A rendered paginated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedDocument {
    /// Every page holds exactly `height` lines.
    pub pages: Vec<Vec<String>>,
    pub width: usize,
    pub height: usize,
}

impl PagedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// UTF-8 text, lines ending in `\n`, pages separated by a form feed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push(FORM_FEED);
            }
            for line in page {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.into_bytes()
    }
}

/// Lays the model out on pages of `layout.page_width × layout.page_height`.
///
/// ## Errors
/// [`RenderError::Config`] when a single row or block is taller than a page.
pub fn render_paged(model: &DocumentModel, layout: &LayoutConfig) -> RenderResult<PagedDocument> {
    layout.validate()?;

    let width = layout.page_width;
    let widths = column_widths(width);
    let usable = layout.page_height.saturating_sub(FOOTER_LINES);

    let table_header = {
        let titles: Vec<String> = COLUMNS.iter().map(|c| c.title.to_string()).collect();
        let mut lines = vec![rule(&widths)];
        lines.extend(table_row(&titles, &widths, &[Align::Center; 11]));
        lines.push(rule(&widths));
        lines
    };
    let aligns: Vec<Align> = COLUMNS.iter().map(|c| c.align).collect();

    let mut pager = Paginator::new(usable);
    pager.place(header_block(model, width))?;

    for row in &model.rows {
        let lines = match row {
            TableRow::Item(cells) => table_row(cells, &widths, &aligns),
            TableRow::Filler => table_row(&[""; 11].map(String::from), &widths, &aligns),
        };
        pager.place_row(&table_header, lines)?;
    }

    let totals = &model.totals;
    let mut totals_block = vec![rule(&widths)];
    totals_block.extend(table_row(
        &[
            "",
            "TOTAL",
            "",
            "",
            "",
            totals.amount.as_str(),
            "",
            totals.cgst.as_str(),
            "",
            totals.sgst.as_str(),
            totals.total.as_str(),
        ]
        .map(String::from),
        &widths,
        &aligns,
    ));
    totals_block.push(rule(&widths));
    pager.place_row(&table_header, totals_block)?;

    pager.place(words_block(model, width))?;
    pager.place(slab_block(model, width))?;
    pager.place(footer_block(model, width))?;

    let pages = pager.finish(width, layout.page_height);
    debug!(
        invoice_number = %model.invoice_number,
        pages = pages.len(),
        "Paginated invoice"
    );

    Ok(PagedDocument {
        pages,
        width,
        height: layout.page_height,
    })
}

// =============================================================================
// Pagination
// =============================================================================

struct Paginator {
    usable: usize,
    pages: Vec<Vec<String>>,
    current: Vec<String>,
    table_header_placed: bool,
}

impl Paginator {
    fn new(usable: usize) -> Self {
        Self {
            usable,
            pages: Vec::new(),
            current: Vec::new(),
            table_header_placed: false,
        }
    }

    fn remaining(&self) -> usize {
        self.usable - self.current.len()
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.table_header_placed = false;
    }

    fn ensure_fits(&self, needed: usize) -> RenderResult<()> {
        if needed > self.usable {
            return Err(RenderError::Config(format!(
                "a block needs {} lines but a page holds {}",
                needed, self.usable
            )));
        }
        Ok(())
    }

    /// Places a block that must stay on one page.
    fn place(&mut self, block: Vec<String>) -> RenderResult<()> {
        self.ensure_fits(block.len())?;
        if block.len() > self.remaining() {
            self.break_page();
        }
        self.current.extend(block);
        Ok(())
    }

    /// Places a table row, preceded by the table header on a fresh page.
    fn place_row(&mut self, header: &[String], row: Vec<String>) -> RenderResult<()> {
        self.ensure_fits(header.len() + row.len())?;

        let header_needed = if self.table_header_placed { 0 } else { header.len() };
        if header_needed + row.len() > self.remaining() {
            self.break_page();
        }
        if !self.table_header_placed {
            self.current.extend(header.iter().cloned());
            self.table_header_placed = true;
        }
        self.current.extend(row);
        Ok(())
    }

    fn finish(mut self, width: usize, height: usize) -> Vec<Vec<String>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }

        let total = self.pages.len();
        self.pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                page.resize(self.usable, String::new());
                page.push(String::new());
                page.push(pad(&format!("Page {} of {}", i + 1, total), width, Align::Right));
                page.truncate(height);
                page
            })
            .collect()
    }
}

// =============================================================================
// Blocks
// =============================================================================

fn header_block(model: &DocumentModel, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(gstin) = &model.seller_gstin {
        lines.push(format!("GSTIN NO: {}", gstin));
    }
    for line in wrap(&model.seller_name, width) {
        lines.push(pad(&line, width, Align::Center));
    }
    if let Some(address) = &model.seller_address {
        for line in wrap(address, width) {
            lines.push(pad(&line, width, Align::Center));
        }
    }
    lines.push(pad(model.title, width, Align::Center));
    lines.push("=".repeat(width));

    let half = width / 2;
    let party = &model.billed_to;
    let mut left = vec!["BILLED TO:".to_string()];
    left.extend(wrap(&party.name, half.saturating_sub(1)));
    if !party.address.is_empty() {
        left.extend(wrap(&party.address, half.saturating_sub(1)));
    }
    left.push(format!("GSTIN: {}", party.gstin));

    let right = [
        format!("Invoice No: {}", model.invoice_number),
        format!("Date: {}", model.date),
        format!("PO No: {}", model.po),
    ];

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).map(String::as_str).unwrap_or("");
        let r = right.get(i).map(String::as_str).unwrap_or("");
        lines.push(trim_end(format!("{}{}", pad(l, half, Align::Left), r)));
    }
    lines.push(String::new());
    lines
}

fn words_block(model: &DocumentModel, width: usize) -> Vec<String> {
    let mut lines = vec![String::new(), "Grand Total in Words:".to_string()];
    lines.extend(wrap(&model.amount_in_words, width));
    lines
}

fn slab_block(model: &DocumentModel, width: usize) -> Vec<String> {
    const TITLES: [&str; 6] = ["HSN", "TAXABLE", "CGST RATE", "CGST TAX", "SGST RATE", "SGST TAX"];
    let widths = [width.saturating_sub(7 + 5 * 14).max(8), 14, 9, 14, 9, 14];
    let aligns = [
        Align::Left,
        Align::Right,
        Align::Center,
        Align::Right,
        Align::Center,
        Align::Right,
    ];

    let mut lines = vec![String::new(), rule(&widths)];
    lines.extend(table_row(&TITLES.map(String::from), &widths, &[Align::Center; 6]));
    lines.push(rule(&widths));
    for slab in &model.slabs {
        let cells = [
            slab.hsn.clone(),
            slab.taxable.clone(),
            slab.cgst_rate.clone(),
            slab.cgst_amount.clone(),
            slab.sgst_rate.clone(),
            slab.sgst_amount.clone(),
        ];
        lines.extend(table_row(&cells, &widths, &aligns));
    }
    lines.push(rule(&widths));
    lines.push(pad(
        &format!("Grand Total: {}", model.grand_total),
        width,
        Align::Right,
    ));
    lines
}

fn footer_block(model: &DocumentModel, width: usize) -> Vec<String> {
    let half = width / 2;
    let mut left: Vec<String> = Vec::new();
    if let Some(bank) = &model.bank {
        left.push("BANK DETAILS:".to_string());
        left.push(format!("Bank Name: {}", bank.bank_name));
        left.push(format!("A/c No: {}", bank.account_number));
        left.push(format!("IFSC: {}", bank.ifsc));
    }
    let right = [
        format!("For, {}", model.seller_name),
        String::new(),
        String::new(),
        model.signatory.clone(),
    ];

    let mut lines = vec!["-".repeat(width)];
    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).map(String::as_str).unwrap_or("");
        let r = right.get(i).map(String::as_str).unwrap_or("");
        lines.push(trim_end(format!(
            "{}{}",
            pad(l, half, Align::Left),
            pad(r, width - half, Align::Right)
        )));
    }
    lines
}

// =============================================================================
// Text Helpers
// =============================================================================

/// Column widths for a page; PARTICULARS takes what the others leave.
fn column_widths(page_width: usize) -> [usize; 11] {
    let fixed: usize = COLUMNS
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != PARTICULARS)
        .map(|(_, c)| c.width)
        .sum();
    let borders = COLUMNS.len() + 1;

    let mut widths = COLUMNS.map(|c| c.width);
    widths[PARTICULARS] = page_width.saturating_sub(fixed + borders).max(8);
    widths
}

fn rule(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.push_str(&"-".repeat(*w));
        line.push('+');
    }
    line
}

/// Formats one table row; cells wrap inside their column so the row may
/// span several lines.
fn table_row(cells: &[String], widths: &[usize], aligns: &[Align]) -> Vec<String> {
    let wrapped: Vec<Vec<String>> = cells.iter().zip(widths).map(|(c, w)| wrap(c, *w)).collect();
    let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

    (0..height)
        .map(|i| {
            let mut line = String::from("|");
            for ((cell_lines, w), align) in wrapped.iter().zip(widths).zip(aligns) {
                let text = cell_lines.get(i).map(String::as_str).unwrap_or("");
                line.push_str(&pad(text, *w, *align));
                line.push('|');
            }
            line
        })
        .collect()
}

/// Word-wraps `text` to `width` characters, hard-breaking long words.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let len = current.chars().count();
        if len == 0 {
            current = word.into_iter().collect();
        } else if len + 1 + word.len() <= width {
            current.push(' ');
            current.extend(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.into_iter().collect()));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn pad(text: &str, width: usize, align: Align) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let gap = width - len;
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(gap)),
        Align::Right => format!("{}{}", " ".repeat(gap), text),
        Align::Center => {
            let left = gap / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(gap - left))
        }
    }
}

fn trim_end(line: String) -> String {
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RenderConfig, MIN_PAGE_WIDTH};
    use crate::layout::tests::sample_invoice;

    fn paged(lines: usize, config: &RenderConfig) -> PagedDocument {
        let model = DocumentModel::build(&sample_invoice(lines), config).unwrap();
        render_paged(&model, &config.layout).unwrap()
    }

    fn is_item_line(line: &str) -> bool {
        line.starts_with('|') && !line.contains("PARTICULARS") && !line.contains("TOTAL")
    }

    #[test]
    fn test_rejects_page_narrower_than_minimum() {
        let config = RenderConfig::default();
        let model = DocumentModel::build(&sample_invoice(1), &config).unwrap();

        for page_width in [0, 1, MIN_PAGE_WIDTH - 1] {
            let layout = LayoutConfig {
                page_width,
                ..LayoutConfig::default()
            };
            assert!(matches!(
                render_paged(&model, &layout),
                Err(RenderError::Config(_))
            ));
        }
    }

    #[test]
    fn test_single_page_geometry() {
        let config = RenderConfig::default();
        let doc = paged(2, &config);

        assert_eq!(doc.page_count(), 1);
        let page = &doc.pages[0];
        assert_eq!(page.len(), config.layout.page_height);
        assert!(page.iter().all(|l| l.chars().count() <= config.layout.page_width));
        assert!(page.last().unwrap().ends_with("Page 1 of 1"));

        let table_lines = page
            .iter()
            .filter(|l| is_item_line(l))
            .count();
        // 24 table rows, then slab header and one slab row
        assert_eq!(table_lines, 24 + 2);
        assert!(page.iter().any(|l| l.contains("Grand Total: ₹472.00")));
    }

    #[test]
    fn test_rows_never_split_and_header_repeats() {
        let mut config = RenderConfig::default();
        config.layout.row_capacity = 1;
        config.layout.page_height = 40;
        config.layout.page_width = 120;

        let mut invoice = sample_invoice(30);
        for line in &mut invoice.lines {
            // wraps to three lines in an 18-character column
            line.name = "Mild steel angle 40x40x5 mm galvanised".to_string();
        }
        let model = DocumentModel::build(&invoice, &config).unwrap();
        let doc = render_paged(&model, &config.layout).unwrap();

        assert!(doc.page_count() > 1);
        let mut item_lines = 0;
        for (i, page) in doc.pages.iter().enumerate() {
            assert_eq!(page.len(), 40);
            assert!(page.last().unwrap().ends_with(&format!("Page {} of {}", i + 1, doc.page_count())));

            let Some(header) = page.iter().position(|l| l.contains("PARTICULARS")) else {
                assert!(
                    !page.iter().any(|l| l.contains("Mild steel")),
                    "page {} has rows without the table header",
                    i + 1
                );
                continue;
            };
            let items: Vec<&String> = page[header + 2..]
                .iter()
                .take_while(|l| l.starts_with('|'))
                .collect();
            item_lines += items.len();
            assert_eq!(items.len() % 3, 0, "page {} splits a row", i + 1);
            // every row starts with its serial number
            for chunk in items.chunks(3) {
                assert!(chunk[0].trim_start_matches('|').trim_start().starts_with(char::is_numeric));
            }
        }
        assert_eq!(item_lines, 30 * 3);
    }

    #[test]
    fn test_to_bytes_separates_pages() {
        let mut config = RenderConfig::default();
        config.layout.page_height = 40;
        let doc = paged(2, &config);
        assert!(doc.page_count() >= 2);

        let text = String::from_utf8(doc.to_bytes()).unwrap();
        let pages: Vec<&str> = text.split(FORM_FEED).collect();
        assert_eq!(pages.len(), doc.page_count());
        assert_eq!(pages[0].lines().count(), 40);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("Steel bracket", 20), vec!["Steel bracket"]);
        assert_eq!(wrap("Steel bracket", 6), vec!["Steel", "bracke", "t"]);
        assert_eq!(wrap("", 6), vec![""]);
        assert_eq!(wrap("a b c", 3), vec!["a b", "c"]);
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4, Align::Right), "  ab");
        assert_eq!(pad("ab", 5, Align::Center), " ab  ");
        assert_eq!(pad("₹1", 3, Align::Left), "₹1 ");
    }

    #[test]
    fn test_column_widths_fill_page() {
        for width in [120, 132, 160] {
            let widths = column_widths(width);
            assert_eq!(widths.iter().sum::<usize>() + COLUMNS.len() + 1, width);
        }
    }
}
