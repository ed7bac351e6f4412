//! Plain-text expense table for the `list` view.
//!
//! Column widths are measured in terminal cells so emoji and non-ASCII
//! descriptions line up.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use spend_core::formatting::CurrencyFormatter;
use spend_core::models::Expense;

/// Descriptions wider than this are cut with an ellipsis.
const MAX_DESCRIPTION_WIDTH: usize = 40;

const HEADERS: [&str; 4] = ["Date", "Category", "Description", "Amount"];

/// One rendered row of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRowData {
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: String,
}

/// Footer figures for the table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableTotals {
    pub count: usize,
    pub total: String,
}

impl TableRowData {
    pub fn from_expense<F: CurrencyFormatter + ?Sized>(
        expense: &Expense,
        currency_code: &str,
        formatter: &F,
    ) -> Self {
        Self {
            date: expense.date.format("%Y-%m-%d").to_string(),
            category: expense.category.to_string(),
            description: truncate_to_width(&expense.description, MAX_DESCRIPTION_WIDTH),
            amount: formatter.format(expense.amount, currency_code),
        }
    }

    fn cells(&self) -> [&str; 4] {
        [&self.date, &self.category, &self.description, &self.amount]
    }
}

/// Render rows plus a totals line as aligned text.
pub fn render_table(rows: &[TableRowData], totals: &TableTotals) -> String {
    let totals_label = format!(
        "Total ({} {})",
        totals.count,
        if totals.count == 1 { "expense" } else { "expenses" }
    );

    let mut widths = HEADERS.map(|h| h.width());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.width());
        }
    }
    widths[0] = widths[0].max(totals_label.width());
    widths[3] = widths[3].max(totals.total.width());

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(format_line(&HEADERS, &widths));
    lines.push(separator(&widths));
    for row in rows {
        lines.push(format_line(&row.cells(), &widths));
    }
    lines.push(separator(&widths));
    lines.push(format_line(&[totals_label.as_str(), "", "", totals.total.as_str()], &widths));

    lines.join("\n")
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn format_line(cells: &[&str; 4], widths: &[usize; 4]) -> String {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        // Amount column is right-aligned.
        if i == 3 {
            line.push_str(&pad_left(cell, *width));
        } else {
            line.push_str(&pad_right(cell, *width));
        }
    }
    line.truncate(line.trim_end().len());
    line
}

fn separator(widths: &[usize; 4]) -> String {
    let total = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    "─".repeat(total)
}

fn pad_right(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn pad_left(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", " ".repeat(padding), s)
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
