//! Selected-month versus previous-month figures.

use serde::Serialize;
use tracing::debug;

use spend_core::models::{Category, Expense};
use spend_core::month::MonthKey;

use crate::aggregator::{CategoryTotals, ExpenseAggregator};

/// Totals for a month and the calendar month before it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthComparison {
    pub selected_month: MonthKey,
    pub previous_month: MonthKey,
    pub selected_total: f64,
    pub previous_total: f64,
    /// `selected_total - previous_total`.
    pub difference: f64,
    /// Change relative to the previous month, in percent. `0` when the
    /// previous month has no spending.
    pub percent_change: f64,
    pub selected_transactions: usize,
    pub previous_transactions: usize,
}

impl MonthComparison {
    /// Whether neither month has any spending at all.
    pub fn is_empty(&self) -> bool {
        self.selected_total == 0.0 && self.previous_total == 0.0
    }
}

/// How much one category moved between the two months.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryChange {
    pub category: Category,
    pub selected: f64,
    pub previous: f64,
    /// `selected - previous`.
    pub change: f64,
}

/// `difference / previous * 100`, or `0.0` when `previous` is zero.
pub fn percent_change(difference: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (difference / previous) * 100.0
    }
}

/// Compare `selected` against the month immediately before it.
pub fn compare_months(expenses: &[Expense], selected: MonthKey) -> MonthComparison {
    let previous = selected.previous();

    let selected_expenses = ExpenseAggregator::filter_by_month(expenses, selected);
    let previous_expenses = ExpenseAggregator::filter_by_month(expenses, previous);

    let selected_total = ExpenseAggregator::sum_amounts(&selected_expenses);
    let previous_total = ExpenseAggregator::sum_amounts(&previous_expenses);
    let difference = selected_total - previous_total;

    let comparison = MonthComparison {
        selected_month: selected,
        previous_month: previous,
        selected_total,
        previous_total,
        difference,
        percent_change: percent_change(difference, previous_total),
        selected_transactions: selected_expenses.len(),
        previous_transactions: previous_expenses.len(),
    };

    debug!(
        "Compared {} ({:.2}) with {} ({:.2}): {:+.1}%",
        selected, selected_total, previous, previous_total, comparison.percent_change
    );

    comparison
}

/// Per-category movement across two months.
///
/// Categories from the selected month come first in their original order,
/// followed by categories that only appear in the previous month.
pub fn category_changes(selected: &CategoryTotals, previous: &CategoryTotals) -> Vec<CategoryChange> {
    let mut changes: Vec<CategoryChange> = selected
        .iter()
        .map(|(category, amount)| {
            let before = previous.get(category).unwrap_or(0.0);
            CategoryChange {
                category,
                selected: amount,
                previous: before,
                change: amount - before,
            }
        })
        .collect();

    for (category, amount) in previous.iter() {
        if selected.get(category).is_none() {
            changes.push(CategoryChange {
                category,
                selected: 0.0,
                previous: amount,
                change: -amount,
            });
        }
    }

    changes
}

/// The category whose spending grew the most; `None` when nothing grew.
pub fn biggest_increase(changes: &[CategoryChange]) -> Option<CategoryChange> {
    changes
        .iter()
        .filter(|c| c.change > 0.0)
        .fold(None, |best: Option<CategoryChange>, c| match best {
            Some(b) if c.change <= b.change => Some(b),
            _ => Some(*c),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
