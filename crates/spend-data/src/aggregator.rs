//! Expense aggregation over calendar months.
//!
//! Everything here is a pure function of the expense slice it is given: no
//! caching, no hidden state, and no errors for empty input.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use tracing::debug;

use spend_core::models::{Category, Expense};
use spend_core::month::MonthKey;

// ── CategoryTotals ────────────────────────────────────────────────────────────

/// Summed amount per category, in the order categories were first seen.
///
/// Sparse: a category with no expenses has no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTotals {
    entries: Vec<(Category, f64)>,
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `category`, appending the category if unseen.
    pub fn add(&mut self, category: Category, amount: f64) {
        match self.entries.iter_mut().find(|(c, _)| *c == category) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((category, amount)),
        }
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all categories.
    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, amount)| amount).sum()
    }
}

impl FromIterator<(Category, f64)> for CategoryTotals {
    fn from_iter<I: IntoIterator<Item = (Category, f64)>>(iter: I) -> Self {
        let mut totals = CategoryTotals::new();
        for (category, amount) in iter {
            totals.add(category, amount);
        }
        totals
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, amount) in &self.entries {
            map.serialize_entry(category, amount)?;
        }
        map.end()
    }
}

// ── Summary types ─────────────────────────────────────────────────────────────

/// One category's share of a month's spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub amount: f64,
    /// Share of the total in percent (0 to 100).
    pub percentage: f64,
}

/// The category with the highest total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TopCategory {
    pub category: Category,
    pub amount: f64,
}

impl TopCategory {
    /// Returned when there is nothing to rank.
    pub const NONE: TopCategory = TopCategory {
        category: Category::Other,
        amount: 0.0,
    };
}

/// Statistics for one month of expenses. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub total: f64,
    pub category_totals: CategoryTotals,
    /// Sorted by amount, largest first.
    pub category_percentages: Vec<CategoryStats>,
    pub top_category: TopCategory,
    pub daily_average: f64,
    pub transaction_count: usize,
}

impl MonthlySummary {
    /// Percentage of the total taken by the top category, 0 when empty.
    pub fn top_category_percentage(&self) -> f64 {
        self.category_percentages
            .iter()
            .find(|s| s.category == self.top_category.category)
            .map(|s| s.percentage)
            .unwrap_or(0.0)
    }
}

// ── ExpenseAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that reduces expenses into monthly statistics.
pub struct ExpenseAggregator;

impl ExpenseAggregator {
    /// Expenses dated within `[month.start(), month.end()]`, in input order.
    pub fn filter_by_month(expenses: &[Expense], month: MonthKey) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|e| month.contains(e.date))
            .cloned()
            .collect()
    }

    /// Sum of all amounts; `0.0` for an empty slice.
    pub fn sum_amounts(expenses: &[Expense]) -> f64 {
        expenses.iter().map(|e| e.amount).sum()
    }

    /// Accumulate amounts per category (sparse, first-seen order).
    pub fn group_by_category(expenses: &[Expense]) -> CategoryTotals {
        expenses.iter().map(|e| (e.category, e.amount)).collect()
    }

    /// Each category's share of `total`, largest amount first.
    ///
    /// Every percentage is `0.0` when `total` is zero.
    pub fn percentages_of(totals: &CategoryTotals, total: f64) -> Vec<CategoryStats> {
        let mut stats: Vec<CategoryStats> = totals
            .iter()
            .map(|(category, amount)| CategoryStats {
                category,
                amount,
                percentage: if total == 0.0 {
                    0.0
                } else {
                    (amount / total) * 100.0
                },
            })
            .collect();

        // Stable: equal amounts keep first-seen order.
        stats.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        stats
    }

    /// The category with the largest total; the first one seen wins ties.
    ///
    /// Returns [`TopCategory::NONE`] (`Other`, 0) for empty totals.
    pub fn top_category(totals: &CategoryTotals) -> TopCategory {
        let mut top: Option<TopCategory> = None;
        for (category, amount) in totals.iter() {
            match top {
                Some(best) if amount <= best.amount => {}
                _ => top = Some(TopCategory { category, amount }),
            }
        }
        top.unwrap_or(TopCategory::NONE)
    }

    /// `total` spread evenly across every day of the calendar month.
    pub fn daily_average(total: f64, month: MonthKey) -> f64 {
        total / f64::from(month.days_in_month())
    }

    /// Build the summary for expenses that are already restricted to `month`.
    pub fn generate_report_insights_data(expenses: &[Expense], month: MonthKey) -> MonthlySummary {
        let total = Self::sum_amounts(expenses);
        let category_totals = Self::group_by_category(expenses);
        let top_category = Self::top_category(&category_totals);
        let category_percentages = Self::percentages_of(&category_totals, total);

        MonthlySummary {
            month,
            total,
            category_percentages,
            top_category,
            daily_average: Self::daily_average(total, month),
            transaction_count: expenses.len(),
            category_totals,
        }
    }

    /// Filter `expenses` to `month` and summarise them.
    pub fn summarize_month(expenses: &[Expense], month: MonthKey) -> MonthlySummary {
        let in_month = Self::filter_by_month(expenses, month);
        let summary = Self::generate_report_insights_data(&in_month, month);
        debug!(
            "Summarised {}: {} expenses, total {:.2}, top {}",
            month, summary.transaction_count, summary.total, summary.top_category.category
        );
        summary
    }

    /// Distinct months that have at least one expense, newest first.
    pub fn available_months(expenses: &[Expense]) -> Vec<MonthKey> {
        let months: BTreeSet<MonthKey> = expenses
            .iter()
            .map(|e| MonthKey::from_date(e.date))
            .collect();
        months.into_iter().rev().collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
