//! Selected month versus previous month report.

use tracing::debug;

use spend_core::formatting::{format_signed, CurrencyFormatter, SymbolFormatter};
use spend_core::models::Expense;
use spend_core::month::MonthKey;
use spend_data::comparison::{compare_months, MonthComparison};

use crate::messages::{TransactionTrend, Verdict, NO_COMPARISON_DATA_MESSAGE};

/// Compare `selected` with the month before it, using the default symbol
/// formatter.
pub fn generate_month_comparison(
    expenses: &[Expense],
    selected: MonthKey,
    currency_code: &str,
) -> String {
    let comparison = compare_months(expenses, selected);
    render_month_comparison(&comparison, currency_code, &SymbolFormatter)
}

/// Render already computed comparison figures.
pub fn render_month_comparison<F: CurrencyFormatter + ?Sized>(
    comparison: &MonthComparison,
    currency_code: &str,
    formatter: &F,
) -> String {
    if comparison.is_empty() {
        debug!(
            "No spending in {} or {}",
            comparison.selected_month, comparison.previous_month
        );
        return NO_COMPARISON_DATA_MESSAGE.to_string();
    }

    let verdict = Verdict::classify(comparison.percent_change, comparison.difference);
    let trend = TransactionTrend::classify(
        comparison.selected_transactions,
        comparison.previous_transactions,
    );
    debug!("Comparison verdict {:?}, transactions {:?}", verdict, trend);

    let header = format!(
        "📊 **Month Comparison: {} vs {}**",
        comparison.selected_month.label(),
        comparison.previous_month.label()
    );
    let numbers = format!(
        "💰 **The Numbers:**\n• This month: {}\n• Last month: {}\n• Difference: {}",
        formatter.format(comparison.selected_total, currency_code),
        formatter.format(comparison.previous_total, currency_code),
        format_signed(formatter, comparison.difference, currency_code)
    );
    let verdict_text = format!("{} {}", verdict.emoji(), verdict_line(verdict, comparison));
    let transactions = format!(
        "🧾 **Transactions:**\n• This month: {} {}\n• Last month: {} {}",
        comparison.selected_transactions,
        expenses_noun(comparison.selected_transactions),
        comparison.previous_transactions,
        expenses_noun(comparison.previous_transactions)
    );

    [
        header,
        numbers,
        verdict_text,
        transactions,
        trend.message().to_string(),
    ]
    .join("\n\n")
}

fn verdict_line(verdict: Verdict, comparison: &MonthComparison) -> String {
    let magnitude = comparison.percent_change.abs();
    if verdict.is_increase() {
        format!(
            "You spent {:.1}% MORE than last month. {}",
            magnitude,
            verdict.message()
        )
    } else if verdict.is_decrease() {
        format!(
            "You spent {:.1}% LESS than last month. {}",
            magnitude,
            verdict.message()
        )
    } else {
        verdict.message().to_string()
    }
}

fn expenses_noun(count: usize) -> &'static str {
    if count == 1 {
        "expense"
    } else {
        "expenses"
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
