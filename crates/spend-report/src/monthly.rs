//! Single-month "money snapshot" report.

use tracing::debug;

use spend_core::formatting::{CurrencyFormatter, SymbolFormatter};
use spend_core::models::Expense;
use spend_core::month::MonthKey;
use spend_data::aggregator::{ExpenseAggregator, MonthlySummary};

use crate::messages::{empty_month_message, SpendingLevel};

/// Render the report for `month` using the default symbol formatter.
pub fn generate_monthly_report(expenses: &[Expense], month: MonthKey, currency_code: &str) -> String {
    let summary = ExpenseAggregator::summarize_month(expenses, month);
    render_monthly_report(&summary, currency_code, &SymbolFormatter)
}

/// Render an already computed summary.
///
/// A summary with no transactions renders as the empty-month message.
pub fn render_monthly_report<F: CurrencyFormatter + ?Sized>(
    summary: &MonthlySummary,
    currency_code: &str,
    formatter: &F,
) -> String {
    let month_label = summary.month.label();
    if summary.transaction_count == 0 {
        debug!("No expenses in {}, rendering empty-month message", summary.month);
        return empty_month_message(&month_label);
    }

    let money = |amount: f64| formatter.format(amount, currency_code);
    let top_percentage = summary.top_category_percentage();
    let top_fraction = if summary.total > 0.0 {
        summary.top_category.amount / summary.total
    } else {
        0.0
    };
    let level = SpendingLevel::classify(top_fraction);
    debug!(
        "{}: top category {} at {:.1}% -> {:?}",
        summary.month, summary.top_category.category, top_percentage, level
    );

    let header = format!("📊 **{} Money Snapshot**", month_label);
    let overview = format!(
        "You spent a total of **{}** across {} {}. That's an average of {} per day.",
        money(summary.total),
        summary.transaction_count,
        if summary.transaction_count == 1 { "transaction" } else { "transactions" },
        money(summary.daily_average),
    );
    let top = format!(
        "🎯 **Where It Went:**\nYour biggest spending category was **{}** at **{}** ({:.1}% of your total). {}",
        summary.top_category.category,
        money(summary.top_category.amount),
        top_percentage,
        level.message(),
    );

    let mut breakdown = String::from("📈 **Category Breakdown:**");
    for stats in &summary.category_percentages {
        breakdown.push_str(&format!(
            "\n• {}: {} ({:.1}%)",
            stats.category,
            money(stats.amount),
            stats.percentage
        ));
    }

    [header, overview, top, breakdown].join("\n\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{
        BALANCED_SPENDING_MESSAGE, HIGH_SPENDING_MESSAGE, LOW_SPENDING_MESSAGE,
        MEDIUM_SPENDING_MESSAGE,
    };
    use chrono::NaiveDate;
    use spend_core::models::Category;

    fn make_expense(id: &str, date: &str, amount: f64, category: Category) -> Expense {
        Expense::new(
            id,
            amount,
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            category,
            "test",
        )
    }

    fn october() -> MonthKey {
        "2023-10".parse().unwrap()
    }

    /// Formatter that exposes the raw numbers, for checking what gets formatted.
    struct PlainFormatter;

    impl CurrencyFormatter for PlainFormatter {
        fn format(&self, amount: f64, currency_code: &str) -> String {
            format!("{:.2} {}", amount, currency_code)
        }
    }

    // ── Scenarios ─────────────────────────────────────────────────────────────

    #[test]
    fn test_high_spending_report() {
        let expenses = vec![
            make_expense("1", "2023-10-05", 100.0, Category::Food),
            make_expense("2", "2023-10-06", 20.0, Category::Transport),
        ];
        let report = generate_monthly_report(&expenses, october(), "USD");

        assert!(report.starts_with("📊 **October 2023 Money Snapshot**\n\n"));
        assert!(report.contains("You spent a total of **$120** across 2 transactions."));
        assert!(report.contains("That's an average of $3.87 per day."));
        assert!(report.contains(
            "Your biggest spending category was **Food** at **$100** (83.3% of your total)."
        ));
        assert!(report.contains(HIGH_SPENDING_MESSAGE));
        assert!(report.contains("• Food: $100 (83.3%)\n• Transport: $20 (16.7%)"));
    }

    #[test]
    fn test_empty_month_report() {
        let expenses = vec![make_expense("1", "2023-09-30", 50.0, Category::Food)];
        let report = generate_monthly_report(&expenses, october(), "USD");

        assert_eq!(report, empty_month_message("October 2023"));
        assert!(report.contains("October 2023"));
        assert!(!report.contains("Money Snapshot"));
    }

    #[test]
    fn test_report_is_idempotent() {
        let expenses = vec![
            make_expense("1", "2023-10-05", 40.0, Category::Food),
            make_expense("2", "2023-10-06", 35.0, Category::Bills),
            make_expense("3", "2023-10-07", 25.0, Category::Gifts),
        ];
        let first = generate_monthly_report(&expenses, october(), "EGP");
        let second = generate_monthly_report(&expenses, october(), "EGP");
        assert_eq!(first, second);
    }

    // ── Spending level branches ───────────────────────────────────────────────

    #[test]
    fn test_medium_low_and_balanced_branches() {
        // Top share 45%.
        let medium = vec![
            make_expense("1", "2023-10-01", 45.0, Category::Food),
            make_expense("2", "2023-10-01", 30.0, Category::Bills),
            make_expense("3", "2023-10-01", 25.0, Category::Gifts),
        ];
        assert!(generate_monthly_report(&medium, october(), "USD").contains(MEDIUM_SPENDING_MESSAGE));

        // Top share 35%.
        let low = vec![
            make_expense("1", "2023-10-01", 35.0, Category::Food),
            make_expense("2", "2023-10-01", 33.0, Category::Bills),
            make_expense("3", "2023-10-01", 32.0, Category::Gifts),
        ];
        assert!(generate_monthly_report(&low, october(), "USD").contains(LOW_SPENDING_MESSAGE));

        // Top share 25%.
        let balanced = vec![
            make_expense("1", "2023-10-01", 25.0, Category::Food),
            make_expense("2", "2023-10-01", 25.0, Category::Bills),
            make_expense("3", "2023-10-01", 25.0, Category::Gifts),
            make_expense("4", "2023-10-01", 25.0, Category::Travel),
        ];
        let report = generate_monthly_report(&balanced, october(), "USD");
        assert!(report.contains(BALANCED_SPENDING_MESSAGE));
        // First-seen wins the tie.
        assert!(report.contains("was **Food** at **$25** (25.0% of your total)"));
    }

    #[test]
    fn test_exactly_half_is_medium_not_high() {
        let expenses = vec![
            make_expense("1", "2023-10-01", 50.0, Category::Food),
            make_expense("2", "2023-10-02", 30.0, Category::Bills),
            make_expense("3", "2023-10-03", 20.0, Category::Gifts),
        ];
        let report = generate_monthly_report(&expenses, october(), "USD");
        assert!(report.contains(MEDIUM_SPENDING_MESSAGE));
        assert!(!report.contains(HIGH_SPENDING_MESSAGE));
    }

    // ── Layout ────────────────────────────────────────────────────────────────

    #[test]
    fn test_breakdown_sorted_by_amount() {
        let expenses = vec![
            make_expense("1", "2023-10-01", 10.0, Category::Food),
            make_expense("2", "2023-10-02", 60.0, Category::Travel),
            make_expense("3", "2023-10-03", 30.0, Category::Bills),
        ];
        let report = generate_monthly_report(&expenses, october(), "USD");
        let breakdown: Vec<&str> = report.lines().filter(|l| l.starts_with("• ")).collect();
        assert_eq!(
            breakdown,
            vec!["• Travel: $60 (60.0%)", "• Bills: $30 (30.0%)", "• Food: $10 (10.0%)"]
        );
    }

    #[test]
    fn test_single_transaction_wording() {
        let expenses = vec![make_expense("1", "2023-10-01", 31.0, Category::Food)];
        let report = generate_monthly_report(&expenses, october(), "USD");
        assert!(report.contains("across 1 transaction. That's an average of $1 per day."));
    }

    #[test]
    fn test_render_uses_given_formatter() {
        let expenses = vec![make_expense("1", "2023-10-01", 62.0, Category::Food)];
        let summary = ExpenseAggregator::summarize_month(&expenses, october());
        let report = render_monthly_report(&summary, "XYZ", &PlainFormatter);

        assert!(report.contains("**62.00 XYZ**"));
        assert!(report.contains("average of 2.00 XYZ per day"));
        assert!(report.ends_with("• Food: 62.00 XYZ (100.0%)"));
    }

    #[test]
    fn test_report_with_known_currency_symbol() {
        let expenses = vec![make_expense("1", "2023-10-01", 1234.5, Category::Bills)];
        let report = generate_monthly_report(&expenses, october(), "EGP");
        assert!(report.contains("**E£1,234.5**"));
    }
}
