mod bootstrap;
mod table;

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;
use spend_core::error::TrackerError;
use spend_core::formatting::{CurrencyFormatter, SymbolFormatter};
use spend_core::models::Expense;
use spend_core::month::MonthKey;
use spend_core::settings::Settings;
use spend_core::time_utils::TimezoneHandler;
use spend_data::aggregator::ExpenseAggregator;
use spend_data::comparison::{biggest_increase, category_changes, compare_months};
use spend_data::reader::load_expenses;
use spend_report::messages::{TransactionTrend, Verdict};
use spend_report::{generate_month_comparison, generate_monthly_report};

use crate::table::{render_table, TableRowData, TableTotals};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Spend Tracker v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Currency: {}, Timezone: {}",
        settings.view,
        settings.currency,
        settings.timezone
    );

    settings.validate()?;
    let tz = TimezoneHandler::new(&settings.timezone);
    tracing::debug!("Resolving dates in {}", tz.timezone().name());
    let expenses = load_or_empty(&settings, &tz)?;
    let month = select_month(settings.month, &expenses, tz.today());

    if settings.delay_ms > 0 && matches!(settings.view.as_str(), "report" | "compare") {
        tracing::debug!("Pausing {} ms before the report", settings.delay_ms);
        tokio::time::sleep(Duration::from_millis(settings.delay_ms)).await;
    }

    let output = render_view(&settings, &expenses, month)?;
    println!("{}", output);

    Ok(())
}

/// Load expenses from the configured path.
///
/// A missing default file means nothing has been recorded yet; an explicit
/// `--data` path that does not exist is an error.
fn load_or_empty(settings: &Settings, tz: &TimezoneHandler) -> Result<Vec<Expense>> {
    let path = settings.data_path();
    match load_expenses(&path, tz) {
        Ok(expenses) => {
            tracing::info!("Loaded {} expenses from {}", expenses.len(), path.display());
            Ok(expenses)
        }
        Err(TrackerError::DataPathNotFound(_)) if settings.data.is_none() => {
            tracing::warn!("No expense file at {}; starting empty", path.display());
            Ok(Vec::new())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load expenses from {}", path.display())),
    }
}

/// The requested month, else the newest month with data, else `today`'s month.
fn select_month(requested: Option<MonthKey>, expenses: &[Expense], today: chrono::NaiveDate) -> MonthKey {
    requested
        .or_else(|| ExpenseAggregator::available_months(expenses).first().copied())
        .unwrap_or_else(|| MonthKey::from_date(today))
}

/// Produce the stdout text for the configured view.
fn render_view(settings: &Settings, expenses: &[Expense], month: MonthKey) -> Result<String> {
    let currency = settings.currency.as_str();

    let output = match settings.view.as_str() {
        "report" => {
            if settings.json {
                let summary = ExpenseAggregator::summarize_month(expenses, month);
                serde_json::to_string_pretty(&summary)?
            } else {
                generate_monthly_report(expenses, month, currency)
            }
        }

        "compare" => {
            if settings.json {
                let comparison = compare_months(expenses, month);
                let selected = ExpenseAggregator::group_by_category(
                    &ExpenseAggregator::filter_by_month(expenses, month),
                );
                let previous = ExpenseAggregator::group_by_category(
                    &ExpenseAggregator::filter_by_month(expenses, month.previous()),
                );
                let changes = category_changes(&selected, &previous);
                let value = json!({
                    "comparison": comparison,
                    "verdict": Verdict::classify(comparison.percent_change, comparison.difference),
                    "transactions": TransactionTrend::classify(
                        comparison.selected_transactions,
                        comparison.previous_transactions,
                    ),
                    "category_changes": changes,
                    "biggest_increase": biggest_increase(&changes),
                });
                serde_json::to_string_pretty(&value)?
            } else {
                generate_month_comparison(expenses, month, currency)
            }
        }

        "list" => {
            let (title, mut listed) = if settings.all {
                ("All months".to_string(), expenses.to_vec())
            } else {
                (month.label(), ExpenseAggregator::filter_by_month(expenses, month))
            };
            // Newest first; same-day expenses keep their loaded order.
            listed.sort_by(|a, b| b.date.cmp(&a.date));

            if settings.json {
                serde_json::to_string_pretty(&listed)?
            } else {
                let formatter = SymbolFormatter;
                let rows: Vec<TableRowData> = listed
                    .iter()
                    .map(|e| TableRowData::from_expense(e, currency, &formatter))
                    .collect();
                let totals = TableTotals {
                    count: listed.len(),
                    total: formatter.format(ExpenseAggregator::sum_amounts(&listed), currency),
                };
                format!("{}\n\n{}", title, render_table(&rows, &totals))
            }
        }

        "months" => {
            let months = ExpenseAggregator::available_months(expenses);
            if settings.json {
                let keys: Vec<String> = months.iter().map(MonthKey::to_string).collect();
                serde_json::to_string_pretty(&keys)?
            } else if months.is_empty() {
                "No expenses yet".to_string()
            } else {
                months
                    .iter()
                    .map(|m| format!("{} ({})", m.label(), m))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }

        unknown => anyhow::bail!("Unknown view: {}", unknown),
    };

    Ok(output)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
