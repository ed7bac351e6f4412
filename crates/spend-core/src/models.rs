use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TrackerError};
use crate::time_utils::TimezoneHandler;

// ── Category ──────────────────────────────────────────────────────────────────

/// The closed set of expense categories.
///
/// Serialized by display label, so `SelfCare` round-trips as `"Self Care"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Health,
    Wearables,
    Travel,
    Subscriptions,
    #[serde(rename = "Self Care")]
    SelfCare,
    Gifts,
    Medical,
    Education,
    Installments,
    #[serde(rename = "Debt Payment")]
    DebtPayment,
    Withdrawals,
    Bills,
    Donations,
    #[serde(rename = "Bank Fees")]
    BankFees,
    Fees,
    Investments,
    Savings,
    Loans,
    Taxes,
    Insurance,
    Transfers,
    /// Catch-all, also used as the sentinel when a month has no data.
    Other,
}

impl Category {
    /// Every category, in the order they are offered to the user.
    pub const ALL: [Category; 26] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Health,
        Category::Wearables,
        Category::Travel,
        Category::Subscriptions,
        Category::SelfCare,
        Category::Gifts,
        Category::Medical,
        Category::Education,
        Category::Installments,
        Category::DebtPayment,
        Category::Withdrawals,
        Category::Bills,
        Category::Donations,
        Category::BankFees,
        Category::Fees,
        Category::Investments,
        Category::Savings,
        Category::Loans,
        Category::Taxes,
        Category::Insurance,
        Category::Transfers,
        Category::Other,
    ];

    /// Human-readable label, e.g. `"Debt Payment"`.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Wearables => "Wearables",
            Category::Travel => "Travel",
            Category::Subscriptions => "Subscriptions",
            Category::SelfCare => "Self Care",
            Category::Gifts => "Gifts",
            Category::Medical => "Medical",
            Category::Education => "Education",
            Category::Installments => "Installments",
            Category::DebtPayment => "Debt Payment",
            Category::Withdrawals => "Withdrawals",
            Category::Bills => "Bills",
            Category::Donations => "Donations",
            Category::BankFees => "Bank Fees",
            Category::Fees => "Fees",
            Category::Investments => "Investments",
            Category::Savings => "Savings",
            Category::Loans => "Loans",
            Category::Taxes => "Taxes",
            Category::Insurance => "Insurance",
            Category::Transfers => "Transfers",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = TrackerError;

    /// Case-insensitive lookup by display label.
    ///
    /// Returns [`TrackerError::UnknownCategory`] for unrecognised labels.
    fn from_str(value: &str) -> Result<Self> {
        let wanted = value.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TrackerError::UnknownCategory(value.to_string()))
    }
}

// ── Expense ───────────────────────────────────────────────────────────────────

/// Smallest amount accepted for a single expense.
pub const MIN_AMOUNT: f64 = 0.1;
/// Largest amount accepted for a single expense.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;
/// Maximum length of a description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// A single logged expense with its date already resolved to a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// Unique identifier.
    pub id: String,
    /// Positive, currency-agnostic magnitude.
    pub amount: f64,
    /// Calendar date the expense belongs to.
    pub date: NaiveDate,
    pub category: Category,
    /// Free-text description.
    pub description: String,
}

impl Expense {
    pub fn new(
        id: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            date,
            category,
            description: description.into(),
        }
    }
}

/// An expense as stored on disk, before its date and category are resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: String,
    pub amount: f64,
    /// ISO date (`2023-10-05`) or timestamp (`2023-10-05T10:00:00.000Z`).
    pub date: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl ExpenseRecord {
    /// Validate the record and resolve it into an [`Expense`].
    ///
    /// Timestamps are mapped to a calendar day in the handler's timezone.
    pub fn into_expense(self, tz: &TimezoneHandler) -> Result<Expense> {
        let invalid = |reason: &str| TrackerError::InvalidExpense {
            id: self.id.clone(),
            reason: reason.to_string(),
        };

        let description_len = self.description.trim().chars().count();
        if description_len == 0 {
            return Err(invalid("description is required"));
        }
        if description_len > MAX_DESCRIPTION_LEN {
            return Err(invalid("description must be less than 200 characters"));
        }
        if !self.amount.is_finite() || self.amount < MIN_AMOUNT {
            return Err(invalid("amount must be at least 0.1"));
        }
        if self.amount > MAX_AMOUNT {
            return Err(invalid("amount is too large"));
        }

        let category: Category = self.category.parse()?;
        let date = tz
            .resolve_date(&self.date)
            .ok_or_else(|| TrackerError::TimestampParse(self.date.clone()))?;

        Ok(Expense {
            id: self.id,
            amount: self.amount,
            date,
            category,
            description: self.description,
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
