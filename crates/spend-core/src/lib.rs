//! Domain types shared by the spend tracker crates.
//!
//! Expenses and their categories, calendar-month keys, timestamp resolution,
//! currency formatting, CLI settings and the common error type.

pub mod error;
pub mod formatting;
pub mod models;
pub mod month;
pub mod settings;
pub mod time_utils;

pub use error::{Result, TrackerError};
pub use models::{Category, Expense, ExpenseRecord};
pub use month::MonthKey;
