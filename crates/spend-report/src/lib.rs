//! Narrative reports over expense data.
//!
//! Turns monthly summaries and month-over-month comparisons into plain text
//! with `**bold**` markers and emoji kept verbatim, for display in a
//! monospace or pre-wrapped area.

pub mod comparison;
pub mod messages;
pub mod monthly;

pub use comparison::{generate_month_comparison, render_month_comparison};
pub use monthly::{generate_monthly_report, render_monthly_report};
