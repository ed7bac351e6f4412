//! Narrative text used by the reports, keyed by branch.
//!
//! Each branch is an enum with a `classify` constructor holding the threshold
//! rules and a `message()` accessor holding the wording, so branch selection
//! can be tested without matching on exact text.

use serde::Serialize;

// ── Thresholds ────────────────────────────────────────────────────────────────

/// Top-category fraction above which spending is called out as high.
pub const HIGH_SPENDING_THRESHOLD: f64 = 0.5;
/// Top-category fraction above which spending is called out as medium.
pub const MEDIUM_SPENDING_THRESHOLD: f64 = 0.4;
/// Top-category fraction above which spending is called out as low.
pub const LOW_SPENDING_THRESHOLD: f64 = 0.3;

/// Absolute percent change below which two months count as the same.
pub const SAME_SPENDING_PERCENT: f64 = 5.0;
/// Percent change above which a move is the strongest verdict.
pub const MAJOR_CHANGE_PERCENT: f64 = 30.0;
/// Percent change above which a move is notable.
pub const NOTABLE_CHANGE_PERCENT: f64 = 15.0;

// ── Fixed messages ────────────────────────────────────────────────────────────

pub const HIGH_SPENDING_MESSAGE: &str =
    "Whoa! That's more than half your spending. Time to re-evaluate your priorities! 😅";
pub const MEDIUM_SPENDING_MESSAGE: &str =
    "Whoa! That's nearly half your spending. Might be worth keeping an eye on! 👀";
pub const LOW_SPENDING_MESSAGE: &str = "That's a significant chunk, but nothing too wild. 🎯";
pub const BALANCED_SPENDING_MESSAGE: &str =
    "Nice balance! You're spreading things out pretty well. ✨";

pub const NO_COMPARISON_DATA_MESSAGE: &str =
    "No data for these months. Add some expenses first! 📭";

/// Shown instead of a report when the month has no expenses.
pub fn empty_month_message(month_label: &str) -> String {
    format!(
        "You didn't record any expenses for {}. Either you're living like a hermit or you forgot to track! 🏝️",
        month_label
    )
}

// ── SpendingLevel ─────────────────────────────────────────────────────────────

/// How dominant the biggest category is within a month's spending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingLevel {
    High,
    Medium,
    Low,
    Balanced,
}

impl SpendingLevel {
    /// Classify the top category's share of the total, as a fraction (0 to 1).
    ///
    /// Thresholds are strict and checked from the highest down.
    pub fn classify(fraction: f64) -> Self {
        if fraction > HIGH_SPENDING_THRESHOLD {
            SpendingLevel::High
        } else if fraction > MEDIUM_SPENDING_THRESHOLD {
            SpendingLevel::Medium
        } else if fraction > LOW_SPENDING_THRESHOLD {
            SpendingLevel::Low
        } else {
            SpendingLevel::Balanced
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SpendingLevel::High => HIGH_SPENDING_MESSAGE,
            SpendingLevel::Medium => MEDIUM_SPENDING_MESSAGE,
            SpendingLevel::Low => LOW_SPENDING_MESSAGE,
            SpendingLevel::Balanced => BALANCED_SPENDING_MESSAGE,
        }
    }
}

// ── Verdict ───────────────────────────────────────────────────────────────────

/// Month-over-month spending verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Same,
    BigSpender,
    NotableBump,
    ModestIncrease,
    MajorCutback,
    NiceSavings,
    SmallSavings,
}

impl Verdict {
    /// Pick the verdict for a percent change and signed difference.
    ///
    /// The "same" band is checked before the sign, so a small drop never
    /// lands in a savings branch.
    pub fn classify(percent_change: f64, difference: f64) -> Self {
        let magnitude = percent_change.abs();

        if magnitude < SAME_SPENDING_PERCENT {
            Verdict::Same
        } else if difference > 0.0 {
            if percent_change > MAJOR_CHANGE_PERCENT {
                Verdict::BigSpender
            } else if percent_change > NOTABLE_CHANGE_PERCENT {
                Verdict::NotableBump
            } else {
                Verdict::ModestIncrease
            }
        } else if magnitude > MAJOR_CHANGE_PERCENT {
            Verdict::MajorCutback
        } else if magnitude > NOTABLE_CHANGE_PERCENT {
            Verdict::NiceSavings
        } else {
            Verdict::SmallSavings
        }
    }

    pub fn is_increase(&self) -> bool {
        matches!(
            self,
            Verdict::BigSpender | Verdict::NotableBump | Verdict::ModestIncrease
        )
    }

    pub fn is_decrease(&self) -> bool {
        matches!(
            self,
            Verdict::MajorCutback | Verdict::NiceSavings | Verdict::SmallSavings
        )
    }

    pub fn emoji(&self) -> &'static str {
        if self.is_increase() {
            "📈"
        } else if self.is_decrease() {
            "📉"
        } else {
            "⚖️"
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Same => "Pretty much the same as last month! Consistency is key. 👌",
            Verdict::BigSpender => "Whoa there, big spender! Did you buy a small island? 🏝️",
            Verdict::NotableBump => "That's a notable bump. Worth checking where the extra went. 🔍",
            Verdict::ModestIncrease => "A modest increase, nothing to lose sleep over. 🙂",
            Verdict::MajorCutback => "Are you living off ramen now? Impressive cutback! 🍜",
            Verdict::NiceSavings => "Nice savings! Your wallet thanks you. 💪",
            Verdict::SmallSavings => "A little lighter than last month. Every bit counts! 🪙",
        }
    }
}

// ── TransactionTrend ──────────────────────────────────────────────────────────

/// Direction of the transaction count between two months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionTrend {
    More,
    Fewer,
    Same,
}

impl TransactionTrend {
    pub fn classify(selected: usize, previous: usize) -> Self {
        use std::cmp::Ordering;
        match selected.cmp(&previous) {
            Ordering::Greater => TransactionTrend::More,
            Ordering::Less => TransactionTrend::Fewer,
            Ordering::Equal => TransactionTrend::Same,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            TransactionTrend::More => {
                "More transactions this month. Lots of little purchases adding up? 🛒"
            }
            TransactionTrend::Fewer => {
                "Fewer transactions this month. Fewer trips to the register! 🧘"
            }
            TransactionTrend::Same => "Same number of transactions as last month. Steady! 📋",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
