//! Data layer for the spend tracker.
//!
//! Loads expense records from JSON files, groups them by calendar month and
//! category, and derives the month-over-month comparison figures used by the
//! report renderers.

pub mod aggregator;
pub mod comparison;
pub mod reader;

pub use spend_core as core;
