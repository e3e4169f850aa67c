//! Port trait definitions (Hexagonal Architecture)
//!
//! - BudgetSource: the financial API the report fetcher talks to
//!
//! Keeping the fetcher behind this trait lets the retry and normalization
//! logic run against scripted sources in tests.

pub mod budget_source;

pub use budget_source::BudgetSource;
