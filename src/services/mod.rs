//! Application services built on the domain ports.

pub mod report_fetcher;

pub use report_fetcher::{ReportFetcher, DEFAULT_MAX_ATTEMPTS};
