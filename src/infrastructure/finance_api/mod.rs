pub mod client;
pub mod types;

pub use client::FinanceApiClient;
pub use types::{ListBudgetsRequest, ListBudgetsResponse, PeriodParam};
