//! budget-dash - planned vs realized budget dashboard
//!
//! Fetches one month of budget lines for a locality/service pair from the
//! Omie financial API, retrying while the account reports another request in
//! progress, and renders them as a table plus a horizontal grouped bar chart
//! in the terminal.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): queries, budget rows, credentials, config
//!   models, the `BudgetSource` port and its error type
//! - **Service Layer** (`services`): the report fetcher
//! - **Infrastructure Layer** (`infrastructure`): HTTP client, config
//!   loading, credential resolution, retry policy, logging
//! - **CLI Layer** (`cli`): commands and terminal output
//!
//! # Example
//!
//! ```no_run
//! use budget_dash::domain::models::{BudgetQuery, Config};
//! use budget_dash::infrastructure::credentials::CredentialResolver;
//! use budget_dash::infrastructure::finance_api::FinanceApiClient;
//! use budget_dash::infrastructure::retry::RetryPolicy;
//! use budget_dash::services::ReportFetcher;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::default();
//! let fetcher = ReportFetcher::new(
//!     FinanceApiClient::new(&config.api)?,
//!     RetryPolicy::from_config(&config.retry),
//! );
//! let query = BudgetQuery::new("pinheirinho", "cartao", 2024, 5)?;
//! let outcome = fetcher
//!     .fetch(&CredentialResolver::from_env(), &query, 3)
//!     .await?;
//! println!("{} rows", outcome.rows.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    BudgetEntry, BudgetQuery, BudgetTable, Config, FetchOutcome, Notice, NoticeLevel,
};
pub use domain::ports::BudgetSource;
pub use domain::FinanceApiError;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::credentials::CredentialResolver;
pub use infrastructure::finance_api::FinanceApiClient;
pub use infrastructure::retry::{Backoff, RetryError, RetryPolicy};
pub use services::ReportFetcher;
