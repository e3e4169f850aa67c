pub mod budget;
pub mod config;
pub mod credentials;

pub use budget::{
    BudgetEntry, BudgetQuery, BudgetTable, FetchOutcome, Notice, NoticeLevel, QueryError,
    ReportedCategory,
};
pub use config::{ApiConfig, Config, LoggingConfig, RetryConfig, SiteConfig};
pub use credentials::{
    AppKeys, AzureSettings, CredentialError, EmailCredentials, ImapSettings, OpenAiSettings,
    PathSettings,
};
