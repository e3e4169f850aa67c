use async_trait::async_trait;

use crate::domain::errors::FinanceApiError;
use crate::domain::models::{AppKeys, BudgetQuery, ReportedCategory};

/// Source of monthly budget lines for a locality/service pair
///
/// Implementations issue exactly one request per call; retrying is the
/// caller's concern. An `Ok` with an empty vector means the API answered
/// with no lines for the month.
#[async_trait]
pub trait BudgetSource: Send + Sync {
    /// List the budget lines for `query`, authenticating with `keys`
    async fn list_budgets(
        &self,
        keys: &AppKeys,
        query: &BudgetQuery,
    ) -> Result<Vec<ReportedCategory>, FinanceApiError>;
}
