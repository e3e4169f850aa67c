//! Budget report fetching.
//!
//! Resolves the app keys for the queried locality/service, asks the
//! [`BudgetSource`] for the month's budget lines under a [`RetryPolicy`] that
//! only retries the vendor busy fault, and normalizes the answer into a
//! [`BudgetTable`].
//!
//! Failures the person running the dashboard can act on (missing
//! credentials, non-200 statuses, an account stuck busy) come back as
//! notices next to an empty table. Transport and decoding failures are
//! returned as `Err`.

use tracing::{error, info, warn};

use crate::domain::errors::FinanceApiError;
use crate::domain::models::{BudgetQuery, BudgetTable, FetchOutcome, Notice};
use crate::domain::ports::BudgetSource;
use crate::infrastructure::credentials::CredentialResolver;
use crate::infrastructure::retry::{RetryError, RetryPolicy};

/// Attempts made when the caller does not choose
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fetches one month of budget lines for a locality/service pair
pub struct ReportFetcher<S> {
    source: S,
    retry: RetryPolicy,
}

impl<S: BudgetSource> ReportFetcher<S> {
    pub const fn new(source: S, retry: RetryPolicy) -> Self {
        Self { source, retry }
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetch the budget table for `query`, making at most `max_attempts`
    /// calls
    ///
    /// Every attempt, the first included, waits for the policy's backoff
    /// before calling the API.
    pub async fn fetch(
        &self,
        credentials: &CredentialResolver,
        query: &BudgetQuery,
        max_attempts: u32,
    ) -> Result<FetchOutcome, FinanceApiError> {
        let Some(keys) = credentials.app_keys(&query.locality, &query.service) else {
            error!(locality = %query.locality, service = %query.service, "no app keys for query");
            return Ok(FetchOutcome {
                notices: vec![Notice::error(format!("Credentials not found for {query}"))],
                ..FetchOutcome::default()
            });
        };

        let policy = self.retry.clone().with_max_attempts(max_attempts);
        let mut notices = Vec::new();
        let mut calls = 0;

        let result = policy
            .execute_observed(
                |attempt| {
                    calls = attempt;
                    self.source.list_budgets(&keys, query)
                },
                FinanceApiError::is_retryable,
                |attempt, err| {
                    warn!(attempt, error = %err, "financial API busy");
                    notices.push(Notice::warning(format!(
                        "Attempt {attempt}: another request in progress for {query}. Waiting..."
                    )));
                },
            )
            .await;

        let rows = match result {
            Ok(reported) if reported.is_empty() => {
                info!(attempts = calls, "no budget lines for query");
                BudgetTable::empty()
            }
            Ok(reported) => {
                let table = BudgetTable::from_reported(reported, query);
                info!(attempts = calls, rows = table.len(), "budget lines fetched");
                table
            }
            Err(RetryError::Exhausted { attempts, .. }) => {
                error!(attempts, "attempt limit exceeded");
                notices.push(Notice::error(format!(
                    "Error: attempt limit exceeded for {query}"
                )));
                BudgetTable::empty()
            }
            Err(RetryError::Permanent { error, .. }) if !error.is_reportable() => return Err(error),
            Err(RetryError::Permanent {
                error: FinanceApiError::HttpStatus { status, body },
                ..
            }) => {
                error!(status, "financial API request failed");
                notices.push(Notice::error(format!("Error {status} - {body} for {query}")));
                BudgetTable::empty()
            }
            Err(RetryError::Permanent { error, .. }) => {
                error!(error = %error, "financial API request failed");
                notices.push(Notice::error(format!("Error: {error} for {query}")));
                BudgetTable::empty()
            }
        };

        Ok(FetchOutcome {
            rows,
            notices,
            attempts: calls,
        })
    }
}
