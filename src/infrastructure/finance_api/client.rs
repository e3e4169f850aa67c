use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::types::{ListBudgetsRequest, ListBudgetsResponse, PeriodParam};
use crate::domain::errors::FinanceApiError;
use crate::domain::models::{ApiConfig, AppKeys, BudgetQuery, ReportedCategory};
use crate::domain::ports::BudgetSource;
use crate::infrastructure::logging::scrub_secrets;

/// HTTP client for the vendor's `financas/caixa` endpoint
///
/// One call to [`BudgetSource::list_budgets`] is one POST; retrying on the
/// busy fault is left to the caller.
pub struct FinanceApiClient {
    http_client: ReqwestClient,
    endpoint: String,
    call: String,
}

impl FinanceApiClient {
    /// Build a client from the `api` config section
    ///
    /// No request timeout is set unless `timeout_secs` is configured.
    pub fn new(config: &ApiConfig) -> Result<Self, FinanceApiError> {
        let mut builder = ReqwestClient::builder()
            .pool_max_idle_per_host(2)
            .tcp_nodelay(true);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| FinanceApiError::Setup(e.to_string()))?;

        debug!(
            endpoint = %config.endpoint,
            call = %config.call,
            timeout_secs = ?config.timeout_secs,
            "financial API client initialized"
        );

        Ok(Self {
            http_client,
            endpoint: config.endpoint.clone(),
            call: config.call.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Map a 200 body onto listing, busy fault or other fault
    fn interpret(body: &[u8]) -> Result<Vec<ReportedCategory>, FinanceApiError> {
        let response: ListBudgetsResponse =
            serde_json::from_slice(body).map_err(|e| FinanceApiError::Decode(e.to_string()))?;

        if let Some(fault_code) = response.faultcode.as_deref() {
            let fault_string = response.faultstring.as_deref().unwrap_or_default();
            if let Some(busy) = FinanceApiError::busy_from_fault(fault_code, fault_string) {
                return Err(busy);
            }
            warn!(
                fault_code = %fault_code,
                fault_string = %scrub_secrets(fault_string),
                "financial API reported a fault, treating as no data"
            );
        }

        Ok(response.entries.unwrap_or_default())
    }
}

#[async_trait]
impl BudgetSource for FinanceApiClient {
    #[instrument(skip(self, keys, query), fields(locality = %query.locality, service = %query.service, year = query.year, month = query.month))]
    async fn list_budgets(
        &self,
        keys: &AppKeys,
        query: &BudgetQuery,
    ) -> Result<Vec<ReportedCategory>, FinanceApiError> {
        let request = ListBudgetsRequest {
            call: &self.call,
            param: [PeriodParam {
                year: query.year,
                month: query.month,
            }],
            app_key: keys.app_key(),
            app_secret: keys.app_secret(),
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| FinanceApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            let body = scrub_secrets(&body);
            warn!(status = status.as_u16(), body = %body, "financial API returned an error status");
            return Err(FinanceApiError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FinanceApiError::Transport(e.to_string()))?;
        let entries = Self::interpret(&body)?;
        debug!(entries = entries.len(), "financial API answered");
        Ok(entries)
    }
}
