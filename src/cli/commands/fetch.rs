//! Implementation of the `budget-dash fetch` command.

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::cli::output::{
    create_spinner, output, print_notices, supports_color, BarChart, CommandOutput,
    ProgressBarExt, TableFormatter,
};
use crate::cli::types::FetchArgs;
use crate::domain::models::{BudgetQuery, BudgetTable, Config, FetchOutcome, Notice};
use crate::infrastructure::credentials::CredentialResolver;
use crate::infrastructure::finance_api::FinanceApiClient;
use crate::infrastructure::retry::RetryPolicy;
use crate::services::ReportFetcher;

/// Raised when the API answered with no rows
pub const NO_DATA_WARNING: &str = "no data returned for the selected filter";

/// Raised when rows came back but none has a positive value
pub const NO_CHART_WARNING: &str = "no positive values to chart";

/// Rows, notices and the query they answer
#[derive(Debug, Serialize)]
pub struct FetchReport {
    pub query: BudgetQuery,
    pub rows: BudgetTable,
    pub notices: Vec<Notice>,
    pub attempts: u32,
    #[serde(skip)]
    use_colors: bool,
}

impl FetchReport {
    /// Wrap a fetch outcome, adding the dashboard-level warnings
    pub fn new(query: BudgetQuery, outcome: FetchOutcome) -> Self {
        let FetchOutcome {
            rows,
            mut notices,
            attempts,
        } = outcome;

        if rows.is_empty() {
            notices.push(Notice::warning(NO_DATA_WARNING));
        } else if rows.chartable().is_empty() {
            notices.push(Notice::warning(NO_CHART_WARNING));
        }

        Self {
            query,
            rows,
            notices,
            attempts,
            use_colors: supports_color(),
        }
    }

    #[must_use]
    pub const fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }
}

impl CommandOutput for FetchReport {
    fn to_human(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        let mut sections =
            vec![TableFormatter::with_config(self.use_colors, None).format_budget(&self.rows)];

        let chartable = self.rows.chartable();
        if !chartable.is_empty() {
            sections.push(BarChart::new(self.use_colors).render(&self.query, &chartable));
        }

        sections.join("\n\n")
    }
}

pub async fn execute(args: FetchArgs, config: &Config, json_mode: bool) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let query = args.to_query(today).context("Invalid fetch filters")?;

    if !args.any_site && !config.knows_site(&query.locality, &query.service) {
        bail!(
            "{query} is not a configured site. Run `budget-dash sites` to list them or pass --any-site"
        );
    }

    let client = FinanceApiClient::new(&config.api).context("Failed to build financial API client")?;
    let fetcher = ReportFetcher::new(client, RetryPolicy::from_config(&config.retry));
    let credentials = CredentialResolver::from_env();
    let max_attempts = args.attempts.unwrap_or(config.retry.max_attempts);

    let show_spinner = !json_mode && console::Term::stderr().is_term();
    let spinner = create_spinner(
        format!("Fetching {query} for {}/{}", query.month_label(), query.year),
        show_spinner,
    );

    let outcome = match fetcher.fetch(&credentials, &query, max_attempts).await {
        Ok(outcome) => outcome,
        Err(err) => {
            spinner.finish_error("fetch failed");
            return Err(err).context(format!("Failed to fetch budget report for {query}"));
        }
    };

    if outcome.has_errors() {
        spinner.finish_error(format!("{query}: finished with errors"));
    } else if outcome.rows.is_empty() {
        spinner.finish_warning(format!("{query}: no rows"));
    } else {
        spinner.finish_success(format!("{query}: {} rows", outcome.rows.len()));
    }

    let report = FetchReport::new(query, outcome);
    if !json_mode {
        print_notices(&report.notices);
    }
    output(&report, json_mode);

    Ok(())
}
