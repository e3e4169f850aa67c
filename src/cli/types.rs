//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::models::{BudgetQuery, QueryError};

#[derive(Parser, Debug)]
#[command(name = "budget-dash")]
#[command(about = "Planned vs realized budget dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Config file to load instead of budget-dash.yaml
    #[arg(short, long, global = true, env = "BUDGET_DASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch planned vs realized budget lines for one month
    Fetch(FetchArgs),

    /// List the configured locality/service pairs
    Sites,

    /// Report which credential sections resolve from the environment
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FetchArgs {
    /// Locality (e.g. pinheirinho)
    #[arg(short, long)]
    pub locality: String,

    /// Service (e.g. cartao)
    #[arg(short, long)]
    pub service: String,

    /// Year, defaults to the current year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Month (1-12), defaults to the current month
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Maximum API calls, overrides retry.max_attempts
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub attempts: Option<u32>,

    /// Accept a locality/service pair missing from the configured sites
    #[arg(long)]
    pub any_site: bool,
}

impl FetchArgs {
    /// Build the query, filling year and month from `today` when omitted
    ///
    /// Years run from 2018 up to the year of `today`.
    pub fn to_query(&self, today: chrono::NaiveDate) -> Result<BudgetQuery, QueryError> {
        use chrono::Datelike;

        let year = self.year.unwrap_or_else(|| today.year());
        if year > today.year() {
            return Err(QueryError::FutureYear {
                year,
                current: today.year(),
            });
        }

        BudgetQuery::new(
            self.locality.as_str(),
            self.service.as_str(),
            year,
            self.month.unwrap_or_else(|| today.month()),
        )
    }
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CheckArgs {
    /// Only check this locality (with --service)
    #[arg(short, long, requires = "service")]
    pub locality: Option<String>,

    /// Only check this service (with --locality)
    #[arg(short, long, requires = "locality")]
    pub service: Option<String>,
}
