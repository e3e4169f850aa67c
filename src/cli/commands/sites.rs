//! Implementation of the `budget-dash sites` command.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Config, SiteConfig};

#[derive(Debug, Serialize)]
pub struct SitesOutput {
    pub sites: Vec<SiteConfig>,
}

impl CommandOutput for SitesOutput {
    fn to_human(&self) -> String {
        if self.sites.is_empty() {
            return "No sites configured.".to_string();
        }
        TableFormatter::new().format_sites(&self.sites)
    }
}

pub fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let sites = SitesOutput {
        sites: config.sites.clone(),
    };
    output(&sites, json_mode);
    Ok(())
}
