//! Implementation of the `budget-dash check` command.
//!
//! Reports which credential sections resolve without printing any value.

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::cli::types::CheckArgs;
use crate::domain::models::{Config, SiteConfig};
use crate::infrastructure::credentials::CredentialResolver;

/// Resolution state of one credential section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialStatus {
    pub section: String,
    pub resolved: bool,
    pub variables: Vec<String>,
}

impl CredentialStatus {
    fn new(section: impl Into<String>, resolved: bool, variables: &[&str]) -> Self {
        Self {
            section: section.into(),
            resolved,
            variables: variables.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub credentials: Vec<CredentialStatus>,
}

impl CheckOutput {
    pub fn all_resolved(&self) -> bool {
        self.credentials.iter().all(|status| status.resolved)
    }
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let table = TableFormatter::new().format_credentials(&self.credentials);
        let missing = self
            .credentials
            .iter()
            .filter(|status| !status.resolved)
            .count();

        if missing == 0 {
            format!("{table}\nAll credential sections resolved.")
        } else {
            format!("{table}\n{missing} credential section(s) missing or invalid.")
        }
    }
}

/// Check the per-site sections for `sites`, then the global ones
pub fn credential_report(resolver: &CredentialResolver, sites: &[SiteConfig]) -> Vec<CredentialStatus> {
    let mut statuses = Vec::with_capacity(sites.len() * 2 + 4);

    for site in sites {
        let (locality, service) = (site.locality.as_str(), site.service.as_str());
        let scoped = |field: &str| CredentialResolver::scoped_var(locality, service, field);

        statuses.push(CredentialStatus::new(
            format!("app keys ({locality}/{service})"),
            resolver.app_keys(locality, service).is_some(),
            &[scoped("APP_KEY").as_str(), scoped("APP_SECRET").as_str()],
        ));
        statuses.push(CredentialStatus::new(
            format!("email ({locality}/{service})"),
            resolver.email_credentials(locality, service).is_some(),
            &[scoped("EMAIL").as_str(), scoped("SENHA").as_str()],
        ));
    }

    statuses.push(CredentialStatus::new(
        "imap",
        resolver.imap().is_some(),
        &["SERVIDOR", "PORTA"],
    ));
    statuses.push(CredentialStatus::new(
        "azure",
        resolver.azure().is_some(),
        &["KEY1", "KEY2", "REGIAO", "ENDPOINT"],
    ));
    statuses.push(CredentialStatus::new(
        "openai",
        resolver.openai().is_some(),
        &[
            "ENDPOINT_OPENAI",
            "MODEL_NAME",
            "DEPLOYMENT",
            "SUBSCRIPTION_KEY",
            "API_VERSION",
        ],
    ));
    statuses.push(CredentialStatus::new(
        "paths",
        resolver.paths().is_some(),
        &["PATH_BOLETO"],
    ));

    statuses
}

pub fn execute(args: CheckArgs, config: &Config, json_mode: bool) -> Result<()> {
    let sites = match (args.locality, args.service) {
        (Some(locality), Some(service)) => vec![SiteConfig { locality, service }],
        _ => config.sites.clone(),
    };

    let resolver = CredentialResolver::from_env();
    let report = CheckOutput {
        credentials: credential_report(&resolver, &sites),
    };
    tracing::info!(
        sections = report.credentials.len(),
        all_resolved = report.all_resolved(),
        "credential check finished"
    );

    output(&report, json_mode);
    Ok(())
}
