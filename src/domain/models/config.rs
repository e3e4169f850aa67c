use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Vendor endpoint serving the `ListarOrcamentos` call
pub const DEFAULT_ENDPOINT: &str = "https://app.omie.com.br/api/v1/financas/caixa/";

/// Main configuration structure for budget-dash
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Financial API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Locality/service pairs offered by the dashboard
    #[serde(default = "default_sites")]
    pub sites: Vec<SiteConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
            sites: default_sites(),
        }
    }
}

/// Financial API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApiConfig {
    /// Endpoint URL the report call is posted to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Vendor call name placed in the request payload
    #[serde(default = "default_call")]
    pub call: String,

    /// Request timeout in seconds; no timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_call() -> String {
    "ListarOrcamentos".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            call: default_call(),
            timeout_secs: None,
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Linear backoff step in milliseconds; attempt `n` waits `n * step`
    #[serde(default = "default_backoff_step_ms")]
    pub backoff_step_ms: u64,

    /// Whether the first attempt also waits one backoff step
    #[serde(default = "default_true")]
    pub delay_first_attempt: bool,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_backoff_step_ms() -> u64 {
    4_000
}

const fn default_true() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_step_ms: default_backoff_step_ms(),
            delay_first_attempt: default_true(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for the rolling log file; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// A locality/service pair the dashboard can query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SiteConfig {
    /// Business site or branch (e.g. `pinheirinho`)
    pub locality: String,

    /// Product or process (e.g. `cartao`)
    pub service: String,
}

impl SiteConfig {
    /// Case-insensitive match against a requested pair
    ///
    /// Folds with `to_uppercase`, the same folding used to build the
    /// credential variable names.
    pub fn matches(&self, locality: &str, service: &str) -> bool {
        self.locality.to_uppercase() == locality.to_uppercase()
            && self.service.to_uppercase() == service.to_uppercase()
    }
}

fn default_sites() -> Vec<SiteConfig> {
    vec![SiteConfig {
        locality: "pinheirinho".to_string(),
        service: "cartao".to_string(),
    }]
}

impl Config {
    /// Whether the pair is one of the configured sites
    pub fn knows_site(&self, locality: &str, service: &str) -> bool {
        self.sites.iter().any(|site| site.matches(locality, service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(locality: &str, service: &str) -> SiteConfig {
        SiteConfig {
            locality: locality.to_string(),
            service: service.to_string(),
        }
    }

    #[test]
    fn test_site_match_ignores_case() {
        let site = site("pinheirinho", "cartao");
        assert!(site.matches("PINHEIRINHO", "Cartao"));
        assert!(!site.matches("centro", "cartao"));
    }

    #[test]
    fn test_site_match_folds_like_credential_names() {
        let config = Config {
            sites: vec![site("São José", "cartão")],
            ..Config::default()
        };

        assert!(config.knows_site("SÃO JOSÉ", "CARTÃO"));
        assert!(config.knows_site("são josé", "Cartão"));
        assert_eq!(
            "São José".to_uppercase(),
            "são josé".to_uppercase(),
            "credential variable names fold the same way"
        );
    }
}
