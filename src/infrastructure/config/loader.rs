use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project config file, merged over the defaults
pub const CONFIG_FILE: &str = "budget-dash.yaml";

/// Optional local overrides, merged over the project config
pub const LOCAL_CONFIG_FILE: &str = "budget-dash.local.yaml";

/// Prefix for environment overrides (`BUDGET_DASH_RETRY__MAX_ATTEMPTS=5`)
pub const ENV_PREFIX: &str = "BUDGET_DASH_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    #[error("API endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("Invalid API endpoint '{0}': must start with http:// or https://")]
    InvalidEndpoint(String),

    #[error("API call name cannot be empty")]
    EmptyCall,

    #[error("Invalid timeout_secs: 0. Leave unset to disable the timeout")]
    ZeroTimeout,

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Config file not found: {0}")]
    FileNotFound(std::path::PathBuf),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. budget-dash.yaml (project config)
    /// 3. budget-dash.local.yaml (local overrides, optional)
    /// 4. Environment variables (BUDGET_DASH_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(CONFIG_FILE))
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    ///
    /// Unlike the default lookup, a named file must exist.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        if !path.as_ref().is_file() {
            return Err(ConfigError::FileNotFound(path.as_ref().to_path_buf()).into());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(config.retry.max_attempts));
        }

        let endpoint = config.api.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::InvalidEndpoint(config.api.endpoint.clone()));
        }

        if config.api.call.trim().is_empty() {
            return Err(ConfigError::EmptyCall);
        }

        if config.api.timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        for site in &config.sites {
            if site.locality.trim().is_empty() || site.service.trim().is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "site '{}/{}' needs both a locality and a service",
                    site.locality, site.service
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{
        ApiConfig, LoggingConfig, RetryConfig, SiteConfig, DEFAULT_ENDPOINT,
    };

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.call, "ListarOrcamentos");
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.backoff_step_ms, 4_000);
        assert!(config.retry.delay_first_attempt);
        assert_eq!(config.sites.len(), 1);
        assert!(config.knows_site("PINHEIRINHO", "Cartao"));
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
api:
  timeout_secs: 30
retry:
  max_attempts: 5
  backoff_step_ms: 250
  delay_first_attempt: false
logging:
  level: debug
  format: json
sites:
  - locality: centro
    service: boleto
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.timeout_secs, Some(30));
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff_step_ms, 250);
        assert!(!config.retry.delay_first_attempt);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.rotation, "daily");
        assert_eq!(
            config.sites,
            vec![SiteConfig {
                locality: "centro".to_string(),
                service: "boleto".to_string(),
            }]
        );

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config {
            api: ApiConfig {
                endpoint: "http://localhost:8080/api/v1/financas/caixa/".to_string(),
                call: "ListarOrcamentos".to_string(),
                timeout_secs: Some(10),
            },
            retry: RetryConfig {
                max_attempts: 1,
                backoff_step_ms: 0,
                delay_first_attempt: false,
            },
            logging: LoggingConfig::default(),
            sites: vec![],
        };
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_attempts() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;

        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxAttempts(0)
        ));
    }

    #[test]
    fn test_validate_endpoint() {
        let mut config = Config::default();
        config.api.endpoint = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyEndpoint
        ));

        config.api.endpoint = "ftp://app.omie.com.br".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidEndpoint(_)
        ));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = Some(0);
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::ZeroTimeout
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_rotation() {
        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidRotation(_)
        ));
    }

    #[test]
    fn test_validate_blank_site() {
        let mut config = Config::default();
        config.sites.push(SiteConfig {
            locality: "centro".to_string(),
            service: String::new(),
        });
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::ValidationFailed(_)
        ));
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "retry:\n  max_attempts: 5\n  backoff_step_ms: 1000\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "retry:\n  max_attempts: 2\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.retry.max_attempts, 2, "Override should win");
        assert_eq!(
            config.retry.backoff_step_ms, 1000,
            "Base value should persist when not overridden"
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("typo.yaml");

        let err = ConfigLoader::load_from_file(&missing).unwrap_err();
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::FileNotFound(path)) => assert_eq!(path, &missing),
            other => panic!("Expected FileNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_env_override() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "retry:\n  max_attempts: 4").unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [
                ("BUDGET_DASH_RETRY__MAX_ATTEMPTS", Some("7")),
                ("BUDGET_DASH_LOGGING__LEVEL", Some("warn")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.retry.max_attempts, 7, "Env should win over file");
                assert_eq!(config.logging.level, "warn");
            },
        );
    }
}
