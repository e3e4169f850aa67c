//! Validated credential records.
//!
//! Every record is built through a validating constructor, so holding one
//! means its fields passed the checks for that credential kind. Secret
//! fields never show up in `Debug` output.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Credential validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("invalid port '{0}': must be an integer between 0 and 65535")]
    InvalidPort(String),
}

fn require(field: &'static str, value: &str) -> Result<String, CredentialError> {
    if value.is_empty() {
        return Err(CredentialError::Empty(field));
    }
    Ok(value.to_string())
}

/// Application key pair for the financial API
#[derive(Clone, PartialEq, Eq)]
pub struct AppKeys {
    app_key: String,
    app_secret: String,
}

impl AppKeys {
    /// Validate and build a key pair; both values must be non-empty
    pub fn new(app_key: &str, app_secret: &str) -> Result<Self, CredentialError> {
        Ok(Self {
            app_key: require("app_key", app_key)?,
            app_secret: require("app_secret", app_secret)?,
        })
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }
}

impl fmt::Debug for AppKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppKeys")
            .field("app_key", &self.app_key)
            .field("app_secret", &"[REDACTED]")
            .finish()
    }
}

/// Mailbox login for a locality/service pair
#[derive(Clone, PartialEq, Eq)]
pub struct EmailCredentials {
    email: String,
    password: String,
}

impl EmailCredentials {
    /// Validate and build a mailbox login; the email must be well-formed
    /// and the password non-empty
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialError> {
        if !EMAIL_PATTERN.is_match(email) {
            return Err(CredentialError::InvalidEmail(email.to_string()));
        }
        Ok(Self {
            email: email.to_string(),
            password: require("password", password)?,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for EmailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// IMAP server address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImapSettings {
    pub server: String,
    pub port: u16,
}

impl ImapSettings {
    pub fn new(server: &str, port: &str) -> Result<Self, CredentialError> {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| CredentialError::InvalidPort(port.to_string()))?;
        Ok(Self {
            server: require("server", server)?,
            port,
        })
    }
}

/// Azure cognitive services settings
#[derive(Clone, PartialEq, Eq)]
pub struct AzureSettings {
    pub key1: String,
    pub key2: String,
    pub region: String,
    pub endpoint: String,
}

impl fmt::Debug for AzureSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureSettings")
            .field("key1", &"[REDACTED]")
            .field("key2", &"[REDACTED]")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Azure OpenAI deployment settings
#[derive(Clone, PartialEq, Eq)]
pub struct OpenAiSettings {
    pub endpoint: String,
    pub model_name: String,
    pub deployment: String,
    pub subscription_key: String,
    pub api_version: String,
}

impl fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("endpoint", &self.endpoint)
            .field("model_name", &self.model_name)
            .field("deployment", &self.deployment)
            .field("subscription_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Filesystem locations used by the wider toolset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSettings {
    pub boleto: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_keys_accepts_non_empty_values() {
        let keys = AppKeys::new("123456", "abcdef").unwrap();
        assert_eq!(keys.app_key(), "123456");
        assert_eq!(keys.app_secret(), "abcdef");
    }

    #[test]
    fn test_app_keys_rejects_empty_values() {
        assert_eq!(
            AppKeys::new("", "secret").unwrap_err(),
            CredentialError::Empty("app_key")
        );
        assert_eq!(
            AppKeys::new("key", "").unwrap_err(),
            CredentialError::Empty("app_secret")
        );
    }

    #[test]
    fn test_app_keys_debug_hides_secret() {
        let keys = AppKeys::new("key", "very-secret").unwrap();
        let debug = format!("{keys:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailCredentials::new("financeiro@example.com.br", "pw").is_ok());
        assert!(matches!(
            EmailCredentials::new("not-an-email", "pw"),
            Err(CredentialError::InvalidEmail(_))
        ));
        assert!(matches!(
            EmailCredentials::new("a@b", "pw"),
            Err(CredentialError::InvalidEmail(_))
        ));
        assert_eq!(
            EmailCredentials::new("ops@example.com", "").unwrap_err(),
            CredentialError::Empty("password")
        );
    }

    #[test]
    fn test_imap_port_must_be_integer() {
        let imap = ImapSettings::new("imap.example.com", "993").unwrap();
        assert_eq!(imap.port, 993);

        assert!(matches!(
            ImapSettings::new("imap.example.com", "nine"),
            Err(CredentialError::InvalidPort(_))
        ));
    }
}
