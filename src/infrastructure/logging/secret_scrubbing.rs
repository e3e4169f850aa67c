use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static DEFAULT_SCRUBBER: LazyLock<SecretScrubber> = LazyLock::new(SecretScrubber::new);

/// Redacts credential values from text before it is logged or shown
#[derive(Clone)]
pub struct SecretScrubber {
    field_pattern: Regex,
    bearer_pattern: Regex,
}

impl SecretScrubber {
    /// Create a new scrubber
    pub fn new() -> Self {
        Self {
            // JSON or key=value fields carrying secrets; the value is group 2
            field_pattern: Regex::new(
                r#"(?i)("?(?:app_key|app_secret|api_key|secret|senha|password|subscription_key|token)"?\s*[:=]\s*"?)([^"\s,}&]+)"#,
            )
            .expect("secret field pattern is valid"),
            bearer_pattern: Regex::new(r"Bearer\s+[a-zA-Z0-9\-_\.]+").expect("bearer pattern is valid"),
        }
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = self
            .bearer_pattern
            .replace_all(message, "Bearer [TOKEN_REDACTED]");
        self.field_pattern
            .replace_all(&scrubbed, "${1}[REDACTED]")
            .into_owned()
    }
}

impl Default for SecretScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}

/// Scrub with the shared default scrubber
pub fn scrub_secrets(message: &str) -> String {
    DEFAULT_SCRUBBER.scrub_message(message)
}
