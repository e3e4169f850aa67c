use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::domain::models::credentials::{
    AppKeys, AzureSettings, CredentialError, EmailCredentials, ImapSettings, OpenAiSettings,
    PathSettings,
};

/// Resolves locality/service scoped secrets from an environment snapshot
///
/// The snapshot is taken once when the resolver is built; later changes to
/// the process environment are not observed. Every lookup answers `None`
/// when a variable is missing or a value fails validation, logging a
/// warning or an error respectively.
#[derive(Clone, Default)]
pub struct CredentialResolver {
    vars: HashMap<String, String>,
}

impl CredentialResolver {
    /// Snapshot the current process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars_os().filter_map(|(name, value)| {
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                (Ok(name), Err(_)) => {
                    debug!(variable = %name, "skipping non UTF-8 environment value");
                    None
                }
                (Err(name), _) => {
                    debug!(variable = ?name, "skipping non UTF-8 environment name");
                    None
                }
            }
        }))
    }

    /// Build a resolver over explicit key/value pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Environment variable name for a scoped secret: `{LOC}_{SVC}_{FIELD}`
    pub fn scoped_var(locality: &str, service: &str, field: &str) -> String {
        format!(
            "{}_{}_{}",
            locality.to_uppercase(),
            service.to_uppercase(),
            field
        )
    }

    /// Mailbox login from `{LOC}_{SVC}_EMAIL` and `{LOC}_{SVC}_SENHA`
    pub fn email_credentials(&self, locality: &str, service: &str) -> Option<EmailCredentials> {
        let email_var = Self::scoped_var(locality, service, "EMAIL");
        let password_var = Self::scoped_var(locality, service, "SENHA");

        let [email, password] = self.require_all(&[email_var.as_str(), password_var.as_str()])?;
        let scope = Self::scope(locality, service);
        Self::validated(&scope, EmailCredentials::new(email, password))
    }

    /// API keys from `{LOC}_{SVC}_APP_KEY` and `{LOC}_{SVC}_APP_SECRET`
    pub fn app_keys(&self, locality: &str, service: &str) -> Option<AppKeys> {
        let key_var = Self::scoped_var(locality, service, "APP_KEY");
        let secret_var = Self::scoped_var(locality, service, "APP_SECRET");

        let [app_key, app_secret] = self.require_all(&[key_var.as_str(), secret_var.as_str()])?;
        let scope = Self::scope(locality, service);
        Self::validated(&scope, AppKeys::new(app_key, app_secret))
    }

    /// IMAP server from `SERVIDOR` and `PORTA`
    pub fn imap(&self) -> Option<ImapSettings> {
        let [server, port] = self.require_all(&["SERVIDOR", "PORTA"])?;
        Self::validated("IMAP", ImapSettings::new(server, port))
    }

    /// Azure settings from `KEY1`, `KEY2`, `REGIAO` and `ENDPOINT`
    pub fn azure(&self) -> Option<AzureSettings> {
        let [key1, key2, region, endpoint] =
            self.require_all(&["KEY1", "KEY2", "REGIAO", "ENDPOINT"])?;
        Some(AzureSettings {
            key1: key1.to_string(),
            key2: key2.to_string(),
            region: region.to_string(),
            endpoint: endpoint.to_string(),
        })
    }

    /// Azure OpenAI settings
    pub fn openai(&self) -> Option<OpenAiSettings> {
        let [endpoint, model_name, deployment, subscription_key, api_version] = self.require_all(
            &[
                "ENDPOINT_OPENAI",
                "MODEL_NAME",
                "DEPLOYMENT",
                "SUBSCRIPTION_KEY",
                "API_VERSION",
            ],
        )?;
        Some(OpenAiSettings {
            endpoint: endpoint.to_string(),
            model_name: model_name.to_string(),
            deployment: deployment.to_string(),
            subscription_key: subscription_key.to_string(),
            api_version: api_version.to_string(),
        })
    }

    /// Paths from `PATH_BOLETO`
    pub fn paths(&self) -> Option<PathSettings> {
        let [boleto] = self.require_all(&["PATH_BOLETO"])?;
        Some(PathSettings {
            boleto: boleto.to_string(),
        })
    }

    /// Look up every name; a missing or empty value logs one warning
    /// naming the whole group and yields `None`
    fn require_all<const N: usize>(&self, names: &[&str; N]) -> Option<[&str; N]> {
        let mut values = [""; N];
        for (slot, name) in values.iter_mut().zip(names) {
            match self.vars.get(*name).map(String::as_str) {
                Some(value) if !value.is_empty() => *slot = value,
                _ => {
                    warn!(
                        variables = %names.join(", "),
                        missing = %name,
                        "environment variables not configured"
                    );
                    return None;
                }
            }
        }
        Some(values)
    }

    fn validated<T>(scope: &str, result: Result<T, CredentialError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                error!(scope = %scope, error = %err, "credential validation failed");
                None
            }
        }
    }

    fn scope(locality: &str, service: &str) -> String {
        format!("{}_{}", locality.to_uppercase(), service.to_uppercase())
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("vars", &self.vars.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(vars: &[(&str, &str)]) -> CredentialResolver {
        CredentialResolver::from_vars(vars.iter().copied())
    }

    #[test]
    fn test_scoped_var_is_uppercased() {
        assert_eq!(
            CredentialResolver::scoped_var("Pinheirinho", "cartao", "APP_KEY"),
            "PINHEIRINHO_CARTAO_APP_KEY"
        );
    }

    #[test]
    fn test_app_keys_resolve_regardless_of_case() {
        let resolver = resolver(&[
            ("PINHEIRINHO_CARTAO_APP_KEY", "123"),
            ("PINHEIRINHO_CARTAO_APP_SECRET", "abc"),
        ]);

        for (locality, service) in [
            ("pinheirinho", "cartao"),
            ("PINHEIRINHO", "CARTAO"),
            ("PinHeirinho", "Cartao"),
        ] {
            let keys = resolver.app_keys(locality, service).unwrap();
            assert_eq!(keys.app_key(), "123");
            assert_eq!(keys.app_secret(), "abc");
        }
    }

    #[test]
    fn test_app_keys_missing_either_variable() {
        assert!(resolver(&[("PINHEIRINHO_CARTAO_APP_KEY", "123")])
            .app_keys("pinheirinho", "cartao")
            .is_none());
        assert!(resolver(&[("PINHEIRINHO_CARTAO_APP_SECRET", "abc")])
            .app_keys("pinheirinho", "cartao")
            .is_none());
        assert!(resolver(&[]).app_keys("pinheirinho", "cartao").is_none());
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let resolver = resolver(&[
            ("CENTRO_BOLETO_APP_KEY", ""),
            ("CENTRO_BOLETO_APP_SECRET", "abc"),
        ]);
        assert!(resolver.app_keys("centro", "boleto").is_none());
    }

    #[test]
    fn test_email_credentials() {
        let resolver = resolver(&[
            ("CENTRO_BOLETO_EMAIL", "financeiro@example.com"),
            ("CENTRO_BOLETO_SENHA", "hunter2"),
            ("SUL_BOLETO_EMAIL", "not-an-email"),
            ("SUL_BOLETO_SENHA", "hunter2"),
        ]);

        let creds = resolver.email_credentials("centro", "boleto").unwrap();
        assert_eq!(creds.email(), "financeiro@example.com");
        assert_eq!(creds.password(), "hunter2");

        assert!(resolver.email_credentials("sul", "boleto").is_none());
    }

    #[test]
    fn test_imap_requires_integer_port() {
        let ok = resolver(&[("SERVIDOR", "imap.example.com"), ("PORTA", "993")]);
        assert_eq!(ok.imap().unwrap().port, 993);

        let bad = resolver(&[("SERVIDOR", "imap.example.com"), ("PORTA", "imaps")]);
        assert!(bad.imap().is_none());
    }

    #[test]
    fn test_global_sections_need_every_variable() {
        let partial = resolver(&[("KEY1", "a"), ("KEY2", "b"), ("REGIAO", "brazilsouth")]);
        assert!(partial.azure().is_none());

        let full = resolver(&[
            ("KEY1", "a"),
            ("KEY2", "b"),
            ("REGIAO", "brazilsouth"),
            ("ENDPOINT", "https://example.cognitiveservices.azure.com"),
            ("ENDPOINT_OPENAI", "https://example.openai.azure.com"),
            ("MODEL_NAME", "gpt-4o"),
            ("DEPLOYMENT", "dash"),
            ("SUBSCRIPTION_KEY", "sub"),
            ("API_VERSION", "2024-06-01"),
            ("PATH_BOLETO", "/srv/boletos"),
        ]);
        assert_eq!(full.azure().unwrap().region, "brazilsouth");
        assert_eq!(full.openai().unwrap().deployment, "dash");
        assert_eq!(full.paths().unwrap().boleto, "/srv/boletos");
    }

    #[test]
    fn test_debug_does_not_leak_values() {
        let resolver = resolver(&[("CENTRO_BOLETO_APP_SECRET", "top-secret")]);
        assert!(!format!("{resolver:?}").contains("top-secret"));
    }
}
