//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services and
//! HTTP handlers. Nothing reads process-wide environment variables while serving requests.
//!
//! [`CoreConfig::from_lookup`] takes the variable source as a closure so tests can resolve
//! configuration from a plain map without touching the process environment.

use crate::constants::{
    DEFAULT_HOST, DEFAULT_MRN_SYSTEM, DEFAULT_PORT, ENV_AUTH_SERVER_BASE_URL, ENV_BASE_URL,
    ENV_BEARER_TOKEN, ENV_ENFORCE_IDENTIFIER_SYSTEM, ENV_HOST, ENV_MRN_SYSTEM,
    ENV_PATIENT_SEED_FILE, ENV_PORT,
};
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};
use stub_types::BearerToken;

/// How identifier search treats the system asserted in `system|value` queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdentifierSystemPolicy {
    /// Match on value alone; the asserted system is discarded.
    #[default]
    Ignore,
    /// A non-empty asserted system must equal the configured MRN system.
    Enforce,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    base_url: String,
    auth_server_base_url: String,
    mrn_system: String,
    listen_addr: String,
    bearer_token: BearerToken,
    identifier_system_policy: IdentifierSystemPolicy,
    seed_file: Option<PathBuf>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// Trailing `/` is stripped from both URLs so paths can be appended with `format!`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidInput`] if any URL, the MRN system or the listen address
    /// is empty.
    pub fn new(
        base_url: impl Into<String>,
        auth_server_base_url: impl Into<String>,
        mrn_system: impl Into<String>,
        listen_addr: impl Into<String>,
        bearer_token: BearerToken,
    ) -> PatientResult<Self> {
        let base_url = normalise_url(base_url.into(), "base_url")?;
        let auth_server_base_url = normalise_url(auth_server_base_url.into(), "auth_server_base_url")?;

        let mrn_system = mrn_system.into().trim().to_string();
        if mrn_system.is_empty() {
            return Err(PatientError::InvalidInput(
                "mrn_system cannot be empty".into(),
            ));
        }

        let listen_addr = listen_addr.into().trim().to_string();
        if listen_addr.is_empty() {
            return Err(PatientError::InvalidInput(
                "listen_addr cannot be empty".into(),
            ));
        }

        Ok(Self {
            base_url,
            auth_server_base_url,
            mrn_system,
            listen_addr,
            bearer_token,
            identifier_system_policy: IdentifierSystemPolicy::default(),
            seed_file: None,
        })
    }

    pub fn with_identifier_system_policy(mut self, policy: IdentifierSystemPolicy) -> Self {
        self.identifier_system_policy = policy;
        self
    }

    pub fn with_seed_file(mut self, seed_file: Option<PathBuf>) -> Self {
        self.seed_file = seed_file;
        self
    }

    /// Resolve configuration from the process environment.
    pub fn from_env() -> PatientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary variable source.
    ///
    /// Blank values count as unset. `BEARER_TOKEN` is the only variable without a default.
    pub fn from_lookup<F>(lookup: F) -> PatientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get(ENV_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                PatientError::InvalidInput(format!("{ENV_PORT} must be a port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };
        let host = get(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.into());
        let base_url = get(ENV_BASE_URL).unwrap_or_else(|| format!("http://localhost:{port}"));
        let auth_server_base_url = get(ENV_AUTH_SERVER_BASE_URL).unwrap_or_else(|| base_url.clone());
        let mrn_system = get(ENV_MRN_SYSTEM).unwrap_or_else(|| DEFAULT_MRN_SYSTEM.into());

        let raw_token = get(ENV_BEARER_TOKEN).ok_or_else(|| {
            PatientError::InvalidInput(format!("{ENV_BEARER_TOKEN} must be set to a non-empty token"))
        })?;
        let bearer_token = BearerToken::new(raw_token)
            .map_err(|e| PatientError::InvalidInput(format!("{ENV_BEARER_TOKEN}: {e}")))?;

        let identifier_system_policy = match get(ENV_ENFORCE_IDENTIFIER_SYSTEM) {
            Some(raw) => {
                if parse_flag(ENV_ENFORCE_IDENTIFIER_SYSTEM, &raw)? {
                    IdentifierSystemPolicy::Enforce
                } else {
                    IdentifierSystemPolicy::Ignore
                }
            }
            None => IdentifierSystemPolicy::Ignore,
        };

        let seed_file = get(ENV_PATIENT_SEED_FILE).map(PathBuf::from);

        Ok(Self::new(
            base_url,
            auth_server_base_url,
            mrn_system,
            format!("{host}:{port}"),
            bearer_token,
        )?
        .with_identifier_system_policy(identifier_system_policy)
        .with_seed_file(seed_file))
    }

    /// Public base URL of this server, without trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_server_base_url(&self) -> &str {
        &self.auth_server_base_url
    }

    pub fn mrn_system(&self) -> &str {
        &self.mrn_system
    }

    /// `host:port` to bind the HTTP listener to.
    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn bearer_token(&self) -> &BearerToken {
        &self.bearer_token
    }

    pub fn identifier_system_policy(&self) -> IdentifierSystemPolicy {
        self.identifier_system_policy
    }

    pub fn seed_file(&self) -> Option<&Path> {
        self.seed_file.as_deref()
    }
}

fn normalise_url(value: String, field: &str) -> PatientResult<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(PatientError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

fn parse_flag(key: &str, raw: &str) -> PatientResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(PatientError::InvalidInput(format!(
            "{key} must be true or false, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(vars: &[(&str, &str)]) -> PatientResult<CoreConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_follow_port() {
        let cfg = resolve(&[("BEARER_TOKEN", "demo")]).expect("config");

        assert_eq!(cfg.listen_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.base_url(), "http://localhost:9000");
        assert_eq!(cfg.auth_server_base_url(), "http://localhost:9000");
        assert_eq!(cfg.mrn_system(), "http://hospital.example.org/mrn");
        assert_eq!(cfg.identifier_system_policy(), IdentifierSystemPolicy::Ignore);
        assert!(cfg.seed_file().is_none());

        let cfg = resolve(&[("BEARER_TOKEN", "demo"), ("PORT", "3100")]).expect("config");
        assert_eq!(cfg.base_url(), "http://localhost:3100");
        assert_eq!(cfg.listen_addr(), "0.0.0.0:3100");
    }

    #[test]
    fn explicit_values_win_and_urls_lose_trailing_slash() {
        let cfg = resolve(&[
            ("BEARER_TOKEN", "demo"),
            ("HOST", "127.0.0.1"),
            ("BASE_URL", "https://fhir.example.org/r4/"),
            ("AUTH_SERVER_BASE_URL", "https://auth.example.org/realms/smart/"),
            ("MRN_SYSTEM", "urn:oid:1.2.3"),
            ("ENFORCE_IDENTIFIER_SYSTEM", "TRUE"),
            ("PATIENT_SEED_FILE", "/tmp/patients.json"),
        ])
        .expect("config");

        assert_eq!(cfg.listen_addr(), "127.0.0.1:9000");
        assert_eq!(cfg.base_url(), "https://fhir.example.org/r4");
        assert_eq!(cfg.auth_server_base_url(), "https://auth.example.org/realms/smart");
        assert_eq!(cfg.mrn_system(), "urn:oid:1.2.3");
        assert_eq!(cfg.identifier_system_policy(), IdentifierSystemPolicy::Enforce);
        assert_eq!(cfg.seed_file(), Some(Path::new("/tmp/patients.json")));
    }

    #[test]
    fn bearer_token_is_required() {
        let err = resolve(&[]).expect_err("missing token should fail");
        assert!(err.to_string().contains("BEARER_TOKEN"));

        let err = resolve(&[("BEARER_TOKEN", "   ")]).expect_err("blank token should fail");
        assert!(err.to_string().contains("BEARER_TOKEN"));

        let err = resolve(&[("BEARER_TOKEN", "a b")]).expect_err("spaced token should fail");
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn rejects_bad_port_and_flag() {
        let err = resolve(&[("BEARER_TOKEN", "demo"), ("PORT", "http")]).expect_err("bad port");
        assert!(err.to_string().contains("PORT"));

        let err = resolve(&[("BEARER_TOKEN", "demo"), ("ENFORCE_IDENTIFIER_SYSTEM", "maybe")])
            .expect_err("bad flag");
        assert!(err.to_string().contains("ENFORCE_IDENTIFIER_SYSTEM"));
    }

    #[test]
    fn new_rejects_empty_fields() {
        let token = BearerToken::new("demo").expect("token");
        assert!(CoreConfig::new("/", "http://a", "urn:x", "0.0.0.0:1", token.clone()).is_err());
        assert!(CoreConfig::new("http://a", "http://a", " ", "0.0.0.0:1", token.clone()).is_err());
        assert!(CoreConfig::new("http://a", "http://a", "urn:x", "", token).is_err());
    }

    #[test]
    fn debug_output_hides_token() {
        let cfg = resolve(&[("BEARER_TOKEN", "very-secret")]).expect("config");
        assert!(!format!("{cfg:?}").contains("very-secret"));
    }
}
