use crate::api::{ArthurClient, build_http_client_with_timeouts};
use crate::config::{Config, HttpConfig};
use crate::error::ConfigError;
use reqwest::Client;
use std::fmt;

/// An API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    /// Trimmed key, or `None` when blank.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// First non-blank key from, in order: the command-line flag, then the
/// config. A config from [`Config::load_or_init`] already carries any
/// `ARTHUR_API_KEY` override.
pub fn resolve_credential(flag: Option<&str>, config: &Config) -> Option<Credential> {
    flag.and_then(Credential::new)
        .or_else(|| config.api_key.as_deref().and_then(Credential::new))
}

/// Base URL plus credential. Every action receives one explicitly.
#[derive(Clone)]
pub struct Session {
    base_url: String,
    credential: Credential,
    http: Client,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(base_url: &str, credential: Credential) -> Self {
        Self::with_http(base_url, credential, &HttpConfig::default())
    }

    pub fn with_http(base_url: &str, credential: Credential, http: &HttpConfig) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
            http: build_http_client_with_timeouts(
                http.connect_timeout_secs,
                http.request_timeout_secs,
            ),
        }
    }

    /// Fails before any network call when the base URL is missing.
    pub fn from_config(config: &Config, credential: Credential) -> Result<Self, ConfigError> {
        let base_url = config.require_base_url()?;
        Ok(Self::with_http(base_url, credential, &config.http))
    }

    /// Like [`Session::from_config`], additionally requiring a credential.
    pub fn require(config: &Config, credential: Option<Credential>) -> Result<Self, ConfigError> {
        let base_url = config.require_base_url()?;
        let credential = credential.ok_or(ConfigError::MissingCredential)?;
        Ok(Self::with_http(base_url, credential, &config.http))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn client(&self) -> ArthurClient {
        ArthurClient::with_http_client(&self.base_url, self.credential.expose(), self.http.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_credential_is_rejected() {
        assert!(Credential::new("   ").is_none());
        assert_eq!(Credential::new(" k ").unwrap().expose(), "k");
    }

    #[test]
    fn debug_never_prints_the_key() {
        let session = Session::new(
            "https://engine.example.com",
            Credential::new("sk-live").unwrap(),
        );
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("sk-live"));
        assert!(rendered.contains("engine.example.com"));
        assert!(rendered.contains("REDACTED"));
        assert_eq!(format!("{:?}", session.clone()), rendered);
    }

    #[test]
    fn flag_wins_over_config() {
        let config = Config {
            api_key: Some("from-config".into()),
            ..Config::default()
        };
        assert_eq!(
            resolve_credential(Some("from-flag"), &config).unwrap().expose(),
            "from-flag"
        );
        assert_eq!(
            resolve_credential(Some("  "), &config).unwrap().expose(),
            "from-config"
        );
        assert!(resolve_credential(None, &Config::default()).is_none());
    }

    #[test]
    fn require_reports_missing_pieces_in_order() {
        let no_url = Config::default();
        assert!(matches!(
            Session::require(&no_url, Credential::new("k")),
            Err(ConfigError::MissingBaseUrl)
        ));

        let no_key = Config {
            base_url: Some("https://engine.example.com".into()),
            ..Config::default()
        };
        assert!(matches!(
            Session::require(&no_key, None),
            Err(ConfigError::MissingCredential)
        ));
    }

    #[test]
    fn client_uses_session_base_url() {
        let session = Session::new("https://engine.example.com/", Credential::new("k").unwrap());
        assert_eq!(session.client().base_url(), "https://engine.example.com");
    }
}
