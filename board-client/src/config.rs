//! Client configuration

use crate::{ClientError, ClientResult};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the remote store
///
/// # Environment
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BOARD_STORE_URL | required | Store base URL, e.g. `https://xyz.supabase.co` |
/// | BOARD_STORE_API_KEY | required | Project API key, sent as `apikey` |
/// | BOARD_ACCESS_TOKEN | unset | User access token; the API key is used when absent |
/// | BOARD_TIMEOUT_SECS | 30 | Request timeout |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Store base URL without the `/rest/v1` suffix
    pub base_url: String,

    /// Project API key
    pub api_key: String,

    /// Access token of the signed-in user
    pub access_token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the user access token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Load from environment variables
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ClientError::Config(format!("{} is not set", key)))
        };

        let mut config = Self::new(required("BOARD_STORE_URL")?, required("BOARD_STORE_API_KEY")?);

        if let Some(token) = lookup("BOARD_ACCESS_TOKEN").filter(|v| !v.trim().is_empty()) {
            config = config.with_access_token(token);
        }

        if let Some(raw) = lookup("BOARD_TIMEOUT_SECS") {
            let seconds = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("BOARD_TIMEOUT_SECS is not a number: {}", raw))
            })?;
            config = config.with_timeout(seconds);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("BOARD_STORE_URL", "https://board.example.com"),
            ("BOARD_STORE_API_KEY", "anon-key"),
        ]))
        .unwrap();

        assert_eq!(config, ClientConfig::new("https://board.example.com", "anon-key"));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_lookup_optional_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("BOARD_STORE_URL", "https://board.example.com"),
            ("BOARD_STORE_API_KEY", "anon-key"),
            ("BOARD_ACCESS_TOKEN", "user-jwt"),
            ("BOARD_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.access_token.as_deref(), Some("user-jwt"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_from_lookup_missing_url() {
        let err = ClientConfig::from_lookup(lookup(&[("BOARD_STORE_API_KEY", "anon-key")]))
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("BOARD_STORE_URL")));
    }

    #[test]
    fn test_from_lookup_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("BOARD_STORE_URL", "https://board.example.com"),
            ("BOARD_STORE_API_KEY", "anon-key"),
            ("BOARD_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
