use std::env;
use std::fmt;

use ai_client::DEFAULT_GEMINI_MODEL;
use tracing::{info, warn};

use crate::error::SearchError;

/// Credential for the generative-content service. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for blank input.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    fn redacted(&self) -> String {
        let visible: String = self.0.chars().take(4).collect();
        format!("{visible}…")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&"<redacted>").finish()
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Generative service
    pub gemini_api_key: Option<ApiKey>,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing API key is not an error here; every fetch surfaces it as
    /// `SearchError::Configuration`.
    pub fn from_env() -> Result<Self, SearchError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SearchError> {
        // A blank GEMINI_API_KEY must not shadow the alias.
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .and_then(ApiKey::new)
            .or_else(|| lookup("GOOGLE_API_KEY").and_then(ApiKey::new));

        let web_port = match lookup("WEB_PORT") {
            Some(port) => port.trim().parse().map_err(|_| {
                SearchError::Configuration(format!("WEB_PORT must be a number, got {port:?}"))
            })?,
            None => 3000,
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL").filter(|u| !u.trim().is_empty()),
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port,
        })
    }

    /// Log the effective configuration with the credential masked.
    pub fn log_redacted(&self) {
        match &self.gemini_api_key {
            Some(key) => {
                let masked = key.redacted();
                info!(
                    gemini_api_key = masked.as_str(),
                    gemini_model = self.gemini_model.as_str(),
                    gemini_base_url = self.gemini_base_url.as_deref().unwrap_or("default"),
                    web_host = self.web_host.as_str(),
                    web_port = self.web_port,
                    "Configuration loaded"
                )
            }
            None => warn!(
                gemini_model = self.gemini_model.as_str(),
                "GEMINI_API_KEY is not set; every search will fail with a configuration error"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.gemini_api_key.is_none());
        assert_eq!(config.gemini_model, "gemini-2.5-flash");
        assert_eq!(config.web_host, "0.0.0.0");
        assert_eq!(config.web_port, 3000);
    }

    #[test]
    fn google_api_key_is_accepted_as_alias() {
        let config = Config::from_lookup(lookup(&[("GOOGLE_API_KEY", "abc123")])).unwrap();
        assert_eq!(config.gemini_api_key.unwrap().expose(), "abc123");
    }

    #[test]
    fn blank_gemini_key_falls_back_to_google_key() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", ""),
            ("GOOGLE_API_KEY", "real-key"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_api_key.unwrap().expose(), "real-key");
    }

    #[test]
    fn gemini_key_wins_over_alias() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "primary"),
            ("GOOGLE_API_KEY", "alias"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_api_key.unwrap().expose(), "primary");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "   ")])).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn bad_port_is_configuration_error() {
        let result = Config::from_lookup(lookup(&[("WEB_PORT", "eighty")]));
        assert!(matches!(result, Err(SearchError::Configuration(_))));
    }

    #[test]
    fn debug_output_hides_key() {
        let key = ApiKey::new("super-secret-key").unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("super-secret-key"));
        assert_eq!(key.redacted(), "supe…");
    }
}
