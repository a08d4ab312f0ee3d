//! Client configuration
//!
//! Endpoint, language, credentials and transport settings, loadable from code,
//! environment variables or a JSON file.

use crate::messages::Language;
use crate::types::Credentials;
use crate::{AlfabankError, Result};
use serde::Deserialize;
use std::time::Duration;

/// Default REST endpoint prefix (test environment)
pub const DEFAULT_URL_PREFIX: &str = "https://web.rbsuat.com/ab/rest/";

/// Default REST endpoint suffix
pub const DEFAULT_URL_SUFFIX: &str = ".do";

/// Configuration for [`AlfabankClient`](crate::AlfabankClient)
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Authentication sent with every request
    pub credentials: Credentials,
    /// Language of validation messages
    pub language: Language,
    /// Prefix of every operation URL
    pub url_prefix: String,
    /// Suffix of every operation URL
    pub url_suffix: String,
    /// Request timeout; the transport default applies when unset
    #[serde(rename = "timeoutSecs", deserialize_with = "deserialize_timeout")]
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            language: Language::default(),
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            url_suffix: DEFAULT_URL_SUFFIX.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the default endpoint
    pub fn new(credentials: Credentials, language: Language) -> Self {
        Self {
            credentials,
            language,
            ..Self::default()
        }
    }

    /// Override the URL prefix
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// Override the URL suffix
    pub fn with_url_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.url_suffix = suffix.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AlfabankError::config(format!("Failed to read config file: {}", e)))?;

        let mut config: ClientConfig = serde_json::from_str(&content)
            .map_err(|e| AlfabankError::config(format!("Failed to parse config file: {}", e)))?;
        config.credentials = config.credentials.normalized();

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        let mut credentials = Credentials::default();

        if let Ok(token) = std::env::var("ALFABANK_TOKEN") {
            credentials = credentials.with_token(token);
        }

        if let (Ok(user_name), Ok(password)) = (
            std::env::var("ALFABANK_USERNAME"),
            std::env::var("ALFABANK_PASSWORD"),
        ) {
            credentials = credentials.with_login(user_name, password);
        }
        config.credentials = credentials;

        if let Ok(language) = std::env::var("ALFABANK_LANGUAGE") {
            config.language = language.parse()?;
        }

        if let Ok(prefix) = std::env::var("ALFABANK_URL_PREFIX") {
            config.url_prefix = prefix;
        }

        if let Ok(suffix) = std::env::var("ALFABANK_URL_SUFFIX") {
            config.url_suffix = suffix;
        }

        if let Ok(timeout) = std::env::var("ALFABANK_TIMEOUT_SECS") {
            let secs: u64 = timeout
                .parse()
                .map_err(|e| AlfabankError::config(format!("Invalid ALFABANK_TIMEOUT_SECS: {}", e)))?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.credentials.is_complete() {
            return Err(AlfabankError::auth_invalid(self.language));
        }

        let prefix = url::Url::parse(&self.url_prefix)
            .map_err(|e| AlfabankError::config(format!("Invalid URL prefix: {}", e)))?;

        if prefix.scheme() != "http" && prefix.scheme() != "https" {
            return Err(AlfabankError::config(
                "URL prefix must start with http:// or https://",
            ));
        }

        Ok(())
    }

    /// Full URL of an operation
    pub fn operation_url(&self, operation: &str) -> String {
        format!("{}{}{}", self.url_prefix, operation, self.url_suffix)
    }
}

fn deserialize_timeout<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}
