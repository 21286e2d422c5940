//! Environment-driven settings for the fetcher and model backends.

use std::str::FromStr;
use std::time::Duration;

use precis_core::error::{AppError, FetchError};

use crate::fetcher::{DEFAULT_FETCH_TIMEOUT, ReqwestFetcher};
use crate::llm::{AnthropicBackend, DEFAULT_MODEL_TIMEOUT, OpenAiBackend, anthropic, openai};

/// Credentials, endpoints and limits shared by the server and the CLI.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_base_url: String,
    pub openai_base_url: String,
    pub fetch_timeout: Duration,
    pub model_timeout: Duration,
    pub allow_private_urls: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            openai_api_key: None,
            anthropic_base_url: anthropic::DEFAULT_BASE_URL.to_string(),
            openai_base_url: openai::DEFAULT_BASE_URL.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            allow_private_urls: false,
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            openai_api_key: get("OPENAI_API_KEY"),
            anthropic_base_url: get("ANTHROPIC_BASE_URL").unwrap_or(defaults.anthropic_base_url),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            fetch_timeout: match get("PRECIS_FETCH_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(parse_var("PRECIS_FETCH_TIMEOUT_SECS", &v)?),
                None => defaults.fetch_timeout,
            },
            model_timeout: match get("PRECIS_MODEL_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(parse_var("PRECIS_MODEL_TIMEOUT_SECS", &v)?),
                None => defaults.model_timeout,
            },
            allow_private_urls: match get("PRECIS_ALLOW_PRIVATE_URLS") {
                Some(v) => parse_bool("PRECIS_ALLOW_PRIVATE_URLS", &v)?,
                None => defaults.allow_private_urls,
            },
        })
    }

    pub fn fetcher(&self) -> Result<ReqwestFetcher, AppError> {
        let fetcher = ReqwestFetcher::with_timeout(self.fetch_timeout)
            .map_err(|e: FetchError| AppError::ConfigError(e.to_string()))?;

        Ok(if self.allow_private_urls {
            fetcher.allow_private_urls()
        } else {
            fetcher
        })
    }

    /// Anthropic backend; unconfigured when no key is set.
    pub fn anthropic(&self) -> Result<AnthropicBackend, AppError> {
        let backend = match &self.anthropic_api_key {
            Some(key) => AnthropicBackend::with_base_url(key, &self.anthropic_base_url)?,
            None => AnthropicBackend::unconfigured()?,
        };
        backend.with_timeout(self.model_timeout)
    }

    /// OpenAI backend; unconfigured when no key is set.
    pub fn openai(&self) -> Result<OpenAiBackend, AppError> {
        let backend = match &self.openai_api_key {
            Some(key) => OpenAiBackend::with_base_url(key, &self.openai_base_url)?,
            None => OpenAiBackend::unconfigured()?,
        };
        backend.with_timeout(self.model_timeout)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::ConfigError(format!("Invalid value for {key}: {value:?}")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::ConfigError(format!(
            "Invalid value for {key}: {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.anthropic_api_key.is_none());
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.anthropic_base_url, "https://api.anthropic.com");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.fetch_timeout, Duration::from_secs(15));
        assert_eq!(config.model_timeout, Duration::from_secs(60));
        assert!(!config.allow_private_urls);
    }

    #[test]
    fn test_reads_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("OPENAI_API_KEY", "sk-oai"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1"),
            ("PRECIS_FETCH_TIMEOUT_SECS", "5"),
            ("PRECIS_MODEL_TIMEOUT_SECS", " 90 "),
            ("PRECIS_ALLOW_PRIVATE_URLS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-ant"));
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-oai"));
        assert_eq!(config.openai_base_url, "http://localhost:11434/v1");
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.model_timeout, Duration::from_secs(90));
        assert!(config.allow_private_urls);
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = ClientConfig::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "  ")])).unwrap();
        assert!(config.anthropic_api_key.is_none());
        assert!(!config.anthropic().unwrap().is_configured());
    }

    #[test]
    fn test_invalid_number_names_variable() {
        let err =
            ClientConfig::from_lookup(lookup(&[("PRECIS_FETCH_TIMEOUT_SECS", "soon")])).unwrap_err();
        match err {
            AppError::ConfigError(msg) => assert!(msg.contains("PRECIS_FETCH_TIMEOUT_SECS")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_bool() {
        let err =
            ClientConfig::from_lookup(lookup(&[("PRECIS_ALLOW_PRIVATE_URLS", "maybe")])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_builds_backends() {
        let config = ClientConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-oai")])).unwrap();
        assert!(config.openai().unwrap().is_configured());
        assert!(!config.anthropic().unwrap().is_configured());
        assert!(config.fetcher().is_ok());
    }
}
