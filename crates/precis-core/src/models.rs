use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::normalize::normalize_url;

/// Title substituted when the model reply yields none.
pub const DEFAULT_TITLE: &str = "Extracted Content";
/// Summary substituted when the model reply yields none.
pub const DEFAULT_SUMMARY: &str = "Content extracted from URL";

/// One of the two model backends a request can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Provider {
    #[default]
    #[serde(rename = "anthropic", alias = "providerA")]
    Anthropic,
    #[serde(rename = "openai", alias = "providerB")]
    OpenAi,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Anthropic, Provider::OpenAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::OpenAi => "openai",
        }
    }

    /// Model used when a request does not name one.
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Anthropic => "claude-3-5-sonnet-20240620",
            Provider::OpenAi => "gpt-4o",
        }
    }

    /// Largest HTML prefix embedded in a prompt for this provider.
    ///
    /// The OpenAI budget is smaller so the reply still fits next to the page.
    pub fn max_html_len(&self) -> usize {
        match self {
            Provider::Anthropic => 80_000,
            Provider::OpenAi => 60_000,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "providera" => Ok(Provider::Anthropic),
            "openai" | "providerb" => Ok(Provider::OpenAi),
            other => Err(format!(
                "Unknown provider '{other}' (expected 'anthropic' or 'openai')"
            )),
        }
    }
}

/// A single extraction call, consumed once by the pipeline.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// URL as typed by the user, before normalization.
    pub url: String,
    pub model: String,
    pub provider: Provider,
}

impl ExtractionRequest {
    /// Build a request that uses the provider's default model.
    pub fn new(url: impl Into<String>, provider: Provider) -> Self {
        Self {
            url: url.into(),
            model: provider.default_model().to_string(),
            provider,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// An absolute URL that always carries an `http://` or `https://` scheme.
///
/// Only obtainable through [`normalize_url`], so the scheme guarantee holds
/// for every value in circulation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedUrl(pub(crate) String);

impl NormalizedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedUrl {
    fn from(raw: &str) -> Self {
        normalize_url(raw)
    }
}

/// Raw HTML as returned by the fetcher.
#[derive(Debug, Clone)]
pub struct RawPage {
    pub html: String,
    /// Size of `html` in UTF-8 bytes.
    pub byte_length: usize,
}

impl RawPage {
    pub fn new(html: impl Into<String>) -> Self {
        let html = html.into();
        let byte_length = html.len();
        Self { html, byte_length }
    }
}

/// The title/summary/key-points triple produced from a model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedContent {
    pub title: String,
    pub summary: String,
    /// Kept in the order the model presented them.
    pub key_points: Vec<String>,
}

impl ExtractedContent {
    /// Assemble content from optional parts, substituting defaults for
    /// missing or blank fields and dropping blank key points.
    pub fn from_parts(
        title: Option<String>,
        summary: Option<String>,
        key_points: Vec<String>,
    ) -> Self {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let summary = summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());
        let key_points = key_points
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Self {
            title,
            summary,
            key_points,
        }
    }
}

impl Default for ExtractedContent {
    fn default() -> Self {
        Self::from_parts(None, None, Vec::new())
    }
}

/// The API-level envelope handed back to the caller after a successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub url: NormalizedUrl,
    #[serde(flatten)]
    pub content: ExtractedContent,
    pub extracted_at: DateTime<Utc>,
    pub id: Uuid,
    pub model: String,
    pub provider: Provider,
}

impl ExtractionResult {
    pub fn new(
        url: NormalizedUrl,
        content: ExtractedContent,
        model: impl Into<String>,
        provider: Provider,
    ) -> Self {
        Self {
            url,
            content,
            extracted_at: Utc::now(),
            id: Uuid::new_v4(),
            model: model.into(),
            provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_wire_names_and_aliases() {
        let a: Provider = serde_json::from_str("\"providerA\"").unwrap();
        let b: Provider = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(a, Provider::Anthropic);
        assert_eq!(b, Provider::OpenAi);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"anthropic\"");
        assert!(serde_json::from_str::<Provider>("\"gemini\"").is_err());
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!("providerA".parse::<Provider>().unwrap(), Provider::Anthropic);
        assert!("mistral".parse::<Provider>().is_err());
    }

    #[test]
    fn test_request_defaults_to_provider_model() {
        let req = ExtractionRequest::new("example.com", Provider::OpenAi);
        assert_eq!(req.model, "gpt-4o");

        let req = ExtractionRequest::new("example.com", Provider::default());
        assert_eq!(req.model, "claude-3-5-sonnet-20240620");
        assert_eq!(req.with_model("claude-3-haiku-20240307").model, "claude-3-haiku-20240307");
    }

    #[test]
    fn test_from_parts_substitutes_defaults() {
        let content = ExtractedContent::from_parts(Some("  ".into()), None, vec![
            "a".into(),
            "   ".into(),
            " b ".into(),
        ]);
        assert_eq!(content.title, DEFAULT_TITLE);
        assert_eq!(content.summary, DEFAULT_SUMMARY);
        assert_eq!(content.key_points, vec!["a", "b"]);
    }

    #[test]
    fn test_result_serializes_camel_case_and_flat() {
        let result = ExtractionResult::new(
            normalize_url("example.com"),
            ExtractedContent::from_parts(Some("T".into()), Some("S".into()), vec!["k".into()]),
            "gpt-4o",
            Provider::OpenAi,
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["title"], "T");
        assert_eq!(json["keyPoints"][0], "k");
        assert_eq!(json["provider"], "openai");
        assert!(json["extractedAt"].is_string());
        assert!(json["id"].is_string());
    }
}
