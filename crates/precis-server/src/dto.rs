use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use precis_core::catalog::ModelInfo;
use precis_core::models::{ExtractionResult, Provider};

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Body of `POST /v1/extract`.
///
/// Every field is optional at the wire level so a missing `url` can be
/// answered with the regular error envelope instead of a rejection.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ExtractRequest {
    #[schema(example = "example.com")]
    pub url: Option<String>,
    /// Model id; defaults to the provider's default model.
    #[schema(example = "claude-3-5-sonnet-20240620")]
    pub model: Option<String>,
    /// `anthropic` (alias `providerA`) or `openai` (alias `providerB`).
    #[schema(value_type = Option<String>, example = "anthropic")]
    pub provider: Option<Provider>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub url: String,
    pub title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub extracted_at: DateTime<Utc>,
    pub id: Uuid,
    pub model: String,
    #[schema(value_type = String, example = "anthropic")]
    pub provider: Provider,
}

impl From<ExtractionResult> for ExtractResponse {
    fn from(r: ExtractionResult) -> Self {
        Self {
            url: r.url.into_string(),
            title: r.content.title,
            summary: r.content.summary,
            key_points: r.content.key_points,
            extracted_at: r.extracted_at,
            id: r.id,
            model: r.model,
            provider: r.provider,
        }
    }
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ModelResponse {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
    pub description: &'static str,
    /// Whether requests for this provider fall back to this model.
    pub default: bool,
}

impl From<&ModelInfo> for ModelResponse {
    fn from(m: &ModelInfo) -> Self {
        Self {
            id: m.id,
            name: m.name,
            provider: m.provider.as_str(),
            description: m.description,
            default: m.provider.default_model() == m.id,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ModelListResponse {
    pub models: Vec<ModelResponse>,
    pub default_provider: &'static str,
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
