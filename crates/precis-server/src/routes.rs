use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use precis_core::catalog;
use precis_core::error::AppError;
use precis_core::models::{ExtractionRequest, Provider};
use precis_core::normalize_url;

use crate::dto::{
    ExtractRequest, ExtractResponse, HealthResponse, ModelListResponse, ModelResponse,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/extract", post(extract))
        .route("/v1/models", get(list_models))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/v1/extract",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Summarized page", body = ExtractResponse),
        (status = 400, description = "Bad input, unreachable site, or oversized page", body = crate::dto::ErrorResponse),
        (status = 403, description = "Target site refused access", body = crate::dto::ErrorResponse),
        (status = 404, description = "Target page not found", body = crate::dto::ErrorResponse),
        (status = 500, description = "Model or internal failure", body = crate::dto::ErrorResponse),
    ),
    tag = "extraction"
)]
pub async fn extract(
    State(state): State<Arc<AppState>>,
    body: Result<axum::Json<ExtractRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let axum::Json(body) = body.map_err(|rejection| {
        AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let url = body
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("URL is required".to_string()))?;

    let provider = body.provider.unwrap_or_default();
    let request = match body.model.filter(|m| !m.trim().is_empty()) {
        Some(model) => ExtractionRequest::new(url, provider).with_model(model),
        None => ExtractionRequest::new(url, provider),
    };

    let target = normalize_url(&request.url).into_string();
    let result = state
        .pipeline
        .run(request)
        .await
        .map_err(|e| ApiError::new(e, Some(target)))?;

    Ok(axum::Json(ExtractResponse::from(result)))
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/v1/models",
    responses(
        (status = 200, description = "Known models for every provider", body = ModelListResponse),
    ),
    tag = "models"
)]
pub async fn list_models() -> impl IntoResponse {
    let models = catalog::catalog().iter().map(ModelResponse::from).collect();

    axum::Json(ModelListResponse {
        models,
        default_provider: Provider::default().as_str(),
    })
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health() -> impl IntoResponse {
    axum::Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
