use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use serde_json::json;

use precis_core::classify::OVERSIZED_MESSAGE;
use precis_core::error::{FetchError, ModelError};
use precis_core::models::{DEFAULT_SUMMARY, DEFAULT_TITLE, Provider};
use precis_core::testutil::{MockBackend, MockFetcher};
use precis_core::MAX_PAGE_BYTES;

use crate::common::{
    JSON_REPLY, SMALL_PAGE, get_json, post_extract, setup_default_app, setup_test_app,
};

#[tokio::test]
async fn health_returns_200() {
    let app = setup_default_app();

    let (status, json) = get_json(app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn extract_end_to_end() {
    let app = setup_default_app();

    let body = json!({"url": "example.com", "provider": "providerA"}).to_string();
    let (status, json) = post_extract(app.router, body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["url"], "https://example.com");
    assert_eq!(json["title"], "T");
    assert_eq!(json["summary"], "S");
    assert_eq!(json["keyPoints"], json!(["a", "b"]));
    assert_eq!(json["model"], "claude-3-5-sonnet-20240620");
    assert_eq!(json["provider"], "anthropic");
    assert!(json["id"].as_str().is_some_and(|id| id.len() == 36));
    assert!(json["extractedAt"].is_string());

    assert_eq!(app.fetcher.requested(), vec!["https://example.com"]);
    let calls = app.anthropic.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.user.contains("<p>Hello</p>"));
}

#[tokio::test]
async fn provider_defaults_to_anthropic() {
    let app = setup_default_app();

    let (status, json) = post_extract(app.router, r#"{"url":"https://example.com/a"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["provider"], "anthropic");
    assert_eq!(app.anthropic.call_count(), 1);
    assert_eq!(app.openai.call_count(), 0);
}

#[tokio::test]
async fn openai_request_uses_its_backend_and_model() {
    let app = setup_test_app(
        MockFetcher::new(SMALL_PAGE),
        MockBackend::unused(Provider::Anthropic),
        MockBackend::new(
            Provider::OpenAi,
            "Title: Example\n\nSummary: A page.\n\nKey Points:\n- Hello\n- World",
        ),
    );

    let body = json!({"url": "example.com", "provider": "providerB", "model": "gpt-3.5-turbo"});
    let (status, json) = post_extract(app.router, body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Example");
    assert_eq!(json["keyPoints"], json!(["Hello", "World"]));
    assert_eq!(json["model"], "gpt-3.5-turbo");
    assert_eq!(json["provider"], "openai");
    assert_eq!(app.anthropic.call_count(), 0);
    assert_eq!(app.openai.calls()[0].model, "gpt-3.5-turbo");
}

#[tokio::test]
async fn missing_url_returns_400() {
    let app = setup_default_app();

    let (status, json) = post_extract(app.router, r#"{"provider":"anthropic"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "URL is required");
    assert!(app.fetcher.requested().is_empty());
}

#[tokio::test]
async fn blank_url_returns_400() {
    let app = setup_default_app();

    let (status, json) = post_extract(app.router, r#"{"url":"   "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "URL is required");
}

#[tokio::test]
async fn malformed_body_returns_400_envelope() {
    let app = setup_default_app();

    let (status, json) = post_extract(app.router, "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body:")
    );
}

#[tokio::test]
async fn body_over_limit_returns_400_envelope() {
    let app = setup_default_app();
    let router = app.router.layer(DefaultBodyLimit::max(64));

    let body = json!({"url": format!("example.com/{}", "a".repeat(200))}).to_string();
    let (status, json) = post_extract(router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body:")
    );
    assert!(app.fetcher.requested().is_empty());
}

#[tokio::test]
async fn empty_model_reply_yields_default_content() {
    let app = setup_test_app(
        MockFetcher::new(SMALL_PAGE),
        MockBackend::new(Provider::Anthropic, ""),
        MockBackend::unused(Provider::OpenAi),
    );

    let (status, json) = post_extract(app.router, r#"{"url":"example.com"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], DEFAULT_TITLE);
    assert_eq!(json["summary"], DEFAULT_SUMMARY);
    assert_eq!(json["keyPoints"], json!([]));
}

#[tokio::test]
async fn unknown_provider_returns_400() {
    let app = setup_default_app();

    let body = json!({"url": "example.com", "provider": "gemini"}).to_string();
    let (status, json) = post_extract(app.router, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid request body"));
    assert_eq!(app.anthropic.call_count(), 0);
}

#[tokio::test]
async fn oversized_page_returns_400_without_model_call() {
    let big = "x".repeat(MAX_PAGE_BYTES + 1);
    let app = setup_test_app(
        MockFetcher::new(&big),
        MockBackend::new(Provider::Anthropic, JSON_REPLY),
        MockBackend::unused(Provider::OpenAi),
    );

    let (status, json) = post_extract(app.router, r#"{"url":"example.com"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], OVERSIZED_MESSAGE);
    assert_eq!(app.anthropic.call_count(), 0);
}

#[tokio::test]
async fn unresolvable_host_names_the_url() {
    let app = setup_test_app(
        MockFetcher::with_error(FetchError::Other(
            "getaddrinfo ENOTFOUND nowhere.invalid".into(),
        )),
        MockBackend::unused(Provider::Anthropic),
        MockBackend::unused(Provider::OpenAi),
    );

    let (status, json) = post_extract(app.router, r#"{"url":"nowhere.invalid"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("https://nowhere.invalid"), "{message}");
}

#[tokio::test]
async fn site_404_is_passed_through() {
    let app = setup_test_app(
        MockFetcher::with_error(FetchError::Status {
            status: 404,
            url: "https://example.com/missing".into(),
        }),
        MockBackend::unused(Provider::Anthropic),
        MockBackend::unused(Provider::OpenAi),
    );

    let (status, json) = post_extract(app.router, r#"{"url":"example.com/missing"}"#).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().starts_with("Resource not found"));
}

#[tokio::test]
async fn blocked_target_returns_400() {
    let app = setup_test_app(
        MockFetcher::with_error(FetchError::Blocked("127.0.0.1".into())),
        MockBackend::unused(Provider::Anthropic),
        MockBackend::unused(Provider::OpenAi),
    );

    let (status, _) = post_extract(app.router, r#"{"url":"http://localhost"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unconfigured_provider_returns_500() {
    let app = setup_test_app(
        MockFetcher::new(SMALL_PAGE),
        MockBackend::with_error(Provider::Anthropic, ModelError::NotConfigured(Provider::Anthropic)),
        MockBackend::unused(Provider::OpenAi),
    );

    let (status, json) = post_extract(app.router, r#"{"url":"example.com"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json["error"],
        "Provider anthropic is not configured on this server"
    );
}

#[tokio::test]
async fn context_overflow_maps_to_oversized_message() {
    let app = setup_test_app(
        MockFetcher::new(SMALL_PAGE),
        MockBackend::with_error(
            Provider::Anthropic,
            ModelError::ContextLengthExceeded("prompt is too long".into()),
        ),
        MockBackend::unused(Provider::OpenAi),
    );

    let (status, json) = post_extract(app.router, r#"{"url":"example.com"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], OVERSIZED_MESSAGE);
}

#[tokio::test]
async fn list_models_marks_defaults() {
    let app = setup_default_app();

    let (status, json) = get_json(app.router, "/v1/models").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["default_provider"], "anthropic");
    let models = json["models"].as_array().unwrap();
    assert_eq!(models.len(), 6);

    let defaults: Vec<&str> = models
        .iter()
        .filter(|m| m["default"] == true)
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(defaults, vec!["claude-3-5-sonnet-20240620", "gpt-4o"]);
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let app = setup_default_app();

    let (status, json) = get_json(app.router, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/v1/extract"]["post"].is_object());
    assert!(json["paths"]["/v1/models"]["get"].is_object());
    assert!(json["paths"]["/health"]["get"].is_object());
}
