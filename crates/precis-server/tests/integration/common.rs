use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use precis_core::ExtractService;
use precis_core::models::Provider;
use precis_core::testutil::{MockBackend, MockFetcher};
use precis_server::routes;
use precis_server::state::AppState;

/// Well-formed structured reply.
pub const JSON_REPLY: &str = r#"{"title":"T","summary":"S","keyPoints":["a","b"]}"#;

pub const SMALL_PAGE: &str = "<html><head><title>Example</title></head><body><p>Hello</p></body></html>";

/// Router wired to mocks, plus handles for asserting on recorded calls.
pub struct TestApp {
    pub router: Router,
    pub fetcher: MockFetcher,
    pub anthropic: MockBackend,
    pub openai: MockBackend,
}

pub fn setup_test_app(fetcher: MockFetcher, anthropic: MockBackend, openai: MockBackend) -> TestApp {
    let service = ExtractService::new(fetcher.clone(), anthropic.clone(), openai.clone());
    let state = Arc::new(AppState::new(service));

    TestApp {
        router: routes::router(state),
        fetcher,
        anthropic,
        openai,
    }
}

/// App whose fetch succeeds and whose Anthropic backend answers with [`JSON_REPLY`].
pub fn setup_default_app() -> TestApp {
    setup_test_app(
        MockFetcher::new(SMALL_PAGE),
        MockBackend::new(Provider::Anthropic, JSON_REPLY),
        MockBackend::unused(Provider::OpenAi),
    )
}

pub async fn post_extract(router: Router, body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::post("/v1/extract")
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    read_json(response).await
}

pub async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}
