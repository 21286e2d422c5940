use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Precis API",
        version = "0.1.0",
        description = "Fetches a web page and summarizes it into a title, summary, and key points with an LLM."
    ),
    paths(
        crate::routes::extract,
        crate::routes::list_models,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::ExtractRequest,
        crate::dto::ExtractResponse,
        crate::dto::ModelResponse,
        crate::dto::ModelListResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "extraction", description = "Page summarization"),
        (name = "models", description = "Known models per provider"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
