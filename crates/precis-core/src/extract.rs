use futures::future::BoxFuture;

use crate::catalog;
use crate::error::{AppError, FetchError, ModelError};
use crate::models::{ExtractionRequest, ExtractionResult, Provider};
use crate::normalize::normalize_url;
use crate::parser::parse_reply;
use crate::prompt::{Prompt, build_prompt};
use crate::traits::{Fetcher, ModelBackend};

/// Pages larger than this are rejected before any model call.
pub const MAX_PAGE_BYTES: usize = 1_000_000;

/// Orchestrates the extraction pipeline: normalize → fetch → prompt → invoke → parse.
///
/// Generic over the fetcher and both model backends, enabling dependency
/// injection and testability without real HTTP or LLM calls. Holds no
/// per-request state, so one instance serves any number of concurrent calls.
pub struct ExtractService<F, A, O>
where
    F: Fetcher,
    A: ModelBackend,
    O: ModelBackend,
{
    fetcher: F,
    anthropic: A,
    openai: O,
}

impl<F, A, O> ExtractService<F, A, O>
where
    F: Fetcher,
    A: ModelBackend,
    O: ModelBackend,
{
    pub fn new(fetcher: F, anthropic: A, openai: O) -> Self {
        debug_assert_eq!(anthropic.provider(), Provider::Anthropic);
        debug_assert_eq!(openai.provider(), Provider::OpenAi);
        Self {
            fetcher,
            anthropic,
            openai,
        }
    }

    /// Run one extraction. Any stage failure short-circuits; nothing is retried.
    pub async fn extract(&self, request: ExtractionRequest) -> Result<ExtractionResult, AppError> {
        if request.url.trim().is_empty() {
            return Err(AppError::InvalidInput("URL is required".to_string()));
        }
        let url = normalize_url(&request.url);

        // 1. Fetch
        tracing::info!("Fetching {}", url);
        let page = self.fetcher.fetch(&url).await?;
        tracing::info!("Fetched {} bytes of HTML", page.byte_length);

        if page.byte_length > MAX_PAGE_BYTES {
            return Err(FetchError::TooLarge {
                length: page.byte_length,
                limit: MAX_PAGE_BYTES,
            }
            .into());
        }

        // 2. Prompt
        let prompt = build_prompt(&page.html, &url, request.provider);
        drop(page);

        // 3. Invoke
        if catalog::find(&request.model).is_none() {
            tracing::warn!(model = %request.model, "Model is not in the catalog, passing it through");
        }
        tracing::info!(
            "Summarizing with {} model {}",
            request.provider,
            request.model
        );
        let reply = self
            .invoke(request.provider, &prompt, &request.model)
            .await?;
        tracing::debug!(reply = %reply, "Model reply");

        // 4. Parse
        let content = parse_reply(&reply);
        tracing::info!(
            key_points = content.key_points.len(),
            "Extraction complete: {}",
            content.title
        );

        Ok(ExtractionResult::new(
            url,
            content,
            request.model,
            request.provider,
        ))
    }

    async fn invoke(
        &self,
        provider: Provider,
        prompt: &Prompt,
        model: &str,
    ) -> Result<String, ModelError> {
        match provider {
            Provider::Anthropic => self.anthropic.invoke(prompt, model).await,
            Provider::OpenAi => self.openai.invoke(prompt, model).await,
        }
    }
}

/// Object-safe handle on an extraction pipeline, for callers that must not
/// be generic over the backends (e.g. shared HTTP server state).
pub trait ExtractPipeline: Send + Sync {
    fn run(&self, request: ExtractionRequest) -> BoxFuture<'_, Result<ExtractionResult, AppError>>;
}

impl<F, A, O> ExtractPipeline for ExtractService<F, A, O>
where
    F: Fetcher,
    A: ModelBackend,
    O: ModelBackend,
{
    fn run(&self, request: ExtractionRequest) -> BoxFuture<'_, Result<ExtractionResult, AppError>> {
        Box::pin(self.extract(request))
    }
}
