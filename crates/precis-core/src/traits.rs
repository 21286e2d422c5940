use std::future::Future;

use crate::error::{FetchError, ModelError};
use crate::models::{NormalizedUrl, Provider, RawPage};
use crate::prompt::Prompt;

/// Fetches raw HTML content from a URL.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &NormalizedUrl) -> impl Future<Output = Result<RawPage, FetchError>> + Send;
}

/// A model provider that turns a prompt into reply text.
///
/// Each implementation owns its own sampling settings; callers only see
/// text in, text out.
pub trait ModelBackend: Send + Sync + Clone {
    fn provider(&self) -> Provider;

    fn invoke(
        &self,
        prompt: &Prompt,
        model: &str,
    ) -> impl Future<Output = Result<String, ModelError>> + Send;
}
