//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit and integration tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::{FetchError, ModelError};
use crate::models::{NormalizedUrl, Provider, RawPage};
use crate::prompt::Prompt;
use crate::traits::{Fetcher, ModelBackend};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// Mock fetcher that returns queued pages and records requested URLs.
#[derive(Clone)]
pub struct MockFetcher {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns a small default page.
    responses: Arc<Mutex<Vec<Result<RawPage, FetchError>>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new(html: &str) -> Self {
        Self::with_responses(vec![Ok(RawPage::new(html))])
    }

    pub fn with_error(error: FetchError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<RawPage, FetchError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// URLs passed to `fetch`, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &NormalizedUrl) -> Result<RawPage, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(RawPage::new("<html><body>default</body></html>"))
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockBackend
// ---------------------------------------------------------------------------

/// A recorded `invoke` call.
#[derive(Debug, Clone)]
pub struct BackendCall {
    pub prompt: Prompt,
    pub model: String,
}

/// Mock model backend that returns queued replies and records every call.
#[derive(Clone)]
pub struct MockBackend {
    provider: Provider,
    responses: Arc<Mutex<Vec<Result<String, ModelError>>>>,
    calls: Arc<Mutex<Vec<BackendCall>>>,
}

impl MockBackend {
    pub fn new(provider: Provider, reply: &str) -> Self {
        Self::with_responses(provider, vec![Ok(reply.to_string())])
    }

    pub fn with_error(provider: Provider, error: ModelError) -> Self {
        Self::with_responses(provider, vec![Err(error)])
    }

    pub fn with_responses(provider: Provider, responses: Vec<Result<String, ModelError>>) -> Self {
        Self {
            provider,
            responses: Arc::new(Mutex::new(responses)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A backend that must not be reached; every call fails and is recorded.
    pub fn unused(provider: Provider) -> Self {
        Self::with_responses(provider, Vec::new())
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ModelBackend for MockBackend {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn invoke(&self, prompt: &Prompt, model: &str) -> Result<String, ModelError> {
        self.calls.lock().unwrap().push(BackendCall {
            prompt: prompt.clone(),
            model: model.to_string(),
        });
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(ModelError::Transport(format!(
                "unexpected call to {} mock backend",
                self.provider
            )))
        } else {
            responses.remove(0)
        }
    }
}
