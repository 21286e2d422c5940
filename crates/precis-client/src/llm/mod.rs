//! Model backends: one [`ModelBackend`](precis_core::traits::ModelBackend)
//! implementation per provider, sharing error mapping.

pub mod anthropic;
pub mod openai;

use std::time::Duration;

use precis_core::error::ModelError;
use precis_core::models::Provider;

pub use anthropic::AnthropicBackend;
pub use openai::OpenAiBackend;

/// Upper bound on a single model call unless overridden.
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);

const CONTEXT_OVERFLOW_MARKERS: &[&str] = &[
    "prompt is too long",
    "context_length_exceeded",
    "maximum context length",
    "too many tokens",
];

fn is_context_overflow(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    CONTEXT_OVERFLOW_MARKERS.iter().any(|m| lower.contains(m))
}

/// Map a non-success provider response to a [`ModelError`].
fn status_error(provider: Provider, status: u16, message: String) -> ModelError {
    match status {
        401 | 403 => ModelError::Authentication { provider, status },
        429 => ModelError::RateLimited(provider),
        400 | 413 if is_context_overflow(&message) => ModelError::ContextLengthExceeded(message),
        _ => ModelError::Api { status, message },
    }
}

fn transport_error(e: reqwest::Error, timeout_secs: u64) -> ModelError {
    if e.is_timeout() {
        ModelError::Timeout(timeout_secs)
    } else {
        ModelError::Transport(e.to_string())
    }
}
