use thiserror::Error;

use crate::models::Provider;

/// Failures raised while retrieving the target page.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be turned into a request.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// DNS resolution or TCP connection failed.
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The site answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The page body exceeds the size ceiling.
    #[error("Content too large: {length} bytes exceeds the {limit} byte limit")]
    TooLarge { length: usize, limit: usize },

    /// The host resolves to a private or reserved address.
    #[error("SSRF blocked: {0}")]
    Blocked(String),

    /// The response body could not be read or decoded.
    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("{0}")]
    Other(String),
}

/// Failures raised by a model provider.
#[derive(Error, Debug)]
pub enum ModelError {
    /// No API key was supplied for the provider.
    #[error("Provider {0} is not configured")]
    NotConfigured(Provider),

    #[error("Authentication with {provider} failed (HTTP {status})")]
    Authentication { provider: Provider, status: u16 },

    #[error("Rate limit exceeded by {0}")]
    RateLimited(Provider),

    /// The prompt did not fit in the model's context window.
    #[error("Context length exceeded: {0}")]
    ContextLengthExceeded(String),

    #[error("Model request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Any other error reported by the provider API.
    #[error("LLM error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered 2xx but the envelope could not be decoded.
    #[error("Failed to parse model response: {0}")]
    MalformedResponse(String),
}

/// Application-wide error type for precis.
#[derive(Error, Debug)]
pub enum AppError {
    /// The caller supplied missing or unusable input.
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Model(#[from] ModelError),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
