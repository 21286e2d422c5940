//! Maps pipeline failures to user-facing messages and HTTP status codes.
//!
//! Typed failure kinds are mapped directly. Free-text failures (provider API
//! messages, uncategorised transport errors) go through substring rules.

use crate::error::{AppError, FetchError, ModelError};

pub const OVERSIZED_MESSAGE: &str =
    "The webpage content is too large to process. Try a different URL with less content.";
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse content from the webpage";

/// A user-facing error sentence plus the HTTP status to answer with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub message: String,
    pub status: u16,
}

impl ClassifiedError {
    fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    fn unreachable(url: Option<&str>) -> Self {
        Self::new(
            format!(
                "Could not connect to {}. Please check that the URL is correct and accessible.",
                url.unwrap_or("the URL")
            ),
            400,
        )
    }

    fn oversized() -> Self {
        Self::new(OVERSIZED_MESSAGE, 400)
    }

    fn parse_failure() -> Self {
        Self::new(PARSE_FAILURE_MESSAGE, 500)
    }
}

/// Classify `error` for the caller. `url` is the normalized target, used to
/// phrase connection failures.
pub fn classify(error: &AppError, url: Option<&str>) -> ClassifiedError {
    match error {
        AppError::InvalidInput(message) => ClassifiedError::new(message.clone(), 400),
        AppError::Fetch(e) => classify_fetch(e, url),
        AppError::Model(e) => classify_model(e, url),
        AppError::SerializationError(_) => ClassifiedError::parse_failure(),
        AppError::ConfigError(message) => ClassifiedError::new(message.clone(), 500),
    }
}

fn classify_fetch(error: &FetchError, url: Option<&str>) -> ClassifiedError {
    let target = url.unwrap_or("the URL");
    match error {
        FetchError::InvalidUrl(_) | FetchError::Connect(_) | FetchError::Timeout(_) => {
            ClassifiedError::unreachable(url)
        }
        FetchError::Status { status, .. } => match *status {
            404 => ClassifiedError::new(format!("Resource not found: {error}"), 404),
            401 | 403 => ClassifiedError::new(format!("Access forbidden: {error}"), 403),
            429 => ClassifiedError::new(
                format!("Too many requests to {target}. Please try again later."),
                429,
            ),
            500..=599 => ClassifiedError::new(
                format!("The server at {target} encountered an error. Please try again later."),
                502,
            ),
            _ => ClassifiedError::new(error.to_string(), 500),
        },
        FetchError::TooLarge { .. } => ClassifiedError::oversized(),
        FetchError::Blocked(_) => ClassifiedError::new(
            format!("Access to {target} is not allowed: private or reserved address"),
            400,
        ),
        FetchError::Body(_) => ClassifiedError::parse_failure(),
        FetchError::Other(message) => classify_text(message, url),
    }
}

fn classify_model(error: &ModelError, url: Option<&str>) -> ClassifiedError {
    match error {
        ModelError::NotConfigured(provider) => ClassifiedError::new(
            format!("Provider {provider} is not configured on this server"),
            500,
        ),
        ModelError::ContextLengthExceeded(_) => ClassifiedError::oversized(),
        ModelError::MalformedResponse(_) => ClassifiedError::parse_failure(),
        ModelError::Api { .. } => classify_text(&error.to_string(), url),
        ModelError::Transport(message) => classify_text(message, url),
        _ => ClassifiedError::new(error.to_string(), 500),
    }
}

/// Substring rules for failures that only carry a message, applied in order.
pub fn classify_text(message: &str, url: Option<&str>) -> ClassifiedError {
    if message.contains("ENOTFOUND")
        || message.contains("ETIMEDOUT")
        || message.contains("connect")
        || message.contains("timed out")
    {
        ClassifiedError::unreachable(url)
    } else if message.contains("404") || message.contains("not found") {
        ClassifiedError::new(format!("Resource not found: {message}"), 404)
    } else if message.contains("403") || message.contains("forbidden") {
        ClassifiedError::new(format!("Access forbidden: {message}"), 403)
    } else if message.contains("parse") || message.contains("JSON") {
        ClassifiedError::parse_failure()
    } else if message.contains("prompt is too long") || message.contains("tokens") {
        ClassifiedError::oversized()
    } else {
        ClassifiedError::new(message, 500)
    }
}
