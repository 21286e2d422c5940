use std::time::Duration;

use precis_core::error::{AppError, ModelError};
use precis_core::models::Provider;
use precis_core::prompt::Prompt;
use precis_core::traits::ModelBackend;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{DEFAULT_MODEL_TIMEOUT, status_error, transport_error};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1000;

/// OpenAI Chat Completions backend (provider B).
///
/// Works with any OpenAI-compatible API by pointing `base_url` elsewhere.
#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl OpenAiBackend {
    pub fn new(api_key: &str) -> Result<Self, AppError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, AppError> {
        Self::build(Some(api_key), base_url, DEFAULT_MODEL_TIMEOUT)
    }

    /// A backend without credentials; every call fails with `NotConfigured`.
    pub fn unconfigured() -> Result<Self, AppError> {
        Self::build(None, DEFAULT_BASE_URL, DEFAULT_MODEL_TIMEOUT)
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, AppError> {
        Self::build(self.api_key.as_deref(), &self.base_url, timeout)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn build(api_key: Option<&str>, base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build OpenAI client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
            timeout_secs: timeout.as_secs(),
        })
    }
}

// ---- OpenAI API types ----

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl ModelBackend for OpenAiBackend {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn invoke(&self, prompt: &Prompt, model: &str) -> Result<String, ModelError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ModelError::NotConfigured(Provider::OpenAi))?;

        let url = format!("{}/chat/completions", self.base_url);

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = prompt.system.as_deref() {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: &prompt.user,
        });

        let request = ChatRequest {
            model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();

            // The error code is more reliable than the message for overflow.
            let message = match serde_json::from_str::<ApiError>(&body) {
                Ok(ApiError { error }) => match error.code {
                    Some(code) if code == "context_length_exceeded" => {
                        format!("{code}: {}", error.message)
                    }
                    _ => error.message,
                },
                Err(_) => format!("HTTP {status_code}: {body}"),
            };

            return Err(status_error(Provider::OpenAi, status_code, message));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::MalformedResponse(e.to_string()))?;

        // A missing or null message is an empty reply, not a failure.
        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}
