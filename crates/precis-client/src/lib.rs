pub mod config;
pub mod fetcher;
pub mod llm;

#[cfg(test)]
mod testing;

pub use config::ClientConfig;
pub use fetcher::ReqwestFetcher;
pub use llm::{AnthropicBackend, OpenAiBackend};
