pub mod catalog;
pub mod classify;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod parser;
pub mod prompt;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use classify::{ClassifiedError, classify};
pub use error::{AppError, FetchError, ModelError};
pub use extract::{ExtractPipeline, ExtractService, MAX_PAGE_BYTES};
pub use models::{
    ExtractedContent, ExtractionRequest, ExtractionResult, NormalizedUrl, Provider, RawPage,
};
pub use normalize::normalize_url;
pub use parser::parse_reply;
pub use prompt::{Prompt, build_prompt, truncate_html};
pub use traits::{Fetcher, ModelBackend};
