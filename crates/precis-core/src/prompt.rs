use crate::models::{NormalizedUrl, Provider};

const ASSISTANT_ROLE: &str = "You are a content extraction and summarization assistant.";

const OPENAI_SYSTEM_PROMPT: &str = "You are a content extraction and summarization assistant. Extract the main content from HTML, ignoring navigation, ads, and other non-core elements.";

// The reply parser's template stage depends on this exact layout.
const RESPONSE_LAYOUT: &str = "Then generate:
1. A title for the content
2. A concise summary (2-3 sentences)
3. 3-5 key points from the content

Format your response as follows:

Title: [title]

Summary: [summary]

Key Points:
- [key point 1]
- [key point 2]
- [key point 3]";

/// A provider-ready prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Optional system message, for providers that take one separately.
    pub system: Option<String>,
    pub user: String,
}

/// Cut `html` down to at most `max_len` bytes without splitting a tag.
///
/// When truncation is needed the cut lands immediately after the last `>`
/// inside the budget; without one it falls back to a hard cut on the nearest
/// char boundary.
pub fn truncate_html(html: &str, max_len: usize) -> &str {
    if html.len() <= max_len {
        return html;
    }

    match html.as_bytes()[..max_len].iter().rposition(|&b| b == b'>') {
        Some(pos) => &html[..=pos],
        None => {
            let mut end = max_len;
            while !html.is_char_boundary(end) {
                end -= 1;
            }
            &html[..end]
        }
    }
}

/// Embed the (truncated) page in the extraction instructions for `provider`.
pub fn build_prompt(html: &str, url: &NormalizedUrl, provider: Provider) -> Prompt {
    let truncated = truncate_html(html, provider.max_html_len());
    if truncated.len() < html.len() {
        tracing::info!(
            "Truncated HTML from {} to {} bytes for {}",
            html.len(),
            truncated.len(),
            provider
        );
    }

    let page = format!(
        "Here's the HTML content from {url} (note that it may be truncated):\n\n{truncated}"
    );

    match provider {
        Provider::Anthropic => Prompt {
            system: None,
            user: format!(
                "{ASSISTANT_ROLE} Given the HTML content from a web page, extract the main content, ignoring navigation, ads, footers, etc.\n\n{RESPONSE_LAYOUT}\n\n{page}"
            ),
        },
        Provider::OpenAi => Prompt {
            system: Some(OPENAI_SYSTEM_PROMPT.to_string()),
            user: format!(
                "Given the HTML content from a web page, extract the main content.\n\n{RESPONSE_LAYOUT}\n\n{page}"
            ),
        },
    }
}
