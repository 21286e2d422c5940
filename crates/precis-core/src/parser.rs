//! Turns free-form model replies into [`ExtractedContent`].
//!
//! Two decoders share the [`ReplyDecoder`] interface: [`StructuredDecoder`]
//! looks for an embedded JSON object, [`TemplateDecoder`] pattern-matches the
//! `Title:` / `Summary:` / `Key Points:` layout requested by the prompt.
//! [`parse_reply`] chains them and never fails.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::models::ExtractedContent;

/// Decodes a raw model reply, returning `None` when the reply does not fit
/// the decoder's format.
pub trait ReplyDecoder {
    fn decode(&self, reply: &str) -> Option<ExtractedContent>;
}

/// Parse a model reply, trying structured JSON first and the text template
/// second. Falls back to default content when neither matches.
pub fn parse_reply(reply: &str) -> ExtractedContent {
    if let Some(content) = StructuredDecoder.decode(reply) {
        tracing::debug!("Parsed model reply as structured JSON");
        return content;
    }

    tracing::info!("Reply is not structured JSON, parsing as template text");
    match TemplateDecoder.decode(reply) {
        Some(content) => content,
        None => {
            tracing::warn!("Model reply matched no known layout, using default content");
            ExtractedContent::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Structured stage
// ---------------------------------------------------------------------------

/// Decodes the first `{` .. last `}` span of a reply as a JSON object.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredDecoder;

#[derive(Deserialize)]
struct StructuredReply {
    title: String,
    summary: String,
    #[serde(rename = "keyPoints", alias = "key_points")]
    key_points: Vec<Value>,
}

/// String and scalar entries become key points; nulls and nested values are dropped.
fn key_point_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl ReplyDecoder for StructuredDecoder {
    fn decode(&self, reply: &str) -> Option<ExtractedContent> {
        let start = reply.find('{')?;
        let end = reply.rfind('}')?;
        if end < start {
            return None;
        }

        let parsed: StructuredReply = match serde_json::from_str(&reply[start..=end]) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Structured decode failed: {e}");
                return None;
            }
        };

        if parsed.title.trim().is_empty() || parsed.summary.trim().is_empty() {
            return None;
        }

        Some(ExtractedContent::from_parts(
            Some(parsed.title),
            Some(parsed.summary),
            parsed.key_points.into_iter().filter_map(key_point_text).collect(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Template stage
// ---------------------------------------------------------------------------

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).unwrap());
    };
}

pattern!(TITLE_LABEL, r"(?im)^[ \t#>]*title\b[ \t]*:?");
pattern!(TITLE_ENUM, r"(?m)^[ \t]*1[.)][ \t]*(?i:title\b[ \t]*:?)?");
pattern!(SUMMARY_LABEL, r"(?im)^[ \t#>]*summary\b[ \t]*:?");
pattern!(SUMMARY_ENUM, r"(?m)^[ \t]*2[.)][ \t]*(?i:summary\b[ \t]*:?)?");
pattern!(KEY_POINTS_LABEL, r"(?im)^[ \t#>]*key[ \t]+points\b[ \t]*:?");
pattern!(KEY_POINTS_ENUM, r"(?m)^[ \t]*3[.)][ \t]*(?i:key[ \t]+points\b[ \t]*:?)?");
pattern!(LABEL_AT_START, r"(?i)^[#>]*[ \t]*(?:title|summary|key[ \t]+points)\b[ \t]*:");
pattern!(NEXT_LABEL, r"(?im)\n[ \t#>]*(?:title|summary|key[ \t]+points)\b[ \t]*:");
pattern!(BLANK_LINE, r"\n[ \t]*\n");
pattern!(DIGIT_LINE, r"\n[ \t]*\d");
pattern!(POINT_MARKER, r"\n[ \t]*(?:[-•*]|\d+[.)])[ \t]*");

/// Pattern-matches the `Title:` / `Summary:` / `Key Points:` layout, also
/// accepting `1.` / `2.` / `3.` enumerators in place of the labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateDecoder;

impl ReplyDecoder for TemplateDecoder {
    fn decode(&self, reply: &str) -> Option<ExtractedContent> {
        let text = reply.replace("\r\n", "\n").replace("**", "");

        let title = find_title(&text);
        let summary = find_summary(&text);
        let key_points = find_key_points(&text);

        if title.is_none() && summary.is_none() && key_points.is_empty() {
            return None;
        }

        Some(ExtractedContent::from_parts(title, summary, key_points))
    }
}

/// Text following the first match of `label` (or `fallback`), with leading
/// whitespace removed. `None` if the section is empty or directly followed
/// by another label.
fn section<'a>(text: &'a str, label: &Regex, fallback: &Regex) -> Option<&'a str> {
    let found = label.find(text).or_else(|| fallback.find(text))?;
    let rest = text[found.end()..].trim_start();
    if rest.is_empty() || LABEL_AT_START.is_match(rest) {
        return None;
    }
    Some(rest)
}

/// Slice `text` up to the earliest match of any stop pattern.
fn cut_at_first<'a>(text: &'a str, stops: &[&Regex]) -> &'a str {
    let end = stops
        .iter()
        .filter_map(|re| re.find(text).map(|m| m.start()))
        .min()
        .unwrap_or(text.len());
    &text[..end]
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn find_title(text: &str) -> Option<String> {
    let rest = section(text, &TITLE_LABEL, &TITLE_ENUM)?;
    let line = rest.lines().next().unwrap_or_default().trim();
    (!line.is_empty()).then(|| line.to_string())
}

fn find_summary(text: &str) -> Option<String> {
    let rest = section(text, &SUMMARY_LABEL, &SUMMARY_ENUM)?;
    let body = collapse_whitespace(cut_at_first(rest, &[&BLANK_LINE, &DIGIT_LINE, &NEXT_LABEL]));
    (!body.is_empty()).then_some(body)
}

fn find_key_points(text: &str) -> Vec<String> {
    let Some(rest) = section(text, &KEY_POINTS_LABEL, &KEY_POINTS_ENUM) else {
        return Vec::new();
    };
    let body = format!("\n{}", cut_at_first(rest, &[&BLANK_LINE, &NEXT_LABEL]));

    POINT_MARKER
        .split(&body)
        .map(collapse_whitespace)
        .filter(|point| !point.is_empty())
        .collect()
}
