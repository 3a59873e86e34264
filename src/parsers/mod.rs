//! Structured output parsers
//!
//! Parsers turn raw model-generated text into typed structured data:
//! a fixed key/value schema ([`StructuredOutputParser`]) or arbitrary
//! JSON ([`JsonOutputParser`]), with lenient partial decoding for
//! streaming ([`JsonStreamParser`]).

pub mod json;
pub mod repair;
pub mod stream;
pub mod structured;

pub use json::JsonOutputParser;
pub use repair::repair;
pub use stream::{parse_json_stream, JsonStreamParser, StreamState};
pub use structured::StructuredOutputParser;

use crate::error::Result;

/// Core trait for output parsers
///
/// Implementations are stateless: `parse` may be called concurrently
/// from any number of callers.
pub trait OutputParser {
    /// Parsed output type
    type Output;

    /// Natural-language instructions to insert into a prompt so the
    /// model emits text this parser accepts. Deterministic for a given
    /// parser configuration.
    fn format_instructions(&self) -> String;

    /// Parse a complete model output.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LodestarError::Parse`] carrying the raw text
    /// when decoding or validation fails.
    fn parse(&self, text: &str) -> Result<Self::Output>;
}

/// Strip a single fenced code block wrapper, if present.
///
/// Returns the content of the first fence when the text starts with
/// one (with or without a language tag), otherwise the trimmed text.
/// A closing fence that has not arrived yet is tolerated.
pub(crate) fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the language tag line; no newline yet means no content yet
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => "",
    };

    let body = match body.find("```") {
        Some(pos) => &body[..pos],
        None => body,
    };
    body.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences_variants() {
        assert_eq!(strip_fences(r#"{"a": 1}"#), r#"{"a": 1}"#);
        assert_eq!(strip_fences("```json\n{\"a\": 1}\n```"), r#"{"a": 1}"#);
        assert_eq!(strip_fences("```\n{\"a\": 1}\n```"), r#"{"a": 1}"#);
        // Closing fence not arrived yet
        assert_eq!(strip_fences("```json\n{\"a\": 1"), r#"{"a": 1"#);
        // Opening fence line still incomplete
        assert_eq!(strip_fences("```js"), "");
    }
}
