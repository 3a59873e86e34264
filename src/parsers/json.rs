//! Generic JSON output parser
//!
//! Accepts any JSON-legal shape. `parse` is strict; `parse_partial`
//! leniently decodes a truncated document via [`repair`], for use while
//! streaming.

use serde_json::Value;

use crate::error::{LodestarError, Result};

use super::{repair::repair, strip_fences, OutputParser};

/// Parser accepting any JSON value, with lenient partial decoding
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOutputParser;

impl JsonOutputParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Best-effort decode of possibly-truncated text.
    ///
    /// Re-evaluates the full accumulated text on every call and returns
    /// the largest syntactically valid prefix, or `None` when nothing
    /// is decodable yet. Never fails for merely-incomplete input;
    /// genuinely malformed text surfaces from the final strict
    /// [`parse`](OutputParser::parse) once the stream is complete.
    pub fn parse_partial(&self, accumulated: &str) -> Option<Value> {
        let body = strip_fences(accumulated);
        let closed = repair(body)?;
        serde_json::from_str(&closed).ok()
    }
}

impl OutputParser for JsonOutputParser {
    type Output = Value;

    fn format_instructions(&self) -> String {
        "Return a JSON object.".to_string()
    }

    fn parse(&self, text: &str) -> Result<Self::Output> {
        serde_json::from_str(strip_fences(text))
            .map_err(|e| LodestarError::parse(e.to_string(), text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_accepts_any_json_shape() {
        let parser = JsonOutputParser::new();
        assert_eq!(parser.parse(r#"{"a": [1, 2]}"#).unwrap(), json!({"a": [1, 2]}));
        assert_eq!(parser.parse("[true, null]").unwrap(), json!([true, null]));
        assert_eq!(parser.parse(r#""just a string""#).unwrap(), json!("just a string"));
    }

    #[test]
    fn test_parse_tolerates_fenced_wrapper() {
        let parser = JsonOutputParser::new();
        let value = parser.parse("```json\n{\"a\": 1}\n```").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_parse_error_carries_raw_text() {
        let err = JsonOutputParser::new().parse("{oops").unwrap_err();
        match err {
            LodestarError::Parse { raw, .. } => assert_eq!(raw, "{oops"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_partial_recovers_prefix() {
        let parser = JsonOutputParser::new();
        assert_eq!(
            parser.parse_partial(r#"{"answer": "Par"#),
            Some(json!({"answer": "Par"}))
        );
        assert_eq!(
            parser.parse_partial(r#"{"answer": "Paris", "sco"#),
            Some(json!({"answer": "Paris"}))
        );
    }

    #[test]
    fn test_parse_partial_none_until_decodable() {
        let parser = JsonOutputParser::new();
        assert_eq!(parser.parse_partial(""), None);
        assert_eq!(parser.parse_partial("```js"), None);
    }

    #[test]
    fn test_parse_partial_inside_unterminated_fence() {
        let parser = JsonOutputParser::new();
        assert_eq!(
            parser.parse_partial("```json\n{\"a\": \"b"),
            Some(json!({"a": "b"}))
        );
    }
}
