//! Fixed-schema output parser
//!
//! Validates model output against a closed set of named string fields.
//! The produced object's key set must exactly equal the declared field
//! names; no extra or missing keys, no coercion.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{LodestarError, Result};

use super::OutputParser;

/// First fenced code block, with or without a language tag
static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid fence regex"));

/// Parser for a fixed field-name → string-value schema
#[derive(Debug, Clone)]
pub struct StructuredOutputParser {
    /// Field name → human-readable description, in declaration order
    fields: IndexMap<String, String>,
}

impl StructuredOutputParser {
    /// Construct from field names and their descriptions. Declaration
    /// order is preserved and determines the order in format
    /// instructions.
    pub fn from_names_and_descriptions<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Declared field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn validate(&self, text: &str, value: Value) -> Result<IndexMap<String, String>> {
        let Value::Object(map) = value else {
            return Err(LodestarError::parse("expected a JSON object", text));
        };

        for key in map.keys() {
            if !self.fields.contains_key(key) {
                return Err(LodestarError::parse(
                    format!("undeclared key '{key}' in output"),
                    text,
                ));
            }
        }

        let mut out = IndexMap::with_capacity(self.fields.len());
        for name in self.fields.keys() {
            let value = map.get(name).ok_or_else(|| {
                LodestarError::parse(format!("missing key '{name}' in output"), text)
            })?;
            let Value::String(s) = value else {
                return Err(LodestarError::parse(
                    format!("key '{name}' must be a string"),
                    text,
                ));
            };
            out.insert(name.clone(), s.clone());
        }

        Ok(out)
    }
}

impl OutputParser for StructuredOutputParser {
    type Output = IndexMap<String, String>;

    fn format_instructions(&self) -> String {
        let mut schema = String::new();
        for (name, description) in &self.fields {
            schema.push_str(&format!("\t\"{name}\": string  // {description}\n"));
        }

        format!(
            "The output should be a markdown code snippet formatted in the following \
             schema, including the leading and trailing \"```json\" and \"```\":\n\n\
             ```json\n{{\n{schema}}}\n```"
        )
    }

    fn parse(&self, text: &str) -> Result<Self::Output> {
        let json = FENCE_RE
            .captures(text)
            .and_then(|c| c.get(1))
            .map_or_else(|| text.trim(), |m| m.as_str());

        let value: Value = serde_json::from_str(json)
            .map_err(|e| LodestarError::parse(e.to_string(), text))?;
        self.validate(text, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parser() -> StructuredOutputParser {
        StructuredOutputParser::from_names_and_descriptions([
            ("answer", "answer to the user's question"),
            ("source", "source used to answer the question"),
        ])
    }

    #[test]
    fn test_format_instructions_deterministic() {
        let a = parser().format_instructions();
        let b = parser().format_instructions();
        assert_eq!(a, b);
        assert!(a.contains("```json"));
        assert!(a.contains("\"answer\": string  // answer to the user's question"));
    }

    #[test]
    fn test_instructions_round_trip() {
        // Valid JSON matching the schema, substituted into the
        // documented fenced block, parses back to exactly those keys
        let text = "```json\n{\"answer\": \"Paris\", \"source\": \"atlas\"}\n```";
        let parsed = parser().parse(text).unwrap();
        assert_eq!(
            parsed.keys().map(String::as_str).collect::<Vec<_>>(),
            parser().field_names().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_parse_identity_on_well_formed_input() {
        let parsed = parser()
            .parse(r#"{"answer": "Paris", "source": "atlas"}"#)
            .unwrap();
        assert_eq!(parsed["answer"], "Paris");
        assert_eq!(parsed["source"], "atlas");
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let text = "Sure, here you go:\n```json\n{\"answer\": \"Paris\", \"source\": \"atlas\"}\n```\nLet me know!";
        let parsed = parser().parse(text).unwrap();
        assert_eq!(parsed["answer"], "Paris");
    }

    #[test]
    fn test_missing_key_is_parse_error() {
        let err = parser().parse(r#"{"answer": "Paris"}"#).unwrap_err();
        match err {
            LodestarError::Parse { message, raw } => {
                assert!(message.contains("missing key 'source'"));
                assert!(raw.contains("Paris"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_key_is_parse_error() {
        let err = parser()
            .parse(r#"{"answer": "Paris", "source": "atlas", "extra": "no"}"#)
            .unwrap_err();
        assert!(matches!(err, LodestarError::Parse { .. }));
    }

    #[test]
    fn test_non_string_value_is_parse_error() {
        let err = parser()
            .parse(r#"{"answer": 42, "source": "atlas"}"#)
            .unwrap_err();
        assert!(matches!(err, LodestarError::Parse { .. }));
    }

    #[test]
    fn test_invalid_json_keeps_raw_text() {
        let err = parser().parse("not json at all").unwrap_err();
        match err {
            LodestarError::Parse { raw, .. } => assert_eq!(raw, "not json at all"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
