//! Data types shared by the loader layer
//!
//! [`ExampleRecord`] mirrors the dataset service's stored unit verbatim;
//! [`Document`] is the normalized (content, metadata) shape this crate
//! hands to callers.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{LodestarError, Result};

/// A stored example as returned by the dataset service. Read-only from
/// this crate's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleRecord {
    /// Example identifier
    pub id: Uuid,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,

    /// Display name
    pub name: String,

    /// Parent dataset identifier
    pub dataset_id: Uuid,

    /// Run the example was captured from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_run_id: Option<Uuid>,

    /// Free-form metadata attached by the service
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Input mapping (string keys to string values)
    #[serde(default)]
    pub inputs: IndexMap<String, String>,

    /// Output mapping (string keys to string values)
    #[serde(default)]
    pub outputs: IndexMap<String, String>,
}

/// Normalized document: extracted content plus the full source record as
/// metadata. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text content extracted from the source example
    pub content: String,

    /// The source record, minus the extracted content field
    pub metadata: Map<String, Value>,
}

impl Document {
    /// Build a document from an example record.
    ///
    /// `content` has already been extracted; `consumed_key` names the
    /// input field it came from so it can be removed from the metadata
    /// copy of `inputs` (pass `None` when a custom formatter consumed
    /// the whole input mapping).
    pub fn from_record(record: &ExampleRecord, content: String, consumed_key: Option<&str>) -> Self {
        let mut metadata = match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };

        if let Some(key) = consumed_key {
            if let Some(Value::Object(inputs)) = metadata.get_mut("inputs") {
                inputs.remove(key);
            }
        }

        Self { content, metadata }
    }
}

/// Identifies exactly one dataset, by name or by identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetSelector {
    /// Dataset name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Dataset identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

impl DatasetSelector {
    /// Select a dataset by name
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            id: None,
        }
    }

    /// Select a dataset by identifier
    pub fn by_id(id: Uuid) -> Self {
        Self {
            name: None,
            id: Some(id),
        }
    }

    /// Check that exactly one of name/id is set.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError::Configuration`] when neither or both are
    /// supplied.
    pub fn validate(&self) -> Result<()> {
        match (&self.name, &self.id) {
            (Some(_), Some(_)) => Err(LodestarError::Configuration(
                "dataset selector must set either name or id, not both".to_string(),
            )),
            (None, None) => Err(LodestarError::Configuration(
                "dataset selector must set a name or an id".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ExampleRecord {
        let mut inputs = IndexMap::new();
        inputs.insert("question".to_string(), "What is 2 + 2?".to_string());
        inputs.insert("hint".to_string(), "arithmetic".to_string());
        let mut outputs = IndexMap::new();
        outputs.insert("answer".to_string(), "4".to_string());

        ExampleRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            modified_at: Utc::now(),
            name: "example-1".to_string(),
            dataset_id: Uuid::new_v4(),
            source_run_id: None,
            metadata: Map::new(),
            inputs,
            outputs,
        }
    }

    #[test]
    fn test_selector_validation() {
        assert!(DatasetSelector::by_name("qa").validate().is_ok());
        assert!(DatasetSelector::by_id(Uuid::new_v4()).validate().is_ok());

        let both = DatasetSelector {
            name: Some("qa".to_string()),
            id: Some(Uuid::new_v4()),
        };
        assert!(matches!(
            both.validate(),
            Err(LodestarError::Configuration(_))
        ));
        assert!(matches!(
            DatasetSelector::default().validate(),
            Err(LodestarError::Configuration(_))
        ));
    }

    #[test]
    fn test_document_removes_consumed_key() {
        let record = record();
        let doc = Document::from_record(&record, "What is 2 + 2?".to_string(), Some("question"));

        assert_eq!(doc.content, "What is 2 + 2?");
        let inputs = doc.metadata["inputs"].as_object().unwrap();
        assert!(!inputs.contains_key("question"));
        assert_eq!(inputs["hint"], "arithmetic");
        assert_eq!(doc.metadata["name"], "example-1");
    }

    #[test]
    fn test_document_keeps_all_inputs_without_consumed_key() {
        let record = record();
        let doc = Document::from_record(&record, "formatted".to_string(), None);

        let inputs = doc.metadata["inputs"].as_object().unwrap();
        assert_eq!(inputs.len(), 2);
    }
}
