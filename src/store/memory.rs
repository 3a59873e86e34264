//! In-memory dataset store
//!
//! Substitutes for the remote service in unit tests and the CLI demo
//! path. Holds datasets and their examples in plain maps.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    documents::{DatasetSelector, ExampleRecord},
    error::{LodestarError, Result},
};

use super::{ExampleStore, ListOptions};

/// In-memory fake of the dataset service
#[derive(Debug, Default)]
pub struct InMemoryExampleStore {
    datasets: HashMap<Uuid, String>,
    examples: HashMap<Uuid, Vec<ExampleRecord>>,
}

impl InMemoryExampleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset and return its identifier
    pub fn create_dataset(&mut self, name: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.datasets.insert(id, name.into());
        self.examples.insert(id, Vec::new());
        id
    }

    /// Append an example to a dataset, in insertion order
    pub fn create_example(&mut self, record: ExampleRecord) {
        self.examples.entry(record.dataset_id).or_default().push(record);
    }
}

#[async_trait]
impl ExampleStore for InMemoryExampleStore {
    async fn resolve_dataset(&self, selector: &DatasetSelector) -> Result<Uuid> {
        if let Some(id) = selector.id {
            return self
                .datasets
                .contains_key(&id)
                .then_some(id)
                .ok_or_else(|| LodestarError::NotFound(format!("dataset {id}")));
        }

        let name = selector.name.as_deref().ok_or_else(|| {
            LodestarError::Configuration("dataset selector must set a name or an id".to_string())
        })?;

        self.datasets
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
            .ok_or_else(|| LodestarError::NotFound(format!("dataset '{name}'")))
    }

    async fn list_examples(
        &self,
        dataset_id: Uuid,
        opts: ListOptions,
    ) -> Result<Vec<ExampleRecord>> {
        let records = self
            .examples
            .get(&dataset_id)
            .ok_or_else(|| LodestarError::NotFound(format!("dataset {dataset_id}")))?;

        let limit = opts.limit.unwrap_or(records.len());
        Ok(records.iter().take(limit).cloned().collect())
    }
}
