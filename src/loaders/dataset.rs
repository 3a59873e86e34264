//! Dataset loader adapter
//!
//! Wraps an [`ExampleStore`] and converts its stored examples into
//! normalized documents, in the order the service returns them.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use indexmap::IndexMap;

use crate::{
    documents::{DatasetSelector, Document, ExampleRecord},
    error::{LodestarError, Result},
    store::{ExampleStore, ListOptions},
};

use super::{DocumentLoader, DocumentStream};

/// Formats a whole input mapping into document content, replacing the
/// single-field extraction
pub type ContentFormatter = Arc<dyn Fn(&IndexMap<String, String>) -> String + Send + Sync>;

/// Configuration for [`DatasetLoader`]
#[derive(Clone)]
pub struct DatasetLoaderConfig {
    /// Which dataset to load (exactly one of name/id)
    pub selector: DatasetSelector,

    /// Input field used as document content
    pub content_key: String,

    /// Maximum number of records to load
    pub limit: Option<usize>,

    /// Custom formatter applied to the full input mapping instead of
    /// extracting `content_key`
    pub format_content: Option<ContentFormatter>,
}

impl DatasetLoaderConfig {
    /// Minimal configuration: selector plus content field
    pub fn new(selector: DatasetSelector, content_key: impl Into<String>) -> Self {
        Self {
            selector,
            content_key: content_key.into(),
            limit: None,
            format_content: None,
        }
    }
}

/// Loader over a remote example store
pub struct DatasetLoader {
    store: Arc<dyn ExampleStore>,
    config: DatasetLoaderConfig,
}

impl std::fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetLoader").finish_non_exhaustive()
    }
}

impl DatasetLoader {
    /// Create a loader, validating the dataset selector eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`LodestarError::Configuration`] when the selector sets
    /// neither or both of name/id.
    pub fn new(store: Arc<dyn ExampleStore>, config: DatasetLoaderConfig) -> Result<Self> {
        config.selector.validate()?;
        Ok(Self { store, config })
    }

    /// Project one record into a document
    fn project(&self, record: &ExampleRecord) -> Result<Document> {
        if let Some(format) = &self.config.format_content {
            let content = format(&record.inputs);
            return Ok(Document::from_record(record, content, None));
        }

        let key = self.config.content_key.as_str();
        let content = record.inputs.get(key).cloned().ok_or_else(|| {
            LodestarError::parse(
                format!("input field '{key}' missing from example {}", record.id),
                serde_json::to_string(&record.inputs).unwrap_or_default(),
            )
        })?;

        Ok(Document::from_record(record, content, Some(key)))
    }
}

#[async_trait]
impl DocumentLoader for DatasetLoader {
    async fn load(&self) -> Result<Vec<Document>> {
        self.load_lazy().collect::<Vec<_>>().await.into_iter().collect()
    }

    fn load_lazy(&self) -> DocumentStream<'_> {
        let stream = async_stream::try_stream! {
            let dataset_id = self.store.resolve_dataset(&self.config.selector).await?;

            tracing::debug!(%dataset_id, limit = ?self.config.limit, "loading examples");

            let records = self
                .store
                .list_examples(dataset_id, ListOptions { limit: self.config.limit })
                .await?;

            for record in records {
                yield self.project(&record)?;
            }
        };

        Box::pin(stream)
    }
}
