//! Document loaders
//!
//! Loaders turn external records into normalized [`Document`]s. They are
//! pure transforms: no caching, no deduplication, no background work.

pub mod dataset;

pub use dataset::{DatasetLoader, DatasetLoaderConfig};

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::{documents::Document, error::Result};

/// Lazy document stream type
pub type DocumentStream<'a> = Pin<Box<dyn Stream<Item = Result<Document>> + Send + 'a>>;

/// Core trait for document loaders
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load all documents eagerly
    async fn load(&self) -> Result<Vec<Document>>;

    /// Load documents lazily.
    ///
    /// Each call returns a fresh stream that re-issues the underlying
    /// fetch; abandoning the stream drops all held state.
    fn load_lazy(&self) -> DocumentStream<'_>;
}
