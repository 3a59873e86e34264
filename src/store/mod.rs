//! Access to the external dataset service
//!
//! The service is an external collaborator: this crate only reads from
//! it, through the narrow [`ExampleStore`] seam so tests can substitute
//! an in-memory fake for the HTTP client.

pub mod memory;
pub mod remote;

pub use memory::InMemoryExampleStore;
pub use remote::{RemoteExampleStore, RemoteStoreConfig};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    documents::{DatasetSelector, ExampleRecord},
    error::Result,
};

/// Options for listing examples from a dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Maximum number of records to return (service order, no re-sorting)
    pub limit: Option<usize>,
}

/// Core trait for dataset service clients
///
/// Retries, timeouts and connection pooling are the implementation's
/// concern; callers never retry through this trait.
#[async_trait]
pub trait ExampleStore: Send + Sync {
    /// Resolve a validated selector to a dataset identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LodestarError::NotFound`] when the selector
    /// matches no dataset, or a transport error from the service.
    async fn resolve_dataset(&self, selector: &DatasetSelector) -> Result<Uuid>;

    /// Fetch example records for a dataset, up to `opts.limit`, in the
    /// order the service returns them.
    async fn list_examples(&self, dataset_id: Uuid, opts: ListOptions)
        -> Result<Vec<ExampleRecord>>;
}
