//! lodestar: dataset loading and structured output parsing for LLM pipelines
//!
//! Two independent, stateless adapters:
//!
//! - [`loaders::DatasetLoader`] wraps a remote example-store service and
//!   converts stored examples into normalized [`Document`]s.
//! - [`parsers`] turn raw model-generated text into typed structured
//!   data, incrementally while streaming if desired.
//!
//! The dataset service and the text-generation source are external
//! collaborators: persistence, retries and inference all live on their
//! side of the seam.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod cli;
pub mod documents;
pub mod error;
pub mod loaders;
pub mod parsers;
pub mod store;

// Re-exports for convenience
pub use documents::{DatasetSelector, Document, ExampleRecord};
pub use error::{LodestarError, Result};
pub use parsers::OutputParser;
