//! CLI argument parsing and command routing

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::error::{LodestarError, Result};

/// lodestar: dataset loading and structured output parsing for LLM pipelines
#[derive(Debug, Parser)]
#[command(name = "lodestar")]
#[command(about = "Dataset loading and structured output parsing", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load a dataset and print normalized documents as JSON lines
    Load {
        /// Dataset name (mutually exclusive with --id)
        #[arg(long)]
        name: Option<String>,

        /// Dataset identifier (mutually exclusive with --name)
        #[arg(long)]
        id: Option<Uuid>,

        /// Input field to use as document content
        #[arg(long, default_value = "question")]
        content_key: String,

        /// Maximum number of records to load
        #[arg(long)]
        limit: Option<usize>,

        /// Service base URL override
        #[arg(long)]
        base_url: Option<String>,

        /// API key (falls back to LODESTAR_API_KEY)
        #[arg(long, env = "LODESTAR_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Parse model output from stdin
    Parse {
        /// Schema fields as name=description pairs; omit for generic JSON
        #[arg(long, value_name = "NAME=DESCRIPTION")]
        schema: Vec<String>,
    },

    /// Print format instructions for a schema
    Instructions {
        /// Schema fields as name=description pairs
        #[arg(long, value_name = "NAME=DESCRIPTION", required = true)]
        schema: Vec<String>,
    },
}

impl Cli {
    /// Parse CLI arguments from environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Split `name=description` schema arguments into pairs
pub fn parse_schema_pairs(pairs: &[String]) -> Result<Vec<(String, String)>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(name, description)| (name.to_string(), description.to_string()))
                .ok_or_else(|| {
                    LodestarError::Configuration(format!(
                        "schema field '{pair}' must be name=description"
                    ))
                })
        })
        .collect()
}
