//! lodestar binary entry point

use std::io::Read;
use std::sync::Arc;

use color_eyre::Result;
use futures::StreamExt;

use lodestar::{
    cli::{parse_schema_pairs, Cli, Commands},
    loaders::{DatasetLoader, DatasetLoaderConfig, DocumentLoader},
    parsers::{JsonOutputParser, OutputParser, StructuredOutputParser},
    store::{RemoteExampleStore, RemoteStoreConfig},
    DatasetSelector,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Install error handler
    color_eyre::install()?;
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("lodestar=debug")
            .init();
    }

    match cli.command {
        Commands::Load {
            name,
            id,
            content_key,
            limit,
            base_url,
            api_key,
        } => {
            let store = RemoteExampleStore::new(RemoteStoreConfig { api_key, base_url })?;
            let selector = DatasetSelector { name, id };

            let mut config = DatasetLoaderConfig::new(selector, content_key);
            config.limit = limit;

            let loader = DatasetLoader::new(Arc::new(store), config)?;
            let mut documents = loader.load_lazy();
            while let Some(document) = documents.next().await {
                println!("{}", serde_json::to_string(&document?)?);
            }
        }
        Commands::Parse { schema } => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;

            if schema.is_empty() {
                let value = JsonOutputParser::new().parse(&text)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let parser =
                    StructuredOutputParser::from_names_and_descriptions(parse_schema_pairs(&schema)?);
                let parsed = parser.parse(&text)?;
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            }
        }
        Commands::Instructions { schema } => {
            let parser =
                StructuredOutputParser::from_names_and_descriptions(parse_schema_pairs(&schema)?);
            println!("{}", parser.format_instructions());
        }
    }

    Ok(())
}
