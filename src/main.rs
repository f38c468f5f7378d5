//! `maitre`: catalog generator and single-shot tool-call runner.
//!
//! - `generate`: write a synthetic catalog to a directory
//! - `invoke`: dispatch one tool-call envelope and print the response
//! - `tools`: print the tool definitions

use clap::{Parser, Subcommand};
use maitre_core::generator::{CatalogGenerator, CatalogLayout, GeneratorSettings};
use maitre_core::storage::{LocalObjectStore, SqliteAuditLog, SqliteLedger};
use maitre_core::tools::ToolCatalog;
use maitre_core::{Catalog, Config, ToolDispatcher};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "maitre")]
#[command(about = "Restaurant reservation tools and catalog generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic restaurant catalog
    Generate {
        /// Directory where output data will be stored
        #[arg(long)]
        output_directory: PathBuf,
        /// Seed for the random number generator
        #[arg(long)]
        random_seed: Option<u64>,
        /// Number of restaurants to generate
        #[arg(long)]
        number_of_restaurants: Option<usize>,
    },
    /// Dispatch one tool-call request envelope
    Invoke {
        /// Request file; stdin when omitted
        #[arg(short, long)]
        request: Option<PathBuf>,
    },
    /// Print the tool definitions as JSON
    Tools {
        /// Print the plain-text prompt listing instead
        #[arg(long)]
        prompt: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {}", err.code(), err);
            return ExitCode::FAILURE;
        }
    };
    maitre_core::observability::init_tracing(&config.observability);

    let cli = Cli::parse();
    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {}", err.code(), err);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &Config) -> maitre_core::Result<()> {
    match command {
        Commands::Generate {
            output_directory,
            random_seed,
            number_of_restaurants,
        } => {
            let seed = random_seed.unwrap_or(config.generator.default_seed);
            let count = number_of_restaurants.unwrap_or(config.generator.default_count);

            let generated = CatalogGenerator::new(GeneratorSettings::default())?.generate(seed, count)?;
            let store = LocalObjectStore::new(&output_directory);
            generated
                .write_to(&store, &CatalogLayout::from(&config.storage))
                .await?;

            tracing::info!(
                seed,
                count,
                output = %output_directory.display(),
                "catalog generated"
            );
            Ok(())
        }

        Commands::Invoke { request } => {
            let raw = match request {
                Some(path) => tokio::fs::read(&path).await?,
                None => {
                    let mut buf = Vec::new();
                    std::io::stdin().read_to_end(&mut buf)?;
                    buf
                }
            };
            let raw: serde_json::Value = serde_json::from_slice(&raw)?;

            let store = LocalObjectStore::new(&config.storage.catalog_root);
            let catalog = Arc::new(Catalog::load(&store, &config.storage.metadata_key).await?);
            let ledger = Arc::new(SqliteLedger::open(&config.storage.ledger_path)?);
            let audit = Arc::new(SqliteAuditLog::open(&config.storage.audit_path)?);

            let dispatcher =
                ToolDispatcher::new(catalog, ledger, audit).with_query_config(&config.query);
            let response = dispatcher.dispatch_value(raw).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }

        Commands::Tools { prompt } => {
            let tools = ToolCatalog::standard();
            if prompt {
                println!("{}", tools.generate_prompt());
            } else {
                println!("{}", serde_json::to_string_pretty(&tools.list_entries())?);
            }
            Ok(())
        }
    }
}
