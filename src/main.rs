//! `pokedex` command line: seed a catalog and run lookups against it.
//!
//! Configuration comes from the `POKEDEX_*` environment variables; logs go
//! to stderr, results to stdout as JSON.

use clap::{Parser, Subcommand};
use pokedex::catalog::{self, load_seed_file, populate, CatalogStore, MemoryCatalog, SqliteCatalog};
use pokedex::{parse_name_list, rpc, LookupError, LookupService, PokedexConfig, RateLimiter};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(version)]
#[command(about = "Look up Pokemon by name, by batch of names, or by type")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a RON seed file into the configured SQLite catalog
    Seed {
        /// Seed file (defaults to POKEDEX_SEED_PATH)
        path: Option<PathBuf>,
    },

    /// Look up one Pokemon by name
    Lookup { name: String },

    /// Look up several Pokemon from a comma-separated list
    LookupMany {
        /// e.g. "pikachu, eevee"
        names: String,
    },

    /// List every Pokemon of a type
    ByType { kind: String },

    /// Call a procedure by name with a JSON input, printing the response envelope
    Call {
        /// e.g. pokemon.getPokemon
        procedure: String,
        /// e.g. '"pikachu"' or '["pikachu","eevee"]'
        input: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "pokedex failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> CliResult<ExitCode> {
    let config = PokedexConfig::from_env()?;

    let code = match command {
        Commands::Seed { path } => {
            let path = path.unwrap_or_else(|| config.seed_path.clone());
            seed(&config, path).await?
        }
        Commands::Lookup { name } => {
            let service = open_service(&config).await?;
            report(service.get_by_name(&name).await)?
        }
        Commands::LookupMany { names } => {
            let service = open_service(&config).await?;
            report(service.get_many_by_name(&parse_name_list(&names)).await)?
        }
        Commands::ByType { kind } => {
            let service = open_service(&config).await?;
            report(service.get_by_kind(&kind).await)?
        }
        Commands::Call { procedure, input } => {
            let service = open_service(&config).await?;
            let response = rpc::dispatch(&service, &procedure, &input).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
            if response.is_error() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    };
    Ok(code)
}

async fn open_service(config: &PokedexConfig) -> CliResult<LookupService> {
    let store = catalog::open(config).await?;
    let service = LookupService::new(store, Arc::new(RateLimiter::new(config.rate_limit)));
    let limits = service.limiter().config();
    debug!(
        window_ms = limits.window_ms,
        max_requests = limits.max_requests,
        "lookup service ready"
    );
    Ok(service)
}

async fn seed(config: &PokedexConfig, path: PathBuf) -> CliResult<ExitCode> {
    let entries = load_seed_file(&path)?;

    let created = match &config.database_url {
        Some(url) => {
            let catalog = SqliteCatalog::connect(url).await?;
            catalog.migrate().await?;
            populate(&catalog, &entries).await?
        }
        None => {
            // Nothing to persist into; a dry run still validates every entry
            let catalog = MemoryCatalog::new();
            let created = populate(&catalog, &entries).await?;
            info!(
                count = catalog.creature_names().await?.len(),
                "POKEDEX_DATABASE_URL not set, seed checked against an in-memory catalog"
            );
            created
        }
    };

    println!("Seeded {created} Pokemon from {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn report<T: Serialize>(outcome: Result<T, LookupError>) -> CliResult<ExitCode> {
    match outcome {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("error[{}]: {err}", err.code());
            Ok(ExitCode::FAILURE)
        }
    }
}
