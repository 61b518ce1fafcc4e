// In: src/lib.rs

//! Pokedex Lookup Service
//!
//! Case-insensitive lookups of creatures by name, by batch of names and by
//! kind, behind a fixed-window rate limiter, with "did you mean" suggestions
//! on every miss.

// --- MODULE DECLARATIONS ---
pub mod catalog;
pub mod config;
pub mod errors;
pub mod lookup;
pub mod rate_limit;
pub mod rpc;
pub mod suggest;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{Affiliation, Creature, Kind, PokemonRecord, PokemonType, SeedEntry};

// --- From this crate's modules (`src/`) ---

// Storage backends and population.
pub use catalog::{CatalogStore, CreatureRow, MemoryCatalog, SqliteCatalog};

// The service and its RPC surface.
pub use lookup::{LookupService, Operation};
pub use rate_limit::{Clock, ManualClock, RateLimitConfig, RateLimiter, SystemClock};
pub use rpc::{dispatch, parse_name_list, Procedure, RpcError, RpcResponse};
pub use suggest::suggest;

pub use config::PokedexConfig;

// Crate-specific error and result types.
pub use errors::{CatalogError, CatalogResult, ConfigError, LookupError, LookupResult};
