// Pokedex Schema - Shared type definitions
// This crate contains the catalog rows, the API record shape and the canonical
// kind list shared between the lookup service and its binaries.

pub use catalog_data::*;
pub use pokemon_types::*;

pub mod catalog_data;
pub mod pokemon_types;
