use serde::{Deserialize, Serialize};

/// A cataloged creature row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub id: i64,
    pub name: String,
    pub sprite: String,
}

/// An elemental kind row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Kind {
    pub id: i64,
    pub name: String,
}

/// Link between a creature and a kind. `slot` 0 is the primary kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Affiliation {
    pub creature_id: i64,
    pub kind_id: i64,
    pub slot: u8,
}

/// The API shape returned by every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub id: i64,
    pub name: String,
    pub sprite: String,
    #[serde(alias = "types")]
    pub kinds: Vec<String>,
}

/// One creature as it appears in a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedEntry {
    pub name: String,
    pub sprite: String,
    pub types: Vec<String>,
}
