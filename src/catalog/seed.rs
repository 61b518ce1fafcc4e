//! Catalog population from a RON seed file.

use super::CatalogStore;
use crate::errors::{CatalogError, CatalogResult};
use crate::lookup::MIN_NAME_LENGTH;
use schema::{PokemonType, SeedEntry};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Reads seed entries from a RON file holding a list of
/// `(name: .., sprite: .., types: [..])` records.
pub fn load_seed_file(path: &Path) -> CatalogResult<Vec<SeedEntry>> {
    let content = fs::read_to_string(path)?;
    parse_seed(&content)
}

pub fn parse_seed(content: &str) -> CatalogResult<Vec<SeedEntry>> {
    Ok(ron::from_str(content)?)
}

/// Inserts every entry, upserting kinds by name. Stops at the first failure,
/// including a name too short to ever be looked up.
///
/// Returns the number of creatures created.
pub async fn populate(store: &dyn CatalogStore, entries: &[SeedEntry]) -> CatalogResult<usize> {
    let mut created = 0;
    for entry in entries {
        let name = entry.name.trim().to_lowercase();
        if name.chars().count() < MIN_NAME_LENGTH {
            return Err(CatalogError::Seed(format!(
                "Pokemon name '{name}' must be at least {MIN_NAME_LENGTH} characters"
            )));
        }
        let kinds: Vec<String> = entry
            .types
            .iter()
            .map(|kind| kind.trim().to_lowercase())
            .collect();

        for kind in kinds.iter().filter(|kind| !PokemonType::is_known(kind)) {
            warn!(creature = %name, kind = %kind, "seeding unrecognised kind");
        }

        let row = store.insert_creature(&name, entry.sprite.trim(), &kinds).await?;
        info!(id = row.creature.id, name = %row.creature.name, "Created");
        created += 1;
    }
    Ok(created)
}
