//! Catalog storage: creatures, kinds and the affiliations between them.
//!
//! Two backends implement [`CatalogStore`]: [`MemoryCatalog`] keeps the three
//! tables in process memory, [`SqliteCatalog`] keeps them in a SQLite
//! database through `sqlx`. Both return kinds in affiliation slot order and
//! creatures in id order.

pub mod memory;
pub mod seed;
pub mod sqlite;

pub use memory::MemoryCatalog;
pub use seed::{load_seed_file, parse_seed, populate};
pub use sqlite::SqliteCatalog;

use crate::config::PokedexConfig;
use crate::errors::{CatalogError, CatalogResult};
use async_trait::async_trait;
use schema::{Creature, Kind, PokemonRecord};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// A creature joined with its kinds, primary kind first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureRow {
    pub creature: Creature,
    pub kinds: Vec<Kind>,
}

impl CreatureRow {
    pub fn into_record(self) -> PokemonRecord {
        PokemonRecord {
            id: self.creature.id,
            name: self.creature.name,
            sprite: self.creature.sprite,
            kinds: self.kinds.into_iter().map(|kind| kind.name).collect(),
        }
    }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Exact match on the stored name.
    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<CreatureRow>>;

    /// Every creature whose name is in `names`, in id order.
    async fn find_many_by_name(&self, names: &[String]) -> CatalogResult<Vec<CreatureRow>>;

    /// Every creature affiliated with the kind called `kind`, in id order.
    async fn find_by_kind(&self, kind: &str) -> CatalogResult<Vec<CreatureRow>>;

    async fn creature_names(&self) -> CatalogResult<Vec<String>>;

    async fn kind_names(&self) -> CatalogResult<Vec<String>>;

    /// Creates a creature, upserting its kinds by name and linking them in
    /// the order given.
    async fn insert_creature(
        &self,
        name: &str,
        sprite: &str,
        kinds: &[String],
    ) -> CatalogResult<CreatureRow>;
}

/// Affiliation slots are stored as `u8`.
pub const MAX_KINDS_PER_CREATURE: usize = u8::MAX as usize + 1;

/// Rejects creature definitions that would break the affiliation invariants.
pub(crate) fn check_new_creature(name: &str, kinds: &[String]) -> CatalogResult<()> {
    if kinds.is_empty() {
        return Err(CatalogError::MissingKinds(name.to_string()));
    }
    if kinds.len() > MAX_KINDS_PER_CREATURE {
        return Err(CatalogError::TooManyKinds {
            creature: name.to_string(),
            count: kinds.len(),
            max: MAX_KINDS_PER_CREATURE,
        });
    }
    let mut seen = HashSet::new();
    for kind in kinds {
        if !seen.insert(kind.as_str()) {
            return Err(CatalogError::DuplicateAffiliation {
                creature: name.to_string(),
                kind: kind.clone(),
            });
        }
    }
    Ok(())
}

/// Opens the catalog described by `config`.
///
/// With a database URL the SQLite schema is created if needed and the
/// database is used as is; populate it with `pokedex seed`. Without one an
/// in-memory catalog is filled from the seed file.
pub async fn open(config: &PokedexConfig) -> CatalogResult<Arc<dyn CatalogStore>> {
    match &config.database_url {
        Some(url) => {
            let catalog = SqliteCatalog::connect(url).await?;
            catalog.migrate().await?;
            info!(url = %url, "using sqlite catalog");
            Ok(Arc::new(catalog))
        }
        None => {
            let catalog = MemoryCatalog::new();
            let entries = load_seed_file(&config.seed_path)?;
            let created = populate(&catalog, &entries).await?;
            info!(
                seed = %config.seed_path.display(),
                created,
                "using in-memory catalog"
            );
            Ok(Arc::new(catalog))
        }
    }
}
