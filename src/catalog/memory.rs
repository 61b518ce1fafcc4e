use super::{check_new_creature, CatalogStore, CreatureRow, MAX_KINDS_PER_CREATURE};
use crate::errors::{CatalogError, CatalogResult};
use async_trait::async_trait;
use schema::{Affiliation, Creature, Kind};
use std::collections::HashSet;
use std::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    creatures: Vec<Creature>,
    kinds: Vec<Kind>,
    affiliations: Vec<Affiliation>,
}

impl Tables {
    fn kind_by_name(&self, name: &str) -> Option<&Kind> {
        self.kinds.iter().find(|kind| kind.name == name)
    }

    fn kind_by_id(&self, id: i64) -> Option<&Kind> {
        self.kinds.iter().find(|kind| kind.id == id)
    }

    fn row_for(&self, creature: &Creature) -> CreatureRow {
        let mut links: Vec<&Affiliation> = self
            .affiliations
            .iter()
            .filter(|link| link.creature_id == creature.id)
            .collect();
        links.sort_by_key(|link| link.slot);

        CreatureRow {
            creature: creature.clone(),
            kinds: links
                .into_iter()
                .filter_map(|link| self.kind_by_id(link.kind_id).cloned())
                .collect(),
        }
    }

    fn next_creature_id(&self) -> i64 {
        self.creatures.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }

    fn upsert_kind(&mut self, name: &str) -> i64 {
        if let Some(kind) = self.kind_by_name(name) {
            return kind.id;
        }
        let id = self.kinds.iter().map(|k| k.id).max().unwrap_or(0) + 1;
        self.kinds.push(Kind {
            id,
            name: name.to_string(),
        });
        id
    }
}

/// Catalog tables held in memory.
///
/// Ids are assigned sequentially from 1, like an autoincrement column.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<CreatureRow>> {
        let tables = self.read();
        Ok(tables
            .creatures
            .iter()
            .find(|creature| creature.name == name)
            .map(|creature| tables.row_for(creature)))
    }

    async fn find_many_by_name(&self, names: &[String]) -> CatalogResult<Vec<CreatureRow>> {
        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        let tables = self.read();
        Ok(tables
            .creatures
            .iter()
            .filter(|creature| wanted.contains(creature.name.as_str()))
            .map(|creature| tables.row_for(creature))
            .collect())
    }

    async fn find_by_kind(&self, kind: &str) -> CatalogResult<Vec<CreatureRow>> {
        let tables = self.read();
        let Some(kind_id) = tables.kind_by_name(kind).map(|k| k.id) else {
            return Ok(Vec::new());
        };
        let members: HashSet<i64> = tables
            .affiliations
            .iter()
            .filter(|link| link.kind_id == kind_id)
            .map(|link| link.creature_id)
            .collect();
        Ok(tables
            .creatures
            .iter()
            .filter(|creature| members.contains(&creature.id))
            .map(|creature| tables.row_for(creature))
            .collect())
    }

    async fn creature_names(&self) -> CatalogResult<Vec<String>> {
        Ok(self.read().creatures.iter().map(|c| c.name.clone()).collect())
    }

    async fn kind_names(&self) -> CatalogResult<Vec<String>> {
        Ok(self.read().kinds.iter().map(|k| k.name.clone()).collect())
    }

    async fn insert_creature(
        &self,
        name: &str,
        sprite: &str,
        kinds: &[String],
    ) -> CatalogResult<CreatureRow> {
        check_new_creature(name, kinds)?;
        let mut tables = self.write();
        if tables.creatures.iter().any(|creature| creature.name == name) {
            return Err(CatalogError::DuplicateCreature(name.to_string()));
        }

        let creature = Creature {
            id: tables.next_creature_id(),
            name: name.to_string(),
            sprite: sprite.to_string(),
        };
        let slots = (0..kinds.len())
            .map(u8::try_from)
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| CatalogError::TooManyKinds {
                creature: name.to_string(),
                count: kinds.len(),
                max: MAX_KINDS_PER_CREATURE,
            })?;
        for (slot, kind) in slots.into_iter().zip(kinds) {
            let kind_id = tables.upsert_kind(kind);
            tables.affiliations.push(Affiliation {
                creature_id: creature.id,
                kind_id,
                slot,
            });
        }
        tables.creatures.push(creature.clone());
        Ok(tables.row_for(&creature))
    }
}
