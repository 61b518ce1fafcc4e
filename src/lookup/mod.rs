//! The three catalog lookups behind the RPC surface.
//!
//! Every operation is admitted by the rate limiter first, then validates and
//! lowercases its input, then queries the catalog. Misses are reported as
//! `NotFound` with suggestions; catalog failures are logged here and leave
//! as a bare `Internal`.

use crate::catalog::{CatalogStore, CreatureRow};
use crate::errors::{CatalogError, LookupError, LookupResult};
use crate::rate_limit::RateLimiter;
use crate::suggest::suggest;
use schema::{PokemonRecord, PokemonType};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

pub const MIN_NAME_LENGTH: usize = 2;
pub const MAX_BATCH_SIZE: usize = 10;

/// The lookup operations; also the rate-limit keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetPokemon,
    GetPokemonArray,
    GetPokemonByType,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::GetPokemon,
        Operation::GetPokemonArray,
        Operation::GetPokemonByType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetPokemon => "getPokemon",
            Operation::GetPokemonArray => "getPokemonArray",
            Operation::GetPokemonByType => "getPokemonByType",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trims and lowercases `raw`, rejecting anything shorter than two characters.
pub fn normalize_name(raw: &str, what: &str) -> LookupResult<String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_NAME_LENGTH {
        return Err(LookupError::BadRequest(format!(
            "{what} '{trimmed}' must be at least {MIN_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_lowercase())
}

pub struct LookupService {
    store: Arc<dyn CatalogStore>,
    limiter: Arc<RateLimiter>,
    kind_candidates: Vec<String>,
}

impl LookupService {
    /// Kind suggestions default to the canonical kind list.
    pub fn new(store: Arc<dyn CatalogStore>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            store,
            limiter,
            kind_candidates: PokemonType::all_names(),
        }
    }

    pub fn with_kind_candidates(mut self, candidates: Vec<String>) -> Self {
        self.kind_candidates = candidates;
        self
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Looks up one creature by exact (case-insensitive) name.
    pub async fn get_by_name(&self, name: &str) -> LookupResult<PokemonRecord> {
        let op = Operation::GetPokemon;
        self.limiter.check(op.as_str())?;
        let name = normalize_name(name, "Pokemon name")?;

        let row = self
            .store
            .find_by_name(&name)
            .await
            .map_err(|err| internal(op, err))?;

        match row {
            Some(row) => {
                debug!(%op, name = %name, id = row.creature.id, "lookup hit");
                Ok(row.into_record())
            }
            None => {
                let known = self.known_creatures(op).await?;
                let message = describe_creature_miss(&name, &known);
                debug!(%op, name = %name, "lookup miss");
                Err(LookupError::NotFound(message))
            }
        }
    }

    /// Looks up up to `MAX_BATCH_SIZE` creatures in one catalog query.
    ///
    /// Records come back in catalog order, not input order. Any miss fails
    /// the whole batch.
    pub async fn get_many_by_name(&self, names: &[String]) -> LookupResult<Vec<PokemonRecord>> {
        let op = Operation::GetPokemonArray;
        self.limiter.check(op.as_str())?;
        if names.len() > MAX_BATCH_SIZE {
            return Err(LookupError::BadRequest(format!(
                "Too many requested: {} names given, at most {MAX_BATCH_SIZE} allowed",
                names.len()
            )));
        }

        let mut wanted: Vec<String> = Vec::with_capacity(names.len());
        for raw in names {
            let name = normalize_name(raw, "Pokemon name")?;
            if !wanted.contains(&name) {
                wanted.push(name);
            }
        }
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .store
            .find_many_by_name(&wanted)
            .await
            .map_err(|err| internal(op, err))?;

        let found: HashSet<&str> = rows.iter().map(|r| r.creature.name.as_str()).collect();
        let missing: Vec<&str> = wanted
            .iter()
            .map(String::as_str)
            .filter(|name| !found.contains(name))
            .collect();
        if !missing.is_empty() {
            let known = self.known_creatures(op).await?;
            debug!(%op, missing = ?missing, "batch lookup miss");
            return Err(LookupError::NotFound(describe_batch_miss(&missing, &known)));
        }

        debug!(%op, count = rows.len(), "batch lookup hit");
        Ok(rows.into_iter().map(CreatureRow::into_record).collect())
    }

    /// Every creature with the given kind, in catalog order.
    pub async fn get_by_kind(&self, kind: &str) -> LookupResult<Vec<PokemonRecord>> {
        let op = Operation::GetPokemonByType;
        self.limiter.check(op.as_str())?;
        let kind = normalize_name(kind, "Type name")?;

        let rows = self
            .store
            .find_by_kind(&kind)
            .await
            .map_err(|err| internal(op, err))?;

        if rows.is_empty() {
            debug!(%op, kind = %kind, "kind lookup miss");
            return Err(LookupError::NotFound(describe_kind_miss(
                &kind,
                &self.kind_candidates,
            )));
        }
        debug!(%op, kind = %kind, count = rows.len(), "kind lookup hit");
        Ok(rows.into_iter().map(CreatureRow::into_record).collect())
    }

    async fn known_creatures(&self, op: Operation) -> LookupResult<Vec<String>> {
        self.store
            .creature_names()
            .await
            .map_err(|err| internal(op, err))
    }
}

impl fmt::Debug for LookupService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupService")
            .field("limiter", &self.limiter)
            .field("kind_candidates", &self.kind_candidates.len())
            .finish_non_exhaustive()
    }
}

fn internal(op: Operation, err: CatalogError) -> LookupError {
    error!(%op, error = %err, "catalog query failed");
    LookupError::Internal
}

fn known_list(known: &[String]) -> String {
    if known.is_empty() {
        "(none)".to_string()
    } else {
        known.join(", ")
    }
}

fn describe_creature_miss(name: &str, known: &[String]) -> String {
    let suggestions = suggest(name, known);
    if suggestions.is_empty() {
        format!(
            "Pokemon '{name}' not found. Known Pokemon: {}",
            known_list(known)
        )
    } else {
        format!(
            "Pokemon '{name}' not found. Did you mean: {}?",
            suggestions.join(", ")
        )
    }
}

fn describe_batch_miss(missing: &[&str], known: &[String]) -> String {
    let mut unmatched_without_hint = false;
    let parts: Vec<String> = missing
        .iter()
        .map(|name| {
            let suggestions = suggest(name, known);
            if suggestions.is_empty() {
                unmatched_without_hint = true;
                format!("'{name}'")
            } else {
                format!("'{name}' (did you mean: {})", suggestions.join(", "))
            }
        })
        .collect();

    let mut message = format!("Pokemon not found: {}", parts.join(", "));
    if unmatched_without_hint {
        message.push_str(&format!(". Known Pokemon: {}", known_list(known)));
    }
    message
}

fn describe_kind_miss(kind: &str, candidates: &[String]) -> String {
    let suggestions: Vec<String> = suggest(kind, candidates)
        .into_iter()
        .filter(|candidate| candidate != kind)
        .collect();
    let is_known = candidates.iter().any(|candidate| candidate == kind);

    let mut message = format!("No Pokemon found with type '{kind}'.");
    if !suggestions.is_empty() {
        message.push_str(&format!(" Did you mean: {}?", suggestions.join(", ")));
    } else if !is_known {
        message.push_str(&format!(" Known types: {}", known_list(candidates)));
    }
    message
}

#[cfg(test)]
mod tests;
