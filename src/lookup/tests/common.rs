use crate::catalog::{CatalogStore, CreatureRow, MemoryCatalog};
use crate::errors::{CatalogError, CatalogResult};
use crate::lookup::LookupService;
use crate::rate_limit::{ManualClock, RateLimitConfig, RateLimiter};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn sprite_for(name: &str) -> String {
    format!("https://sprites.test/{name}.png")
}

/// Wraps a catalog and counts every query that reaches it.
pub struct CountingCatalog {
    inner: MemoryCatalog,
    queries: AtomicUsize,
}

impl CountingCatalog {
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for CountingCatalog {
    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<CreatureRow>> {
        self.hit();
        self.inner.find_by_name(name).await
    }

    async fn find_many_by_name(&self, names: &[String]) -> CatalogResult<Vec<CreatureRow>> {
        self.hit();
        self.inner.find_many_by_name(names).await
    }

    async fn find_by_kind(&self, kind: &str) -> CatalogResult<Vec<CreatureRow>> {
        self.hit();
        self.inner.find_by_kind(kind).await
    }

    async fn creature_names(&self) -> CatalogResult<Vec<String>> {
        self.hit();
        self.inner.creature_names().await
    }

    async fn kind_names(&self) -> CatalogResult<Vec<String>> {
        self.hit();
        self.inner.kind_names().await
    }

    async fn insert_creature(
        &self,
        name: &str,
        sprite: &str,
        kinds: &[String],
    ) -> CatalogResult<CreatureRow> {
        self.inner.insert_creature(name, sprite, kinds).await
    }
}

/// A catalog whose every query fails the way a dropped database would.
pub struct FailingCatalog;

#[async_trait]
impl CatalogStore for FailingCatalog {
    async fn find_by_name(&self, _name: &str) -> CatalogResult<Option<CreatureRow>> {
        Err(CatalogError::Storage(sqlx::Error::PoolTimedOut))
    }

    async fn find_many_by_name(&self, _names: &[String]) -> CatalogResult<Vec<CreatureRow>> {
        Err(CatalogError::Storage(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_kind(&self, _kind: &str) -> CatalogResult<Vec<CreatureRow>> {
        Err(CatalogError::Storage(sqlx::Error::PoolClosed))
    }

    async fn creature_names(&self) -> CatalogResult<Vec<String>> {
        Err(CatalogError::Storage(sqlx::Error::PoolClosed))
    }

    async fn kind_names(&self) -> CatalogResult<Vec<String>> {
        Err(CatalogError::Storage(sqlx::Error::PoolClosed))
    }

    async fn insert_creature(
        &self,
        _name: &str,
        _sprite: &str,
        _kinds: &[String],
    ) -> CatalogResult<CreatureRow> {
        Err(CatalogError::Storage(sqlx::Error::PoolClosed))
    }
}

pub struct TestHarness {
    pub service: LookupService,
    pub catalog: Arc<CountingCatalog>,
    pub clock: Arc<ManualClock>,
}

/// Builder for a lookup service over an in-memory catalog and a manual clock.
pub struct TestCatalogBuilder {
    creatures: Vec<(String, Vec<String>)>,
    rate_limit: RateLimitConfig,
}

impl TestCatalogBuilder {
    pub fn new() -> Self {
        Self {
            creatures: Vec::new(),
            rate_limit: RateLimitConfig::default(),
        }
    }

    /// pikachu, raichu, charmander, vulpix, bulbasaur, gengar
    pub fn starters() -> Self {
        Self::new()
            .with_creature("pikachu", &["electric"])
            .with_creature("raichu", &["electric"])
            .with_creature("charmander", &["fire"])
            .with_creature("vulpix", &["fire"])
            .with_creature("bulbasaur", &["grass", "poison"])
            .with_creature("gengar", &["ghost", "poison"])
    }

    pub fn with_creature(mut self, name: &str, kinds: &[&str]) -> Self {
        self.creatures.push((
            name.to_string(),
            kinds.iter().map(|k| k.to_string()).collect(),
        ));
        self
    }

    pub fn with_rate_limit(mut self, max_requests: u32, window_ms: u64) -> Self {
        self.rate_limit = RateLimitConfig {
            window_ms,
            max_requests,
        };
        self
    }

    pub async fn build(self) -> TestHarness {
        let inner = MemoryCatalog::new();
        for (name, kinds) in &self.creatures {
            inner
                .insert_creature(name, &sprite_for(name), kinds)
                .await
                .expect("test creature should insert");
        }
        let catalog = Arc::new(CountingCatalog {
            inner,
            queries: AtomicUsize::new(0),
        });
        let clock = Arc::new(ManualClock::new(0));
        let limiter = Arc::new(RateLimiter::with_clock(self.rate_limit, clock.clone()));
        let service = LookupService::new(catalog.clone(), limiter);
        TestHarness {
            service,
            catalog,
            clock,
        }
    }
}

pub fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
