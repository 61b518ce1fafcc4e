use super::{check_new_creature, CatalogStore, CreatureRow};
use crate::errors::{CatalogError, CatalogResult};
use async_trait::async_trait;
use schema::{Creature, Kind};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::str::FromStr;
use tracing::debug;

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS creature (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        sprite TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS kind (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS affiliation (
        creature_id INTEGER NOT NULL REFERENCES creature(id),
        kind_id INTEGER NOT NULL REFERENCES kind(id),
        slot INTEGER NOT NULL,
        PRIMARY KEY (creature_id, kind_id)
    )
    "#,
];

const CREATURE_WITH_KINDS: &str = r#"
    SELECT c.id, c.name, c.sprite, k.id AS kind_id, k.name AS kind_name
    FROM creature c
    LEFT JOIN affiliation a ON a.creature_id = c.id
    LEFT JOIN kind k ON k.id = a.kind_id
"#;

const ORDER_BY: &str = " ORDER BY c.id, a.slot";

/// Catalog backed by a SQLite database
#[derive(Clone, Debug)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// Connects to `url`, creating the database file if it does not exist.
    ///
    /// In-memory databases live and die with their connection, so they get a
    /// single connection that is never recycled.
    pub async fn connect(url: &str) -> CatalogResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = if url.contains(":memory:") || url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };
        Ok(Self { pool })
    }

    /// Creates the catalog tables if they are missing.
    pub async fn migrate(&self) -> CatalogResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("catalog schema ready");
        Ok(())
    }
}

/// Folds joined rows (one per affiliation) into one row per creature.
fn group_rows(rows: Vec<SqliteRow>) -> CatalogResult<Vec<CreatureRow>> {
    let mut grouped: Vec<CreatureRow> = Vec::new();
    for row in rows {
        let id: i64 = row.try_get("id")?;
        if grouped.last().map(|r| r.creature.id) != Some(id) {
            grouped.push(CreatureRow {
                creature: Creature {
                    id,
                    name: row.try_get("name")?,
                    sprite: row.try_get("sprite")?,
                },
                kinds: Vec::new(),
            });
        }

        let kind_id: Option<i64> = row.try_get("kind_id")?;
        let kind_name: Option<String> = row.try_get("kind_name")?;
        if let (Some(kind_id), Some(kind_name), Some(current)) =
            (kind_id, kind_name, grouped.last_mut())
        {
            current.kinds.push(Kind {
                id: kind_id,
                name: kind_name,
            });
        }
    }
    Ok(grouped)
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn find_by_name(&self, name: &str) -> CatalogResult<Option<CreatureRow>> {
        let sql = format!("{CREATURE_WITH_KINDS} WHERE c.name = ?{ORDER_BY}");
        let rows = sqlx::query(&sql).bind(name).fetch_all(&self.pool).await?;
        Ok(group_rows(rows)?.into_iter().next())
    }

    async fn find_many_by_name(&self, names: &[String]) -> CatalogResult<Vec<CreatureRow>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let mut builder = QueryBuilder::<Sqlite>::new(CREATURE_WITH_KINDS);
        builder.push(" WHERE c.name IN (");
        let mut separated = builder.separated(", ");
        for name in names {
            separated.push_bind(name.clone());
        }
        separated.push_unseparated(")");
        builder.push(ORDER_BY);

        let rows = builder.build().fetch_all(&self.pool).await?;
        group_rows(rows)
    }

    async fn find_by_kind(&self, kind: &str) -> CatalogResult<Vec<CreatureRow>> {
        let sql = format!(
            "{CREATURE_WITH_KINDS} WHERE c.id IN (
                SELECT a2.creature_id FROM affiliation a2
                JOIN kind k2 ON k2.id = a2.kind_id
                WHERE k2.name = ?
            ){ORDER_BY}"
        );
        let rows = sqlx::query(&sql).bind(kind).fetch_all(&self.pool).await?;
        group_rows(rows)
    }

    async fn creature_names(&self) -> CatalogResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM creature ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    async fn kind_names(&self) -> CatalogResult<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM kind ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    async fn insert_creature(
        &self,
        name: &str,
        sprite: &str,
        kinds: &[String],
    ) -> CatalogResult<CreatureRow> {
        check_new_creature(name, kinds)?;
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query("INSERT INTO creature (name, sprite) VALUES (?, ?)")
            .bind(name)
            .bind(sprite)
            .execute(&mut *tx)
            .await;
        let creature_id = match inserted {
            Ok(done) => done.last_insert_rowid(),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(CatalogError::DuplicateCreature(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        let mut linked = Vec::with_capacity(kinds.len());
        for (slot, kind) in kinds.iter().enumerate() {
            sqlx::query("INSERT INTO kind (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
                .bind(kind.as_str())
                .execute(&mut *tx)
                .await?;
            let kind_id = sqlx::query_scalar::<_, i64>("SELECT id FROM kind WHERE name = ?")
                .bind(kind.as_str())
                .fetch_one(&mut *tx)
                .await?;
            sqlx::query("INSERT INTO affiliation (creature_id, kind_id, slot) VALUES (?, ?, ?)")
                .bind(creature_id)
                .bind(kind_id)
                .bind(slot as i64)
                .execute(&mut *tx)
                .await?;
            linked.push(Kind {
                id: kind_id,
                name: kind.clone(),
            });
        }

        tx.commit().await?;
        Ok(CreatureRow {
            creature: Creature {
                id: creature_id,
                name: name.to_string(),
                sprite: sprite.to_string(),
            },
            kinds: linked,
        })
    }
}
