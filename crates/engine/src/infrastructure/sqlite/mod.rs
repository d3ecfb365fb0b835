//! SQLite database implementations.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, RepoError};

mod character_repo;
mod class_repo;
mod material_component_repo;
mod spell_repo;
mod spellbook_repo;

pub use character_repo::SqliteCharacterRepo;
pub use class_repo::SqliteClassRepo;
pub use material_component_repo::SqliteMaterialComponentRepo;
pub use spell_repo::SqliteSpellRepo;
pub use spellbook_repo::SqliteSpellbookRepo;

/// Open (creating if needed) the database file at `db_path`.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .map_err(|e| RepoError::database("connect", e))
}

/// Create every table that does not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    const STATEMENTS: [&str; 7] = [
        r#"
        CREATE TABLE IF NOT EXISTS material_components (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            cost_cents INTEGER,
            is_consumable INTEGER NOT NULL DEFAULT 0,
            is_focus INTEGER NOT NULL DEFAULT 0
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS character_classes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            class_json TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS characters (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            is_active INTEGER NOT NULL,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            character_json TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS spellbooks (
            id TEXT PRIMARY KEY,
            owner_id TEXT NOT NULL,
            name TEXT NOT NULL,
            spellbook_json TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            revision INTEGER NOT NULL DEFAULT 0
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_spellbooks_owner ON spellbooks (owner_id)",
        r#"
        CREATE TABLE IF NOT EXISTS spells (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            level INTEGER NOT NULL,
            spell_json TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_characters_listing ON characters (is_active, is_favorite, updated_at)",
    ];

    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    Ok(())
}

/// Create all SQLite repositories from a pool.
pub struct SqliteRepositories {
    pub material_component: Arc<SqliteMaterialComponentRepo>,
    pub class: Arc<SqliteClassRepo>,
    pub character: Arc<SqliteCharacterRepo>,
    pub spell: Arc<SqliteSpellRepo>,
    pub spellbook: Arc<SqliteSpellbookRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            material_component: Arc::new(SqliteMaterialComponentRepo::new(pool.clone())),
            class: Arc::new(SqliteClassRepo::new(pool.clone(), clock)),
            character: Arc::new(SqliteCharacterRepo::new(pool.clone())),
            spell: Arc::new(SqliteSpellRepo::new(pool.clone())),
            spellbook: Arc::new(SqliteSpellbookRepo::new(pool)),
        }
    }

    /// Connect to `db_path`, make sure the schema exists and build every repo.
    pub async fn open(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = connect(db_path).await?;
        ensure_schema(&pool).await?;
        tracing::info!(db_path = %db_path, "SQLite database ready");
        Ok(Self::new(pool, clock))
    }
}

/// Fixed-width UTC timestamp, so text order matches time order.
pub(crate) fn timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<String, RepoError> {
    serde_json::to_string(value).map_err(RepoError::serialization)
}

pub(crate) fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, RepoError> {
    serde_json::from_str(json).map_err(RepoError::serialization)
}

/// Map a write failure, turning unique-index violations into constraint errors.
pub(crate) fn write_error(operation: &'static str, error: sqlx::Error) -> RepoError {
    if let Some(db_error) = error.as_database_error() {
        if db_error.is_unique_violation() {
            return RepoError::constraint(db_error.message());
        }
    }
    RepoError::database(operation, error)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let (_dir, pool) = test_support::temp_pool().await;
        ensure_schema(&pool).await.expect("second run");
    }

    #[test]
    fn timestamps_sort_as_text() {
        use chrono::TimeZone;
        let whole = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("time");
        let later = whole + chrono::Duration::milliseconds(500);

        assert_eq!(timestamp(whole), "2024-06-01T12:00:00.000000Z");
        assert!(timestamp(whole) < timestamp(later));
    }
}
