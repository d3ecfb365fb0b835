//! Spellbooks stored as JSON documents, indexed by owner.
//!
//! Every write bumps `revision`. Ledger updates go through
//! [`SpellbookRepo::save_if_unchanged`], which only lands when nobody else
//! wrote since the read.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use grimoire_domain::{CharacterId, Spellbook, SpellbookId};

use super::{from_json, timestamp, to_json, write_error};
use crate::infrastructure::ports::{RepoError, Revisioned, SpellbookRepo};

pub struct SqliteSpellbookRepo {
    pool: SqlitePool,
}

impl SqliteSpellbookRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpellbookRepo for SqliteSpellbookRepo {
    async fn get(&self, id: SpellbookId) -> Result<Option<Spellbook>, RepoError> {
        let row = sqlx::query("SELECT spellbook_json FROM spellbooks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("spellbook.get", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("spellbook_json");
                Ok(Some(from_json(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, spellbook: &Spellbook) -> Result<(), RepoError> {
        let json = to_json(spellbook)?;

        sqlx::query(
            r#"
            INSERT INTO spellbooks (id, owner_id, name, spellbook_json, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                owner_id = excluded.owner_id,
                name = excluded.name,
                spellbook_json = excluded.spellbook_json,
                updated_at = excluded.updated_at,
                revision = spellbooks.revision + 1
            "#,
        )
        .bind(spellbook.id().to_string())
        .bind(spellbook.owner_id().to_string())
        .bind(spellbook.name().as_str())
        .bind(json)
        .bind(timestamp(spellbook.updated_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("spellbook.save", e))?;

        Ok(())
    }

    async fn get_revisioned(
        &self,
        id: SpellbookId,
    ) -> Result<Option<Revisioned<Spellbook>>, RepoError> {
        let row = sqlx::query("SELECT spellbook_json, revision FROM spellbooks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("spellbook.get_revisioned", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("spellbook_json");
                Ok(Some(Revisioned {
                    record: from_json(&json)?,
                    revision: row.get("revision"),
                }))
            }
            None => Ok(None),
        }
    }

    async fn save_if_unchanged(
        &self,
        spellbook: &Spellbook,
        revision: i64,
    ) -> Result<bool, RepoError> {
        let json = to_json(spellbook)?;

        let result = sqlx::query(
            r#"
            UPDATE spellbooks SET
                name = ?,
                spellbook_json = ?,
                updated_at = ?,
                revision = revision + 1
            WHERE id = ? AND revision = ?
            "#,
        )
        .bind(spellbook.name().as_str())
        .bind(json)
        .bind(timestamp(spellbook.updated_at()))
        .bind(spellbook.id().to_string())
        .bind(revision)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("spellbook.save_if_unchanged", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_for_owner(&self, owner_id: CharacterId) -> Result<Vec<Spellbook>, RepoError> {
        let rows = sqlx::query(
            "SELECT spellbook_json FROM spellbooks WHERE owner_id = ? ORDER BY updated_at DESC, id",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("spellbook.list_for_owner", e))?;

        rows.iter()
            .map(|row| from_json(&row.get::<String, _>("spellbook_json")))
            .collect()
    }
}
