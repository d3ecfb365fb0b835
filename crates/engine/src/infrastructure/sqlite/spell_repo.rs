//! Spell catalogue stored as JSON documents with a unique name column.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use grimoire_domain::{Spell, SpellId};

use super::{from_json, timestamp, to_json, write_error};
use crate::infrastructure::ports::{RepoError, SpellRepo};

pub struct SqliteSpellRepo {
    pool: SqlitePool,
}

impl SqliteSpellRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SpellRepo for SqliteSpellRepo {
    /// Cantrips first, then by level and name.
    async fn list(&self) -> Result<Vec<Spell>, RepoError> {
        let rows = sqlx::query("SELECT spell_json FROM spells ORDER BY level, name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("spell.list", e))?;

        rows.iter()
            .map(|row| from_json(&row.get::<String, _>("spell_json")))
            .collect()
    }

    async fn get(&self, id: SpellId) -> Result<Option<Spell>, RepoError> {
        let row = sqlx::query("SELECT spell_json FROM spells WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("spell.get", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("spell_json");
                Ok(Some(from_json(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, spell: &Spell) -> Result<(), RepoError> {
        let json = to_json(spell)?;

        sqlx::query(
            r#"
            INSERT INTO spells (id, name, level, spell_json, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                level = excluded.level,
                spell_json = excluded.spell_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(spell.id.to_string())
        .bind(spell.name.as_str())
        .bind(i64::from(spell.level.value()))
        .bind(json)
        .bind(timestamp(spell.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("spell.save", e))?;

        Ok(())
    }
}
