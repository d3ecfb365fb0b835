//! Characters stored as JSON documents.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use grimoire_domain::{Character, CharacterId};

use super::{from_json, timestamp, to_json, write_error};
use crate::infrastructure::ports::{CharacterRepo, RepoError};

pub struct SqliteCharacterRepo {
    pool: SqlitePool,
}

impl SqliteCharacterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CharacterRepo for SqliteCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query("SELECT character_json FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("character.get", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("character_json");
                Ok(Some(from_json(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        let json = to_json(character)?;

        sqlx::query(
            r#"
            INSERT INTO characters (id, name, is_active, is_favorite, character_json, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                is_active = excluded.is_active,
                is_favorite = excluded.is_favorite,
                character_json = excluded.character_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(character.id().to_string())
        .bind(character.name().as_str())
        .bind(character.is_active())
        .bind(character.is_favorite())
        .bind(json)
        .bind(timestamp(character.updated_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("character.save", e))?;

        Ok(())
    }

    /// Favourites first, then most recently updated.
    async fn list_active(&self) -> Result<Vec<Character>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT character_json FROM characters
            WHERE is_active = 1
            ORDER BY is_favorite DESC, updated_at DESC, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("character.list_active", e))?;

        rows.iter()
            .map(|row| from_json(&row.get::<String, _>("character_json")))
            .collect()
    }
}
