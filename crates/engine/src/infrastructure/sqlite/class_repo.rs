//! Character classes stored as JSON documents with a unique name column.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use grimoire_domain::{CharacterClass, CharacterClassId};

use super::{from_json, timestamp, to_json, write_error};
use crate::infrastructure::ports::{ClassRepo, ClockPort, RepoError};

pub struct SqliteClassRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteClassRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl ClassRepo for SqliteClassRepo {
    async fn list(&self) -> Result<Vec<CharacterClass>, RepoError> {
        let rows = sqlx::query("SELECT class_json FROM character_classes ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("class.list", e))?;

        rows.iter()
            .map(|row| from_json(&row.get::<String, _>("class_json")))
            .collect()
    }

    async fn get(&self, id: CharacterClassId) -> Result<Option<CharacterClass>, RepoError> {
        let row = sqlx::query("SELECT class_json FROM character_classes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("class.get", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("class_json");
                Ok(Some(from_json(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, class: &CharacterClass) -> Result<(), RepoError> {
        let json = to_json(class)?;
        let now = timestamp(self.clock.now());

        sqlx::query(
            r#"
            INSERT INTO character_classes (id, name, class_json, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                class_json = excluded.class_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(class.id.to_string())
        .bind(class.name.as_str())
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("class.save", e))?;

        Ok(())
    }
}
