//! Material component catalogue stored in typed columns.

use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use grimoire_domain::{ComponentName, GoldCost, MaterialComponent, MaterialComponentId};

use super::write_error;
use crate::infrastructure::ports::{MaterialComponentRepo, RepoError};

pub struct SqliteMaterialComponentRepo {
    pool: SqlitePool,
}

impl SqliteMaterialComponentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_component(row: &SqliteRow) -> Result<MaterialComponent, RepoError> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id).map_err(RepoError::serialization)?;
    let name: String = row.get("name");
    let name = ComponentName::new(name).map_err(RepoError::serialization)?;
    let cost = row
        .get::<Option<i64>, _>("cost_cents")
        .map(GoldCost::from_cents)
        .transpose()
        .map_err(RepoError::serialization)?;

    Ok(MaterialComponent {
        id: MaterialComponentId::from_uuid(id),
        name,
        description: row.get("description"),
        cost,
        is_consumable: row.get("is_consumable"),
        is_focus: row.get("is_focus"),
    })
}

#[async_trait]
impl MaterialComponentRepo for SqliteMaterialComponentRepo {
    async fn list(&self) -> Result<Vec<MaterialComponent>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, name, description, cost_cents, is_consumable, is_focus \
             FROM material_components ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("material_component.list", e))?;

        rows.iter().map(row_to_component).collect()
    }

    async fn get(&self, id: MaterialComponentId) -> Result<Option<MaterialComponent>, RepoError> {
        let row = sqlx::query(
            "SELECT id, name, description, cost_cents, is_consumable, is_focus \
             FROM material_components WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("material_component.get", e))?;

        row.as_ref().map(row_to_component).transpose()
    }

    async fn save(&self, component: &MaterialComponent) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO material_components
                (id, name, description, cost_cents, is_consumable, is_focus)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                cost_cents = excluded.cost_cents,
                is_consumable = excluded.is_consumable,
                is_focus = excluded.is_focus
            "#,
        )
        .bind(component.id.to_string())
        .bind(component.name.as_str())
        .bind(component.description.as_deref())
        .bind(component.cost.map(|cost| cost.cents()))
        .bind(component.is_consumable)
        .bind(component.is_focus)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("material_component.save", e))?;

        Ok(())
    }

    async fn delete(&self, id: MaterialComponentId) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM material_components WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("material_component.delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}
