//! Spell catalogue routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use grimoire_domain::{Ability, AttackType, CharacterClassId, MaterialComponentId, Spell, SpellId};

use super::http::{ApiError, ValidatedJson};
use crate::app::App;
use crate::use_cases::NewSpell;

pub(super) fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/spells", get(list_spells).post(create_spell))
        .route("/api/spells/{id}", get(get_spell))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSpellRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(range(max = 9))]
    pub level: u8,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub range: String,
    #[validate(length(min = 1, max = 100))]
    pub duration: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub higher_level: String,
    #[serde(default)]
    pub verbal: bool,
    #[serde(default)]
    pub somatic: bool,
    #[serde(default)]
    pub material_components: Vec<Uuid>,
    #[serde(default)]
    pub concentration: bool,
    #[serde(default)]
    pub ritual: bool,
    #[serde(default)]
    pub attack_type: AttackType,
    #[serde(default)]
    pub saving_throw: Option<Ability>,
    #[serde(default)]
    pub available_classes: Vec<Uuid>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub source_book: String,
    #[serde(default)]
    pub page_number: Option<u32>,
}

impl From<CreateSpellRequest> for NewSpell {
    fn from(body: CreateSpellRequest) -> Self {
        Self {
            name: body.name,
            level: body.level,
            range: body.range,
            duration: body.duration,
            description: body.description,
            higher_level: body.higher_level,
            verbal: body.verbal,
            somatic: body.somatic,
            material_components: body
                .material_components
                .into_iter()
                .map(MaterialComponentId::from_uuid)
                .collect(),
            concentration: body.concentration,
            ritual: body.ritual,
            attack_type: body.attack_type,
            saving_throw: body.saving_throw,
            available_classes: body
                .available_classes
                .into_iter()
                .map(CharacterClassId::from_uuid)
                .collect(),
            source_book: body.source_book,
            page_number: body.page_number,
        }
    }
}

async fn list_spells(State(app): State<Arc<App>>) -> Result<Json<Vec<Spell>>, ApiError> {
    let spells = app.use_cases.spell.list().await?;
    Ok(Json(spells))
}

async fn create_spell(
    State(app): State<Arc<App>>,
    ValidatedJson(body): ValidatedJson<CreateSpellRequest>,
) -> Result<(StatusCode, Json<Spell>), ApiError> {
    let spell = app.use_cases.spell.create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(spell)))
}

async fn get_spell(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Spell>, ApiError> {
    let spell = app.use_cases.spell.get(SpellId::from_uuid(id)).await?;
    Ok(Json(spell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::test_support::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_list_and_fetch_spells() {
        let (_dir, router) = test_router().await;
        let diamond = expect_json(
            &router,
            "POST",
            "/api/material-components",
            Some(json!({ "name": "Diamond", "cost": 300.0, "is_consumable": true })),
            StatusCode::CREATED,
        )
        .await;

        let revivify = expect_json(
            &router,
            "POST",
            "/api/spells",
            Some(json!({
                "name": "Revivify",
                "level": 3,
                "range": "Touch",
                "duration": "Instantaneous",
                "description": "Return a creature that died within the last minute to life.",
                "verbal": true,
                "somatic": true,
                "material_components": [diamond["id"]],
                "attack_type": "AUTO"
            })),
            StatusCode::CREATED,
        )
        .await;
        assert_eq!(revivify["level"], json!(3));
        assert_eq!(revivify["attack_type"], json!("AUTO"));
        assert_eq!(revivify["is_official"], json!(true));

        expect_json(
            &router,
            "POST",
            "/api/spells",
            Some(json!({
                "name": "Light",
                "level": 0,
                "duration": "1 hour",
                "description": "An object sheds bright light."
            })),
            StatusCode::CREATED,
        )
        .await;

        let listed = expect_json(&router, "GET", "/api/spells", None, StatusCode::OK).await;
        let names: Vec<&str> = listed
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|spell| spell["name"].as_str())
            .collect();
        assert_eq!(names, vec!["Light", "Revivify"]);

        let uri = format!("/api/spells/{}", revivify["id"].as_str().expect("id"));
        let fetched = expect_json(&router, "GET", &uri, None, StatusCode::OK).await;
        assert_eq!(fetched, revivify);
    }

    #[tokio::test]
    async fn invalid_spells_are_rejected() {
        let (_dir, router) = test_router().await;
        let base = json!({
            "name": "Wish",
            "level": 9,
            "duration": "Instantaneous",
            "description": "The mightiest spell."
        });
        expect_json(&router, "POST", "/api/spells", Some(base.clone()), StatusCode::CREATED).await;

        let duplicate = send(&router, "POST", "/api/spells", Some(base.clone())).await;
        assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

        let mut too_high = base.clone();
        too_high["name"] = json!("Wish beyond wish");
        too_high["level"] = json!(10);
        let response = send(&router, "POST", "/api/spells", Some(too_high)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut dangling = base;
        dangling["name"] = json!("Phantom");
        dangling["available_classes"] = json!([Uuid::new_v4()]);
        let response = send(&router, "POST", "/api/spells", Some(dangling)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let missing = send(&router, "GET", &format!("/api/spells/{}", Uuid::new_v4()), None).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
