//! Character class catalogue routes.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use grimoire_domain::{Ability, CharacterClass, Dice, MagicType};

use super::http::{ApiError, ValidatedJson};
use crate::app::App;
use crate::use_cases::NewClass;

pub(super) fn routes() -> Router<Arc<App>> {
    Router::new().route("/api/classes", get(list_classes).post(create_class))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub magic_type: MagicType,
    #[serde(default)]
    pub hit_die: Option<Dice>,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
}

async fn list_classes(State(app): State<Arc<App>>) -> Result<Json<Vec<CharacterClass>>, ApiError> {
    let classes = app.use_cases.class.list().await?;
    Ok(Json(classes))
}

async fn create_class(
    State(app): State<Arc<App>>,
    ValidatedJson(body): ValidatedJson<CreateClassRequest>,
) -> Result<(StatusCode, Json<CharacterClass>), ApiError> {
    let class = app
        .use_cases
        .class
        .create(NewClass {
            name: body.name,
            description: body.description,
            magic_type: body.magic_type,
            hit_die: body.hit_die,
            spellcasting_ability: body.spellcasting_ability,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(class)))
}
