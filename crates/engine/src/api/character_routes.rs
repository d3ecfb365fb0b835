//! Character routes, including the derived spellcasting summary.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use grimoire_domain::{
    Ability, Alignment, Character, CharacterClassId, CharacterId, PlayerId, SubclassId,
};

use super::http::{ApiError, ValidatedJson};
use crate::app::App;
use crate::use_cases::{CharacterUpdate, NewCharacter, SpellcastingSummary};

pub(super) fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/api/characters", get(list_characters).post(create_character))
        .route(
            "/api/characters/{id}",
            get(get_character)
                .patch(update_character)
                .delete(deactivate_character),
        )
        .route("/api/characters/{id}/level-up", post(level_up))
        .route("/api/characters/{id}/spellcasting", get(get_spellcasting))
}

// =============================================================================
// DTOs
// =============================================================================

fn default_level() -> u8 {
    1
}

fn default_score() -> i32 {
    10
}

/// Create body. Ability scores are flat fields defaulting to 10.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCharacterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub player_id: Option<Uuid>,

    #[serde(default)]
    pub primary_class_id: Option<Uuid>,
    #[serde(default)]
    pub primary_subclass_id: Option<Uuid>,
    #[serde(default = "default_level")]
    #[validate(range(min = 1, max = 20))]
    pub primary_level: u8,
    #[serde(default)]
    pub secondary_class_id: Option<Uuid>,
    #[serde(default)]
    pub secondary_subclass_id: Option<Uuid>,
    #[serde(default)]
    #[validate(range(max = 19))]
    pub secondary_level: u8,
    #[serde(default)]
    #[validate(range(max = 20))]
    pub warlock_level: u8,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub race: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub subrace: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub background: String,
    #[serde(default)]
    pub alignment: Option<Alignment>,

    #[serde(default = "default_score")]
    #[validate(range(min = 1, max = 30))]
    pub strength: i32,
    #[serde(default = "default_score")]
    #[validate(range(min = 1, max = 30))]
    pub dexterity: i32,
    #[serde(default = "default_score")]
    #[validate(range(min = 1, max = 30))]
    pub constitution: i32,
    #[serde(default = "default_score")]
    #[validate(range(min = 1, max = 30))]
    pub intelligence: i32,
    #[serde(default = "default_score")]
    #[validate(range(min = 1, max = 30))]
    pub wisdom: i32,
    #[serde(default = "default_score")]
    #[validate(range(min = 1, max = 30))]
    pub charisma: i32,

    #[serde(default)]
    #[validate(range(min = 2, max = 6))]
    pub proficiency_bonus: Option<i32>,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
    #[serde(default)]
    pub armor_class: Option<i32>,
    #[serde(default)]
    pub initiative_bonus: Option<i32>,
    #[serde(default)]
    pub speed: Option<u32>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_public: bool,
}

impl From<CreateCharacterRequest> for NewCharacter {
    fn from(body: CreateCharacterRequest) -> Self {
        Self {
            name: body.name,
            player_id: body.player_id.map(PlayerId::from_uuid),
            primary_class_id: body.primary_class_id.map(CharacterClassId::from_uuid),
            primary_subclass_id: body.primary_subclass_id.map(SubclassId::from_uuid),
            primary_level: body.primary_level,
            secondary_class_id: body.secondary_class_id.map(CharacterClassId::from_uuid),
            secondary_subclass_id: body.secondary_subclass_id.map(SubclassId::from_uuid),
            secondary_level: body.secondary_level,
            warlock_level: body.warlock_level,
            race: body.race,
            subrace: body.subrace,
            background: body.background,
            alignment: body.alignment,
            ability_scores: [
                body.strength,
                body.dexterity,
                body.constitution,
                body.intelligence,
                body.wisdom,
                body.charisma,
            ],
            proficiency_bonus: body.proficiency_bonus,
            spellcasting_ability: body.spellcasting_ability,
            armor_class: body.armor_class,
            initiative_bonus: body.initiative_bonus,
            speed: body.speed,
            is_favorite: body.is_favorite,
            is_public: body.is_public,
        }
    }
}

/// Partial update body for ability scores, levels, proficiency and flags.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCharacterRequest {
    #[serde(default)]
    #[validate(range(min = 1, max = 30))]
    pub strength: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 30))]
    pub dexterity: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 30))]
    pub constitution: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 30))]
    pub intelligence: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 30))]
    pub wisdom: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, max = 30))]
    pub charisma: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 1, max = 20))]
    pub primary_level: Option<u8>,
    #[serde(default)]
    #[validate(range(max = 19))]
    pub secondary_level: Option<u8>,
    #[serde(default)]
    #[validate(range(max = 20))]
    pub warlock_level: Option<u8>,
    #[serde(default)]
    #[validate(range(min = 2, max = 6))]
    pub proficiency_bonus: Option<i32>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl From<UpdateCharacterRequest> for CharacterUpdate {
    fn from(body: UpdateCharacterRequest) -> Self {
        Self {
            ability_scores: [
                body.strength,
                body.dexterity,
                body.constitution,
                body.intelligence,
                body.wisdom,
                body.charisma,
            ],
            primary_level: body.primary_level,
            secondary_level: body.secondary_level,
            warlock_level: body.warlock_level,
            proficiency_bonus: body.proficiency_bonus,
            is_favorite: body.is_favorite,
            is_public: body.is_public,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_characters(State(app): State<Arc<App>>) -> Result<Json<Vec<Character>>, ApiError> {
    let characters = app.use_cases.character.list_active().await?;
    Ok(Json(characters))
}

async fn create_character(
    State(app): State<Arc<App>>,
    ValidatedJson(body): ValidatedJson<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    let character = app.use_cases.character.create(body.into()).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

async fn get_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Character>, ApiError> {
    let character = app
        .use_cases
        .character
        .get(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(character))
}

async fn update_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateCharacterRequest>,
) -> Result<Json<Character>, ApiError> {
    let character = app
        .use_cases
        .character
        .update(CharacterId::from_uuid(id), body.into())
        .await?;
    Ok(Json(character))
}

async fn level_up(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Character>, ApiError> {
    let character = app
        .use_cases
        .character
        .level_up(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(character))
}

async fn deactivate_character(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .character
        .deactivate(CharacterId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_spellcasting(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SpellcastingSummary>, ApiError> {
    let summary = app
        .use_cases
        .character
        .spellcasting(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(summary))
}
