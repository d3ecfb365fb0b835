//! Spellbook routes and the spell-slot ledger.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use grimoire_domain::{CharacterId, SlotUse, SpellId, Spellbook, SpellbookId};

use super::http::{ApiError, ValidatedJson};
use crate::app::App;
use crate::use_cases::{NewSpellbook, SlotUseOutcome};

pub(super) fn routes() -> Router<Arc<App>> {
    Router::new()
        .route(
            "/api/characters/{id}/spellbooks",
            get(list_spellbooks).post(create_spellbook),
        )
        .route("/api/spellbooks/{id}", get(get_spellbook))
        .route("/api/spellbooks/{id}/rest", post(rest))
        .route("/api/spellbooks/{id}/slots/use", post(use_slot))
        .route("/api/spellbooks/{id}/sync", post(sync_max_slots))
        .route(
            "/api/spellbooks/{id}/spells/{spell_id}",
            put(add_spell).delete(remove_spell),
        )
}

// =============================================================================
// DTOs
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSpellbookRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_shared: bool,
}

/// Either `{"tier": n}` or `{"pact": true}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UseSlotRequest {
    #[serde(default)]
    #[validate(range(min = 1, max = 9))]
    pub tier: Option<u8>,
    #[serde(default)]
    pub pact: bool,
}

impl UseSlotRequest {
    fn slot(&self) -> Result<SlotUse, ApiError> {
        match (self.tier, self.pact) {
            (Some(_), true) => Err(ApiError::BadRequest(
                "Give either tier or pact, not both".to_string(),
            )),
            (Some(tier), false) => Ok(SlotUse::Tier(tier)),
            (None, true) => Ok(SlotUse::Pact),
            (None, false) => Err(ApiError::BadRequest(
                "tier or pact is required".to_string(),
            )),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_spellbooks(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Spellbook>>, ApiError> {
    let spellbooks = app
        .use_cases
        .spellbook
        .list_for_owner(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(spellbooks))
}

async fn create_spellbook(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<CreateSpellbookRequest>,
) -> Result<(StatusCode, Json<Spellbook>), ApiError> {
    let spellbook = app
        .use_cases
        .spellbook
        .create(
            CharacterId::from_uuid(id),
            NewSpellbook {
                name: body.name,
                description: body.description,
                is_shared: body.is_shared,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(spellbook)))
}

async fn get_spellbook(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Spellbook>, ApiError> {
    let spellbook = app
        .use_cases
        .spellbook
        .get(SpellbookId::from_uuid(id))
        .await?;
    Ok(Json(spellbook))
}

async fn rest(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Spellbook>, ApiError> {
    let spellbook = app
        .use_cases
        .spellbook
        .rest(SpellbookId::from_uuid(id))
        .await?;
    Ok(Json(spellbook))
}

async fn use_slot(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UseSlotRequest>,
) -> Result<Json<SlotUseOutcome>, ApiError> {
    let outcome = app
        .use_cases
        .spellbook
        .use_slot(SpellbookId::from_uuid(id), body.slot()?)
        .await?;
    Ok(Json(outcome))
}

async fn sync_max_slots(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Spellbook>, ApiError> {
    let spellbook = app
        .use_cases
        .spellbook
        .sync_max_slots(SpellbookId::from_uuid(id))
        .await?;
    Ok(Json(spellbook))
}

async fn add_spell(
    State(app): State<Arc<App>>,
    Path((id, spell_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Spellbook>, ApiError> {
    let spellbook = app
        .use_cases
        .spellbook
        .add_spell(SpellbookId::from_uuid(id), SpellId::from_uuid(spell_id))
        .await?;
    Ok(Json(spellbook))
}

async fn remove_spell(
    State(app): State<Arc<App>>,
    Path((id, spell_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Spellbook>, ApiError> {
    let spellbook = app
        .use_cases
        .spellbook
        .remove_spell(SpellbookId::from_uuid(id), SpellId::from_uuid(spell_id))
        .await?;
    Ok(Json(spellbook))
}
