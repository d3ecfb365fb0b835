//! Material component REST resource.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use grimoire_domain::{MaterialComponent, MaterialComponentId};

use super::http::{ApiError, ValidatedJson};
use crate::app::App;
use crate::use_cases::{MaterialComponentInput, MaterialComponentPatch};

pub(super) fn routes() -> Router<Arc<App>> {
    Router::new()
        .route(
            "/api/material-components",
            get(list_components).post(create_component),
        )
        .route(
            "/api/material-components/{id}",
            get(get_component)
                .put(replace_component)
                .patch(patch_component)
                .delete(delete_component),
        )
}

// =============================================================================
// DTOs
// =============================================================================

/// Full component body for POST and PUT.
#[derive(Debug, Deserialize, Validate)]
pub struct MaterialComponentRequest {
    #[validate(length(min = 1, max = 49))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Gold pieces
    #[serde(default)]
    #[validate(range(min = 0.0, max = 99999.99))]
    pub cost: Option<f64>,
    #[serde(default)]
    pub is_consumable: bool,
    #[serde(default)]
    pub is_focus: bool,
}

impl From<MaterialComponentRequest> for MaterialComponentInput {
    fn from(body: MaterialComponentRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            cost: body.cost,
            is_consumable: body.is_consumable,
            is_focus: body.is_focus,
        }
    }
}

/// Partial body for PATCH. `null` clears `description` or `cost`, a missing
/// key leaves it alone.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct MaterialComponentPatchRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 49))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub cost: Option<Option<f64>>,
    #[serde(default)]
    pub is_consumable: Option<bool>,
    #[serde(default)]
    pub is_focus: Option<bool>,
}

/// Marks a key that appeared in the body, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<MaterialComponentPatchRequest> for MaterialComponentPatch {
    fn from(body: MaterialComponentPatchRequest) -> Self {
        Self {
            name: body.name,
            description: body.description,
            cost: body.cost,
            is_consumable: body.is_consumable,
            is_focus: body.is_focus,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_components(
    State(app): State<Arc<App>>,
) -> Result<Json<Vec<MaterialComponent>>, ApiError> {
    let components = app.use_cases.material_component.list().await?;
    Ok(Json(components))
}

async fn create_component(
    State(app): State<Arc<App>>,
    ValidatedJson(body): ValidatedJson<MaterialComponentRequest>,
) -> Result<(StatusCode, Json<MaterialComponent>), ApiError> {
    let component = app
        .use_cases
        .material_component
        .create(body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(component)))
}

async fn get_component(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MaterialComponent>, ApiError> {
    let component = app
        .use_cases
        .material_component
        .get(MaterialComponentId::from_uuid(id))
        .await?;
    Ok(Json(component))
}

async fn replace_component(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<MaterialComponentRequest>,
) -> Result<Json<MaterialComponent>, ApiError> {
    let component = app
        .use_cases
        .material_component
        .replace(MaterialComponentId::from_uuid(id), body.into())
        .await?;
    Ok(Json(component))
}

async fn patch_component(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<MaterialComponentPatchRequest>,
) -> Result<Json<MaterialComponent>, ApiError> {
    let component = app
        .use_cases
        .material_component
        .patch(MaterialComponentId::from_uuid(id), body.into())
        .await?;
    Ok(Json(component))
}

async fn delete_component(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .material_component
        .delete(MaterialComponentId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
