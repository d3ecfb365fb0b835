//! HTTP routes.

use axum::{
    extract::{FromRequest, Request},
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use validator::Validate;

use super::{
    character_routes, class_routes, material_component_routes, spell_routes, spellbook_routes,
};
use crate::app::App;
use crate::infrastructure::ports::RepoError;
use crate::use_cases::{
    CharacterError, ClassError, MaterialComponentError, SpellError, SpellbookError,
};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .merge(material_component_routes::routes())
        .merge(class_routes::routes())
        .merge(spell_routes::routes())
        .merge(character_routes::routes())
        .merge(spellbook_routes::routes())
}

async fn health() -> &'static str {
    "OK"
}

/// JSON body extractor that runs `validator` rules. Malformed bodies, wrong
/// field types and missing fields are all a 400, like failed rules.
///
/// ```rust,ignore
/// async fn create(ValidatedJson(body): ValidatedJson<CreateRequest>) -> StatusCode {
///     StatusCode::CREATED
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        body.validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(Self(body))
    }
}

// =============================================================================
// Errors
// =============================================================================

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => {
                (axum::http::StatusCode::NOT_FOUND, "Not found").into_response()
            }
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::Conflict(msg) => (axum::http::StatusCode::CONFLICT, msg).into_response(),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                )
                    .into_response()
            }
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<MaterialComponentError> for ApiError {
    fn from(e: MaterialComponentError) -> Self {
        match e {
            MaterialComponentError::NotFound(_) => ApiError::NotFound,
            MaterialComponentError::Validation(e) => ApiError::BadRequest(e.to_string()),
            MaterialComponentError::Repo(e) => e.into(),
        }
    }
}

impl From<ClassError> for ApiError {
    fn from(e: ClassError) -> Self {
        match e {
            ClassError::DuplicateName(_) => ApiError::BadRequest(e.to_string()),
            ClassError::Validation(e) => ApiError::BadRequest(e.to_string()),
            ClassError::Repo(e) => e.into(),
        }
    }
}

impl From<SpellError> for ApiError {
    fn from(e: SpellError) -> Self {
        match e {
            SpellError::NotFound(_) => ApiError::NotFound,
            SpellError::DuplicateName(_)
            | SpellError::UnknownComponent(_)
            | SpellError::UnknownClass(_) => ApiError::BadRequest(e.to_string()),
            SpellError::Validation(e) => ApiError::BadRequest(e.to_string()),
            SpellError::Repo(e) => e.into(),
        }
    }
}

impl From<CharacterError> for ApiError {
    fn from(e: CharacterError) -> Self {
        match e {
            CharacterError::NotFound(_) => ApiError::NotFound,
            CharacterError::UnknownClass(_) => ApiError::BadRequest(e.to_string()),
            CharacterError::Validation(e) => ApiError::BadRequest(e.to_string()),
            CharacterError::Repo(e) => e.into(),
        }
    }
}

impl From<SpellbookError> for ApiError {
    fn from(e: SpellbookError) -> Self {
        match e {
            SpellbookError::NotFound(_) | SpellbookError::OwnerNotFound(_) => ApiError::NotFound,
            SpellbookError::UnknownSpell(_) => ApiError::BadRequest(e.to_string()),
            SpellbookError::Conflict(_) => ApiError::Conflict(e.to_string()),
            SpellbookError::Validation(e) => ApiError::BadRequest(e.to_string()),
            SpellbookError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::app::App;
    use crate::infrastructure::sqlite::SqliteRepositories;

    /// Full router over a fresh database. Keep the `TempDir` alive.
    pub async fn test_router() -> (TempDir, axum::Router) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("routes.db");
        let clock = Arc::new(crate::infrastructure::clock::SystemClock::new());
        let repos = SqliteRepositories::open(path.to_str().expect("utf-8 path"), clock.clone())
            .await
            .expect("open database");
        let app = Arc::new(App::new(repos, clock));
        (dir, super::routes().with_state(app))
    }

    pub async fn send(
        router: &axum::Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        router.clone().oneshot(request).await.expect("response")
    }

    pub async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    pub async fn body_json(response: Response<Body>) -> Value {
        serde_json::from_str(&body_text(response).await).expect("json body")
    }

    /// Send and assert the status, returning the JSON body.
    pub async fn expect_json(
        router: &axum::Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
        status: StatusCode,
    ) -> Value {
        let response = send(router, method, uri, body).await;
        assert_eq!(response.status(), status, "{} {}", method, uri);
        body_json(response).await
    }
}
