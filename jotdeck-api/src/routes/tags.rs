/// Tag endpoints
///
/// Tags are a global, deduplicated namespace; creation is idempotent by
/// name and the list endpoint feeds the tag-picker autocomplete.
///
/// # Endpoints
///
/// - `POST /v1/tags` — create-or-get by name, returns the tag id either way
/// - `GET /v1/tags` — every tag

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{extract::State, Extension, Json};
use jotdeck_shared::auth::middleware::CurrentUser;
use jotdeck_shared::models::tag::Tag;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create-or-get tag request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTagRequest {
    /// Tag name, case-sensitive exact match
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Create-or-get tag response
#[derive(Debug, Clone, Serialize)]
pub struct CreateTagResponse {
    /// Existing or newly created tag id
    pub id: Uuid,
}

/// Create-or-get tag handler
///
/// Idempotent: posting the same name twice returns the same id and leaves
/// exactly one row in storage.
pub async fn create_or_get_tag(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
    Json(request): Json<CreateTagRequest>,
) -> ApiResult<Json<CreateTagResponse>> {
    request.validate()?;

    let tag = Tag::get_or_create(&state.db, &request.name).await?;
    Ok(Json(CreateTagResponse { id: tag.id }))
}

/// List tags handler
pub async fn list_tags(
    State(state): State<AppState>,
    Extension(CurrentUser(_user)): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<Tag>>> {
    let tags = Tag::list_all(&state.db).await?;
    Ok(Json(tags))
}
