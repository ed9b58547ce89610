/// Replace item tags endpoint
///
/// `PUT /v1/items/:id/tags`
///
/// Full-replace semantics: the request's tag set becomes the item's entire
/// tag set. A caller adding one tag reads the current set first, unions
/// it, and sends the whole thing; this is the contract the tag-picker UI
/// relies on. Detached tags survive globally for reuse.
///
/// # Errors
///
/// Same as updateItem: 401, 403 (neither creator nor assignee), 404.

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use jotdeck_shared::auth::guard::{load_authorized, AccessMode};
use jotdeck_shared::auth::middleware::CurrentUser;
use jotdeck_shared::models::item_tag::ItemTag;
use serde::Deserialize;
use uuid::Uuid;

/// Replace tags request
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceTagsRequest {
    /// The item's complete new tag set (empty clears all tags)
    pub tag_ids: Vec<Uuid>,
}

/// Replace item tags handler
pub async fn replace_item_tags(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReplaceTagsRequest>,
) -> ApiResult<StatusCode> {
    load_authorized(&state.db, user.id, id, AccessMode::Update).await?;

    ItemTag::replace_for_item(&state.db, id, &request.tag_ids).await?;

    Ok(StatusCode::NO_CONTENT)
}
