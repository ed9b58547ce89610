/// Remove item endpoint
///
/// `DELETE /v1/items/:id`
///
/// Creator-only; an assignee can update an item but never delete it. Tag
/// associations are removed with the item (joins first, item row last).
///
/// # Errors
///
/// - 401 Unauthorized: missing or invalid bearer token
/// - 403 Forbidden: caller is not the creator
/// - 404 Not Found: item does not exist

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};
use jotdeck_shared::auth::guard::{load_authorized, AccessMode};
use jotdeck_shared::auth::middleware::CurrentUser;
use jotdeck_shared::models::item::Item;
use uuid::Uuid;

/// Remove item handler
pub async fn remove_item(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    load_authorized(&state.db, user.id, id, AccessMode::Delete).await?;

    Item::delete(&state.db, id).await?;
    tracing::info!(item_id = %id, "Item deleted");

    Ok(StatusCode::NO_CONTENT)
}
