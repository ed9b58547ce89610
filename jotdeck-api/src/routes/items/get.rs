/// Get item endpoint
///
/// `GET /v1/items/:id`
///
/// Returns the item with its tags, readable by the creator or assignee.
/// This is the one soft-failure read path: a missing item and an item the
/// caller may not see both come back as a 200 with a `null` body, so the
/// UI renders one uniform not-found state and a prober cannot distinguish
/// "hidden" from "absent". Hard failures (database down) still surface as
/// errors.

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use jotdeck_shared::auth::guard::{load_authorized, AccessMode};
use jotdeck_shared::auth::middleware::CurrentUser;
use jotdeck_shared::models::item::{Item, ItemWithTags};
use uuid::Uuid;

/// Get item handler
pub async fn get_item(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Option<ItemWithTags>>> {
    match load_authorized(&state.db, user.id, id, AccessMode::Read).await {
        Ok(_) => {
            let item = Item::find_with_tags(&state.db, id).await?;
            Ok(Json(item))
        }
        Err(e) if e.is_soft_read_failure() => Ok(Json(None)),
        Err(e) => Err(e.into()),
    }
}
