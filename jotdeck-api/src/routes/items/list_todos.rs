/// List todos endpoint
///
/// `GET /v1/todos?show_completed=&cursor=&page_size=`
///
/// Returns the caller's dated items filtered by completion state, newest
/// first, with tags attached per item. Paginated by an opaque cursor; the
/// response carries the next cursor and `has_more`.
///
/// Only the creator's items are listed; assignment grants access to a
/// single item, not a listing.

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use jotdeck_shared::auth::middleware::CurrentUser;
use jotdeck_shared::models::item::{Item, ItemWithTags};
use jotdeck_shared::page::{Cursor, Page, PageRequest};
use serde::Deserialize;

/// List todos query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTodosQuery {
    /// Completion state to filter on (default: pending todos)
    #[serde(default)]
    pub show_completed: bool,

    /// Opaque continuation token from a previous page
    pub cursor: Option<String>,

    /// Items per page (clamped server-side)
    pub page_size: Option<i64>,
}

/// Parses the optional cursor token from query parameters
pub(super) fn page_request(
    cursor: Option<&str>,
    page_size: Option<i64>,
) -> Result<PageRequest, ApiError> {
    let cursor = cursor
        .map(Cursor::decode)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(PageRequest { cursor, page_size })
}

/// List todos handler
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ListTodosQuery>,
) -> ApiResult<Json<Page<ItemWithTags>>> {
    let page = page_request(query.cursor.as_deref(), query.page_size)?;

    let result = Item::list_todos(&state.db, user.id, query.show_completed, &page).await?;
    Ok(Json(result))
}
