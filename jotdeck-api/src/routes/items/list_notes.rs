/// List notes endpoint
///
/// `GET /v1/notes?include_with_due_date=&cursor=&page_size=`
///
/// Returns the caller's undated items, newest first, with tags attached.
/// With `include_with_due_date=true` the due-date filter is lifted and
/// every item the caller created comes back regardless of kind.

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use jotdeck_shared::auth::middleware::CurrentUser;
use jotdeck_shared::models::item::{Item, ItemWithTags};
use jotdeck_shared::page::Page;
use serde::Deserialize;

use super::list_todos::page_request;

/// List notes query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotesQuery {
    /// When true, dated items are listed alongside notes
    #[serde(default)]
    pub include_with_due_date: bool,

    /// Opaque continuation token from a previous page
    pub cursor: Option<String>,

    /// Items per page (clamped server-side)
    pub page_size: Option<i64>,
}

/// List notes handler
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<ListNotesQuery>,
) -> ApiResult<Json<Page<ItemWithTags>>> {
    let page = page_request(query.cursor.as_deref(), query.page_size)?;

    let result =
        Item::list_notes(&state.db, user.id, query.include_with_due_date, &page).await?;
    Ok(Json(result))
}
