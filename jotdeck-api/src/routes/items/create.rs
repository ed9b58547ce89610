/// Create item endpoint
///
/// `POST /v1/items`
///
/// Creates a todo (due_date set) or a note (due_date absent) owned by the
/// authenticated user. The kind is fixed at creation: listings partition on
/// due-date presence forever after.
///
/// Passing `is_searching: true` together with an empty note performs the
/// one-time Idle → Searching transition of the search workflow as part of
/// this same atomic insert; the search worker picks the item up later and
/// the response here does not wait for it.
///
/// # Example Request
///
/// ```json
/// {
///   "title": "Buy milk",
///   "note": "",
///   "due_date": "2025-06-01T12:00:00Z",
///   "priority": 2,
///   "tag_ids": ["550e8400-e29b-41d4-a716-446655440000"]
/// }
/// ```
///
/// # Errors
///
/// - 400 Bad Request: unknown tag/assignee id
/// - 401 Unauthorized: missing or invalid bearer token
/// - 422 Unprocessable Entity: validation failure

use crate::app::AppState;
use crate::error::ApiResult;
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use jotdeck_shared::auth::middleware::CurrentUser;
use jotdeck_shared::models::item::{CreateItem, Item};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create item request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateItemRequest {
    /// Item title; also the search query when a search is requested
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Markdown body (empty allowed)
    #[serde(default)]
    pub note: String,

    /// Due date; presence makes the item a todo
    pub due_date: Option<DateTime<Utc>>,

    /// Priority level, 1-3
    #[validate(range(min = 1, max = 3))]
    pub priority: Option<i32>,

    /// Assignee user id
    pub assignee_id: Option<Uuid>,

    /// Tags to attach
    pub tag_ids: Option<Vec<Uuid>>,

    /// Start the search workflow for this item
    pub is_searching: Option<bool>,

    /// Initial unseen-results flag
    pub has_unseen_results: Option<bool>,
}

/// Create item response
#[derive(Debug, Clone, Serialize)]
pub struct CreateItemResponse {
    /// New item id
    pub id: Uuid,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Create item handler
///
/// Always stores `completed = false` regardless of input; a freshly
/// created todo is never done.
pub async fn create_item(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<CreateItemResponse>)> {
    request.validate()?;

    let item = Item::create(
        &state.db,
        CreateItem {
            title: request.title,
            note: request.note,
            creator_id: user.id,
            due_date: request.due_date,
            priority: request.priority,
            assignee_id: request.assignee_id,
            tag_ids: request.tag_ids,
            is_searching: request.is_searching,
            has_unseen_results: request.has_unseen_results,
        },
    )
    .await?;

    tracing::info!(
        item_id = %item.id,
        kind = ?item.kind(),
        searching = item.is_searching.unwrap_or(false),
        "Item created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateItemResponse {
            id: item.id,
            created_at: item.created_at,
        }),
    ))
}
