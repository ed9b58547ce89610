/// Update item endpoint
///
/// `PATCH /v1/items/:id`
///
/// Sparse patch: only fields present in the request body are written, and
/// for nullable fields an explicit `null` clears the value while an absent
/// field leaves it untouched. The distinction is carried through
/// double-option deserialization.
///
/// Allowed for the creator or the assignee. `tag_ids`, when present, fully
/// replaces the item's tag set (not a merge); it is never stored as an
/// item column.
///
/// The UI also uses this endpoint to acknowledge search results, patching
/// `has_unseen_results: false` when the item is viewed.
///
/// # Errors
///
/// - 401 Unauthorized: missing or invalid bearer token
/// - 403 Forbidden: neither creator nor assignee
/// - 404 Not Found: item does not exist
/// - 422 Unprocessable Entity: validation failure

use crate::app::AppState;
use crate::error::{ApiError, ApiResult, ValidationErrorDetail};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use jotdeck_shared::auth::guard::{load_authorized, AccessMode};
use jotdeck_shared::auth::middleware::CurrentUser;
use jotdeck_shared::models::item::{Item, UpdateItem};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use validator::Validate;

/// Deserializes a field that distinguishes "absent" from "explicitly null"
///
/// Presence of the key yields `Some(inner)` where `inner` is `None` for an
/// explicit null; absence falls back to the `#[serde(default)]` of `None`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Update item request; every field optional
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateItemRequest {
    /// New title
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    /// New markdown body
    pub note: Option<String>,

    /// New due date; explicit null clears it
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New priority (1-3); explicit null clears it
    #[serde(default, deserialize_with = "double_option")]
    pub priority: Option<Option<i32>>,

    /// New assignee; explicit null clears it
    #[serde(default, deserialize_with = "double_option")]
    pub assignee_id: Option<Option<Uuid>>,

    /// New completion flag
    pub completed: Option<bool>,

    /// New search-in-flight flag; explicit null clears it
    #[serde(default, deserialize_with = "double_option")]
    pub is_searching: Option<Option<bool>>,

    /// New unseen-results flag; explicit null clears it
    #[serde(default, deserialize_with = "double_option")]
    pub has_unseen_results: Option<Option<bool>>,

    /// Full replacement tag set
    pub tag_ids: Option<Vec<Uuid>>,
}

impl UpdateItemRequest {
    fn into_update(self) -> UpdateItem {
        UpdateItem {
            title: self.title,
            note: self.note,
            due_date: self.due_date,
            priority: self.priority,
            assignee_id: self.assignee_id,
            completed: self.completed,
            is_searching: self.is_searching,
            has_unseen_results: self.has_unseen_results,
            tag_ids: self.tag_ids,
        }
    }
}

/// Update item handler
pub async fn update_item(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> ApiResult<StatusCode> {
    request.validate()?;

    // validator cannot see through the double option
    if let Some(Some(priority)) = request.priority {
        if !(1..=3).contains(&priority) {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "priority".to_string(),
                message: "priority must be between 1 and 3".to_string(),
            }]));
        }
    }

    load_authorized(&state.db, user.id, id, AccessMode::Update).await?;

    Item::update(&state.db, id, request.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("item {}", id)))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_omitted_vs_explicit_null() {
        // Omitted: leave the due date alone
        let req: UpdateItemRequest = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert!(req.due_date.is_none());

        // Explicit null: clear the due date
        let req: UpdateItemRequest = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(req.due_date, Some(None));

        // Explicit value: set the due date
        let req: UpdateItemRequest =
            serde_json::from_str(r#"{"due_date": "2025-06-01T12:00:00Z"}"#).unwrap();
        assert!(matches!(req.due_date, Some(Some(_))));
    }

    #[test]
    fn test_explicit_false_is_a_change() {
        let req: UpdateItemRequest =
            serde_json::from_str(r#"{"has_unseen_results": false}"#).unwrap();
        assert_eq!(req.has_unseen_results, Some(Some(false)));
        assert!(req.into_update().has_column_changes());
    }

    #[test]
    fn test_tag_ids_only_patch() {
        let req: UpdateItemRequest = serde_json::from_str(
            r#"{"tag_ids": ["550e8400-e29b-41d4-a716-446655440000"]}"#,
        )
        .unwrap();
        let update = req.into_update();
        assert!(!update.has_column_changes());
        assert_eq!(update.tag_ids.as_ref().map(Vec::len), Some(1));
    }
}
