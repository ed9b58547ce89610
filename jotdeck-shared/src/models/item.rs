/// Item model and database operations
///
/// Items are the single content entity of Jotdeck, doubling as todos and
/// notes: an item with a due date is a todo, an item without one is a note.
/// There is no separate type column; list queries partition strictly on
/// presence of `due_date`, and nothing in the update path re-classifies an
/// item once created.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE items (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     note TEXT NOT NULL DEFAULT '',
///     creator_id UUID NOT NULL REFERENCES users(id),
///     due_date TIMESTAMPTZ,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     priority INTEGER,
///     assignee_id UUID REFERENCES users(id),
///     is_searching BOOLEAN,
///     has_unseen_results BOOLEAN,
///     search_claimed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Search state
///
/// ```text
/// idle ──create(is_searching=true)──> searching ──> completed (note = result,
///                                        │                     has_unseen_results = true)
///                                        └────────> failed    (note = error text,
///                                                              has_unseen_results = false)
/// ```
///
/// The searching→terminal transitions are performed by the worker crate;
/// `search_claimed_at` is its claim bookkeeping and is never serialized out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::item_tag::ItemTag;
use crate::models::tag::Tag;
use crate::page::{Cursor, Page, PageRequest};

/// What an item is, derived from due-date presence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum ItemKind {
    /// Dated task with a completion flag
    Todo,

    /// Free-form markdown note
    Note,
}

/// Item record, either a todo or a note
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    /// Unique item ID
    pub id: Uuid,

    /// Title; also the query string when a search is requested
    pub title: String,

    /// Markdown body (empty string allowed)
    pub note: String,

    /// Owning user; immutable after creation
    pub creator_id: Uuid,

    /// Presence of this field is the todo/note discriminator
    pub due_date: Option<DateTime<Utc>>,

    /// Completion flag; meaningful only for todos but stored regardless
    pub completed: bool,

    /// Optional priority level (1-3), storage only
    pub priority: Option<i32>,

    /// Optional assignee, granted update-but-not-delete rights
    pub assignee_id: Option<Uuid>,

    /// True while an external search is in flight for this item
    pub is_searching: Option<bool>,

    /// True when search results were written but not yet viewed
    pub has_unseen_results: Option<bool>,

    /// Worker claim timestamp; internal, not exposed through the API
    #[serde(skip)]
    pub search_claimed_at: Option<DateTime<Utc>>,

    /// When the item was created
    pub created_at: DateTime<Utc>,

    /// When the item was last updated
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Derives the item's kind from due-date presence
    pub fn kind(&self) -> ItemKind {
        if self.due_date.is_some() {
            ItemKind::Todo
        } else {
            ItemKind::Note
        }
    }

    /// Keyset position of this item in creation-time-descending order
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.created_at, self.id)
    }
}

/// An item together with its resolved tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemWithTags {
    /// The item itself
    #[serde(flatten)]
    pub item: Item,

    /// Tags attached to the item, stale references dropped
    pub tags: Vec<Tag>,
}

/// Input for creating a new item
///
/// `completed` is intentionally absent: items are always created
/// uncompleted, regardless of caller input.
#[derive(Debug, Clone, Default)]
pub struct CreateItem {
    /// Item title (required)
    pub title: String,

    /// Markdown body
    pub note: String,

    /// Owning user
    pub creator_id: Uuid,

    /// Due date; setting this makes the item a todo
    pub due_date: Option<DateTime<Utc>>,

    /// Priority level (1-3)
    pub priority: Option<i32>,

    /// Assignee user
    pub assignee_id: Option<Uuid>,

    /// Tags to attach after insert
    pub tag_ids: Option<Vec<Uuid>>,

    /// Start the item in the searching state
    pub is_searching: Option<bool>,

    /// Initial unseen-results flag
    pub has_unseen_results: Option<bool>,
}

/// Sparse patch for updating an item
///
/// Every field distinguishes "omitted" from "explicitly set": the outer
/// `Option` is presence, and for nullable columns the inner `Option`
/// carries the new value (use `Some(None)` to clear).
///
/// `tag_ids` is not a column; when present, the current tag set is fully
/// replaced via the item_tags join table.
#[derive(Debug, Clone, Default)]
pub struct UpdateItem {
    /// New title
    pub title: Option<String>,

    /// New markdown body
    pub note: Option<String>,

    /// New due date (`Some(None)` clears it)
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New priority (`Some(None)` clears it)
    pub priority: Option<Option<i32>>,

    /// New assignee (`Some(None)` clears it)
    pub assignee_id: Option<Option<Uuid>>,

    /// New completion flag
    pub completed: Option<bool>,

    /// New search-in-flight flag
    pub is_searching: Option<Option<bool>>,

    /// New unseen-results flag
    pub has_unseen_results: Option<Option<bool>>,

    /// Full replacement tag set
    pub tag_ids: Option<Vec<Uuid>>,
}

impl UpdateItem {
    /// True when at least one item column would change
    ///
    /// `tag_ids` alone does not count: it touches the join table, not the
    /// items row.
    pub fn has_column_changes(&self) -> bool {
        self.title.is_some()
            || self.note.is_some()
            || self.due_date.is_some()
            || self.priority.is_some()
            || self.assignee_id.is_some()
            || self.completed.is_some()
            || self.is_searching.is_some()
            || self.has_unseen_results.is_some()
    }
}

const ITEM_COLUMNS: &str = "id, title, note, creator_id, due_date, completed, priority, \
     assignee_id, is_searching, has_unseen_results, search_claimed_at, created_at, updated_at";

impl Item {
    /// Creates a new item and attaches its initial tags
    ///
    /// Always inserts with `completed = false`. The insert and the tag
    /// attach run in one transaction so a created item is never observable
    /// without its requested tags.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including foreign-key failures
    /// for unknown creator/assignee/tag ids.
    pub async fn create(pool: &PgPool, data: CreateItem) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (title, note, creator_id, due_date, priority,
                               assignee_id, is_searching, has_unseen_results, completed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(&data.title)
        .bind(&data.note)
        .bind(data.creator_id)
        .bind(data.due_date)
        .bind(data.priority)
        .bind(data.assignee_id)
        .bind(data.is_searching)
        .bind(data.has_unseen_results)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(tag_ids) = &data.tag_ids {
            ItemTag::insert_all(&mut tx, item.id, tag_ids).await?;
        }

        tx.commit().await?;
        Ok(item)
    }

    /// Finds an item by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(item)
    }

    /// Applies a sparse patch to an item
    ///
    /// Only fields present in `data` are written; everything else is left
    /// untouched. When `tag_ids` is present the item's tag set is fully
    /// replaced as part of the same transaction.
    ///
    /// # Returns
    ///
    /// The updated item, or None if the item does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateItem,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let item = if data.has_column_changes() {
            // Build the UPDATE dynamically from the fields that are present
            let mut query = String::from("UPDATE items SET updated_at = NOW()");
            let mut bind_count = 1;

            if data.title.is_some() {
                bind_count += 1;
                query.push_str(&format!(", title = ${}", bind_count));
            }
            if data.note.is_some() {
                bind_count += 1;
                query.push_str(&format!(", note = ${}", bind_count));
            }
            if data.due_date.is_some() {
                bind_count += 1;
                query.push_str(&format!(", due_date = ${}", bind_count));
            }
            if data.priority.is_some() {
                bind_count += 1;
                query.push_str(&format!(", priority = ${}", bind_count));
            }
            if data.assignee_id.is_some() {
                bind_count += 1;
                query.push_str(&format!(", assignee_id = ${}", bind_count));
            }
            if data.completed.is_some() {
                bind_count += 1;
                query.push_str(&format!(", completed = ${}", bind_count));
            }
            if data.is_searching.is_some() {
                bind_count += 1;
                query.push_str(&format!(", is_searching = ${}", bind_count));
            }
            if data.has_unseen_results.is_some() {
                bind_count += 1;
                query.push_str(&format!(", has_unseen_results = ${}", bind_count));
            }

            query.push_str(&format!(" WHERE id = $1 RETURNING {ITEM_COLUMNS}"));

            let mut q = sqlx::query_as::<_, Item>(&query).bind(id);

            if let Some(title) = data.title {
                q = q.bind(title);
            }
            if let Some(note) = data.note {
                q = q.bind(note);
            }
            if let Some(due_date) = data.due_date {
                q = q.bind(due_date);
            }
            if let Some(priority) = data.priority {
                q = q.bind(priority);
            }
            if let Some(assignee_id) = data.assignee_id {
                q = q.bind(assignee_id);
            }
            if let Some(completed) = data.completed {
                q = q.bind(completed);
            }
            if let Some(is_searching) = data.is_searching {
                q = q.bind(is_searching);
            }
            if let Some(has_unseen_results) = data.has_unseen_results {
                q = q.bind(has_unseen_results);
            }

            q.fetch_optional(&mut *tx).await?
        } else {
            sqlx::query_as::<_, Item>(&format!(
                "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        };

        let Some(item) = item else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(tag_ids) = &data.tag_ids {
            ItemTag::replace_in_tx(&mut tx, item.id, tag_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(item))
    }

    /// Deletes an item and its tag associations
    ///
    /// Join rows are removed first and the item row last, inside one
    /// transaction; the reverse order could leave dangling joins if the
    /// item delete failed.
    ///
    /// # Returns
    ///
    /// True if the item existed and was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        ItemTag::delete_all_in_tx(&mut tx, id).await?;

        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Lists a creator's todos filtered by completion state
    ///
    /// Todos are items with a due date. Ordered newest first with a keyset
    /// cursor; fetches one extra row to detect whether more pages exist.
    pub async fn list_todos(
        pool: &PgPool,
        creator_id: Uuid,
        show_completed: bool,
        page: &PageRequest,
    ) -> Result<Page<ItemWithTags>, sqlx::Error> {
        let limit = page.limit();

        let mut query = format!(
            "SELECT {ITEM_COLUMNS} FROM items \
             WHERE creator_id = $1 AND due_date IS NOT NULL AND completed = $2"
        );
        if page.cursor.is_some() {
            query.push_str(" AND (created_at, id) < ($4, $5)");
        }
        query.push_str(" ORDER BY created_at DESC, id DESC LIMIT $3");

        let mut q = sqlx::query_as::<_, Item>(&query)
            .bind(creator_id)
            .bind(show_completed)
            .bind(limit + 1);
        if let Some(cursor) = &page.cursor {
            q = q.bind(cursor.created_at).bind(cursor.id);
        }

        let rows = q.fetch_all(pool).await?;
        Self::attach_tags_page(pool, rows, limit).await
    }

    /// Lists a creator's notes
    ///
    /// Notes are items without a due date. When `include_with_due_date` is
    /// true the partition filter is dropped and all of the creator's items
    /// are returned.
    pub async fn list_notes(
        pool: &PgPool,
        creator_id: Uuid,
        include_with_due_date: bool,
        page: &PageRequest,
    ) -> Result<Page<ItemWithTags>, sqlx::Error> {
        let limit = page.limit();

        let mut query = format!("SELECT {ITEM_COLUMNS} FROM items WHERE creator_id = $1");
        if !include_with_due_date {
            query.push_str(" AND due_date IS NULL");
        }
        if page.cursor.is_some() {
            query.push_str(" AND (created_at, id) < ($3, $4)");
        }
        query.push_str(" ORDER BY created_at DESC, id DESC LIMIT $2");

        let mut q = sqlx::query_as::<_, Item>(&query)
            .bind(creator_id)
            .bind(limit + 1);
        if let Some(cursor) = &page.cursor {
            q = q.bind(cursor.created_at).bind(cursor.id);
        }

        let rows = q.fetch_all(pool).await?;
        Self::attach_tags_page(pool, rows, limit).await
    }

    /// Resolves tags for a fetched listing and assembles the page
    ///
    /// Tag resolution is tolerant: a join row pointing at a tag deleted out
    /// of band is silently dropped rather than failing the whole page.
    async fn attach_tags_page(
        pool: &PgPool,
        rows: Vec<Item>,
        limit: i64,
    ) -> Result<Page<ItemWithTags>, sqlx::Error> {
        let page = Page::from_rows(rows, limit, Item::cursor);

        let mut items = Vec::with_capacity(page.items.len());
        for item in page.items {
            let tags = ItemTag::tags_for_item(pool, item.id).await?;
            items.push(ItemWithTags { item, tags });
        }

        Ok(Page {
            items,
            cursor: page.cursor,
            has_more: page.has_more,
        })
    }

    /// Fetches a single item with its tags
    pub async fn find_with_tags(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ItemWithTags>, sqlx::Error> {
        let Some(item) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let tags = ItemTag::tags_for_item(pool, item.id).await?;
        Ok(Some(ItemWithTags { item, tags }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_item(due_date: Option<DateTime<Utc>>) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            note: String::new(),
            creator_id: Uuid::new_v4(),
            due_date,
            completed: false,
            priority: None,
            assignee_id: None,
            is_searching: None,
            has_unseen_results: None,
            search_claimed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_partitions_on_due_date() {
        assert_eq!(bare_item(Some(Utc::now())).kind(), ItemKind::Todo);
        assert_eq!(bare_item(None).kind(), ItemKind::Note);
    }

    #[test]
    fn test_update_item_column_changes() {
        assert!(!UpdateItem::default().has_column_changes());

        // tag_ids alone only touches the join table
        let update = UpdateItem {
            tag_ids: Some(vec![Uuid::new_v4()]),
            ..Default::default()
        };
        assert!(!update.has_column_changes());

        // explicit set-to-empty still counts as a change
        let update = UpdateItem {
            note: Some(String::new()),
            ..Default::default()
        };
        assert!(update.has_column_changes());

        // clearing a nullable field counts too
        let update = UpdateItem {
            due_date: Some(None),
            ..Default::default()
        };
        assert!(update.has_column_changes());
    }

    #[test]
    fn test_search_claim_not_serialized() {
        let mut item = bare_item(None);
        item.search_claimed_at = Some(Utc::now());

        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("search_claimed_at").is_none());
        assert!(json.get("title").is_some());
    }
}
