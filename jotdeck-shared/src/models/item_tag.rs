/// Item-tag association management
///
/// Many-to-many linkage between items and tags with full-replace update
/// semantics: callers wanting to add a single tag read the current set,
/// union it, and replace with the full set. The replace runs delete-then-
/// insert inside one transaction, so no external observer ever sees a
/// transient empty tag set.
///
/// An item_tags row lives and dies with its item (cascade on item delete)
/// but is independent of the tag's lifetime.

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::tag::Tag;

/// Join-table operations; the row type itself never leaves the database
pub struct ItemTag;

impl ItemTag {
    /// Replaces an item's entire tag set
    ///
    /// Deletes every existing association for the item, then inserts one
    /// row per id in `tag_ids`. Atomic per item.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including
    /// foreign-key failures for unknown tag ids.
    pub async fn replace_for_item(
        pool: &PgPool,
        item_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::replace_in_tx(&mut tx, item_id, tag_ids).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Replace within an existing transaction
    pub(crate) async fn replace_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        Self::delete_all_in_tx(tx, item_id).await?;
        Self::insert_all(tx, item_id, tag_ids).await?;
        Ok(())
    }

    /// Inserts one association per tag id
    ///
    /// Duplicate ids in the input collapse onto the (item_id, tag_id)
    /// primary key, so they are tolerated rather than rejected.
    pub(crate) async fn insert_all(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<(), sqlx::Error> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO item_tags (item_id, tag_id)
            SELECT $1, tag_id FROM UNNEST($2::uuid[]) AS t(tag_id)
            ON CONFLICT (item_id, tag_id) DO NOTHING
            "#,
        )
        .bind(item_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Removes every association for an item
    ///
    /// Used on item deletion; must run before the item row delete.
    pub(crate) async fn delete_all_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM item_tags WHERE item_id = $1")
            .bind(item_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Resolves an item's tags
    ///
    /// The inner join silently drops associations whose tag was removed out
    /// of band instead of surfacing them as errors.
    pub async fn tags_for_item(pool: &PgPool, item_id: Uuid) -> Result<Vec<Tag>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.created_at
            FROM item_tags it
            JOIN tags t ON t.id = it.tag_id
            WHERE it.item_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(item_id)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }
}
