/// Tag registry
///
/// Tags form a global, deduplicated namespace shared by all users: no
/// ownership, case-sensitive exact-match names, never deleted. Detaching a
/// tag from every item leaves the tag itself in place for reuse and
/// autocomplete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Global tag record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// Unique tag ID
    pub id: Uuid,

    /// Tag name, unique across the whole deployment
    pub name: String,

    /// When the tag was first created
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Returns the tag with the given name, creating it if absent
    ///
    /// The unique constraint on `name` makes deduplication a hard
    /// invariant: two concurrent calls for the same new name race on the
    /// insert, and the loser re-selects the winner's row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get_or_create(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        if let Some(tag) = Self::find_by_name(pool, name).await? {
            return Ok(tag);
        }

        let inserted = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(tag) => Ok(tag),
            None => {
                let tag = Self::find_by_name(pool, name).await?;
                tag.ok_or(sqlx::Error::RowNotFound)
            }
        }
    }

    /// Finds a tag by exact name
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>(
            "SELECT id, name, created_at FROM tags WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(tag)
    }

    /// Lists every tag, for autocomplete
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT id, name, created_at FROM tags ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }
}
