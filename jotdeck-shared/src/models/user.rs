/// User model and identity resolution
///
/// Users are created lazily the first time an authenticated identity is
/// seen. Jotdeck never stores credentials; the external identity provider
/// owns authentication and hands us a stable `subject` claim plus display
/// name and email.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     subject VARCHAR(255) NOT NULL UNIQUE,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use jotdeck_shared::models::user::User;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::find_or_create(&pool, "idp|12345", "Ada", "ada@example.com").await?;
/// println!("Resolved user {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User record backing an authenticated identity
///
/// Never updated or deleted after creation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Internal user ID
    pub id: Uuid,

    /// Stable subject claim from the identity provider
    pub subject: String,

    /// Display name captured at first sight
    pub name: String,

    /// Email captured at first sight
    pub email: String,

    /// When the user record was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Resolves an identity subject to a user, creating one on first sight
    ///
    /// Idempotent under concurrency: the unique constraint on `subject` plus
    /// `ON CONFLICT DO NOTHING` guarantees that two racing first-time calls
    /// produce exactly one row. The loser of the race falls through to the
    /// re-select and returns the winner's row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find_or_create(
        pool: &PgPool,
        subject: &str,
        name: &str,
        email: &str,
    ) -> Result<Self, sqlx::Error> {
        if let Some(user) = Self::find_by_subject(pool, subject).await? {
            return Ok(user);
        }

        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (subject, name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (subject) DO NOTHING
            RETURNING id, subject, name, email, created_at
            "#,
        )
        .bind(subject)
        .bind(name)
        .bind(email)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(user) => Ok(user),
            // Lost the insert race; the row exists now.
            None => {
                let user = Self::find_by_subject(pool, subject).await?;
                user.ok_or(sqlx::Error::RowNotFound)
            }
        }
    }

    /// Finds a user by identity subject
    pub async fn find_by_subject(
        pool: &PgPool,
        subject: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, subject, name, email, created_at
            FROM users
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by internal ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, subject, name, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
