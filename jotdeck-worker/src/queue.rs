/// Search queue reader
///
/// Items created with `is_searching = true` form a durable queue inside the
/// items table itself; there is no separate job table. The worker claims a
/// batch by stamping `search_claimed_at`, which keeps other workers (and
/// other poll iterations) off the row while the external call is in flight.
///
/// # Claiming
///
/// A row is claimable when `is_searching = TRUE` and it either has never
/// been claimed or its claim has gone stale (the claiming worker died
/// before writing a terminal state). Stale-claim redelivery makes the
/// claim step at-least-once; the terminal write always happens exactly
/// once per delivery.
///
/// # Ordering
///
/// FIFO by creation time, matching user expectation that the oldest
/// pending search resolves first.

use chrono::{DateTime, Utc};
use jotdeck_shared::models::item::Item;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Search queue error
#[derive(Debug, Error)]
pub enum QueueError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Claims pending searches from the items table
pub struct SearchQueue {
    db: PgPool,

    /// Maximum items to claim in one batch
    batch_size: usize,

    /// Claims older than this are considered abandoned and re-claimable
    stale_claim_timeout_secs: u64,
}

impl SearchQueue {
    /// Creates a queue with default batch size (10) and stale timeout (300s)
    pub fn new(db: PgPool) -> Self {
        SearchQueue {
            db,
            batch_size: 10,
            stale_claim_timeout_secs: 300,
        }
    }

    /// Creates a queue with explicit tuning
    pub fn with_config(db: PgPool, batch_size: usize, stale_claim_timeout_secs: u64) -> Self {
        SearchQueue {
            db,
            batch_size,
            stale_claim_timeout_secs,
        }
    }

    /// Claims up to `limit` items with pending searches
    ///
    /// Atomic: the subselect takes row locks with `SKIP LOCKED`, so two
    /// workers polling at once never claim the same row.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn claim(&self, limit: Option<usize>) -> Result<Vec<Item>, QueueError> {
        let limit = limit.unwrap_or(self.batch_size) as i64;

        let items = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET search_claimed_at = NOW()
            WHERE id IN (
                SELECT id FROM items
                WHERE is_searching = TRUE
                  AND (search_claimed_at IS NULL
                       OR search_claimed_at < NOW() - make_interval(secs => $2))
                ORDER BY created_at ASC
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, title, note, creator_id, due_date, completed, priority,
                      assignee_id, is_searching, has_unseen_results, search_claimed_at,
                      created_at, updated_at
            "#,
        )
        .bind(limit)
        .bind(self.stale_claim_timeout_secs as f64)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Counts items currently waiting for or undergoing a search
    pub async fn pending_count(&self) -> Result<i64, QueueError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM items WHERE is_searching = TRUE")
                .fetch_one(&self.db)
                .await?;

        Ok(count)
    }

    /// Returns a claimed item's claim stamp, mainly for observability
    pub async fn claim_stamp(&self, id: Uuid) -> Result<Option<DateTime<Utc>>, QueueError> {
        let stamp: Option<(Option<DateTime<Utc>>,)> =
            sqlx::query_as("SELECT search_claimed_at FROM items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;

        Ok(stamp.and_then(|(s,)| s))
    }
}

impl Clone for SearchQueue {
    fn clone(&self) -> Self {
        SearchQueue {
            db: self.db.clone(),
            batch_size: self.batch_size,
            stale_claim_timeout_secs: self.stale_claim_timeout_secs,
        }
    }
}
