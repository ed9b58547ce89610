/// Cursor-based pagination for creation-time-descending listings
///
/// Listings are ordered by `(created_at DESC, id DESC)` and paginated with an
/// opaque keyset cursor rather than limit/offset, so already-returned pages
/// stay stable while new items are prepended.
///
/// The cursor token encodes the `(created_at, id)` of the last row on the
/// previous page as `{micros}:{uuid}`, hex-encoded. Clients must treat it as
/// opaque.
///
/// # Example
///
/// ```
/// use jotdeck_shared::page::{Cursor, PageRequest};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let cursor = Cursor::new(Utc::now(), Uuid::new_v4());
/// let token = cursor.encode();
/// let decoded = Cursor::decode(&token).unwrap();
/// assert_eq!(decoded.id, cursor.id);
/// ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Default page size when the client does not specify one
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Upper bound on page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Cursor decoding error
#[derive(Debug, Error)]
pub enum CursorError {
    /// Token is not valid hex or not UTF-8 underneath
    #[error("Malformed cursor token")]
    Malformed,

    /// Token decoded but the position it encodes is invalid
    #[error("Invalid cursor position: {0}")]
    InvalidPosition(String),
}

/// Keyset position in the creation-time-descending order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Creation timestamp of the last row already returned
    pub created_at: DateTime<Utc>,

    /// Id of the last row already returned (tie-breaker)
    pub id: Uuid,
}

impl Cursor {
    /// Creates a cursor pointing just past the given row
    pub fn new(created_at: DateTime<Utc>, id: Uuid) -> Self {
        Self { created_at, id }
    }

    /// Encodes the cursor as an opaque token
    pub fn encode(&self) -> String {
        let raw = format!("{}:{}", self.created_at.timestamp_micros(), self.id);
        hex::encode(raw.as_bytes())
    }

    /// Decodes an opaque token back into a cursor
    ///
    /// # Errors
    ///
    /// Returns `CursorError` if the token is not one produced by `encode`.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = hex::decode(token).map_err(|_| CursorError::Malformed)?;
        let raw = String::from_utf8(bytes).map_err(|_| CursorError::Malformed)?;

        let (micros_part, id_part) = raw.split_once(':').ok_or(CursorError::Malformed)?;

        let micros: i64 = micros_part
            .parse()
            .map_err(|_| CursorError::InvalidPosition(format!("bad timestamp: {}", micros_part)))?;
        let created_at = Utc
            .timestamp_micros(micros)
            .single()
            .ok_or_else(|| CursorError::InvalidPosition(format!("timestamp out of range: {}", micros)))?;
        let id = Uuid::parse_str(id_part)
            .map_err(|_| CursorError::InvalidPosition(format!("bad id: {}", id_part)))?;

        Ok(Self { created_at, id })
    }
}

/// Client-supplied paging parameters
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Resume position from a previous page, if any
    pub cursor: Option<Cursor>,

    /// Requested items per page (clamped to 1..=MAX_PAGE_SIZE)
    pub page_size: Option<i64>,
}

impl PageRequest {
    /// Effective page size after clamping
    pub fn limit(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// One page of results plus continuation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page, newest first
    pub items: Vec<T>,

    /// Token to fetch the next page (absent once exhausted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,

    /// Whether more items exist past this page
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Builds a page from `limit + 1` fetched rows
    ///
    /// The extra row, if present, signals `has_more` and is discarded; the
    /// cursor then points at the last row actually returned.
    pub fn from_rows(mut rows: Vec<T>, limit: i64, position: impl Fn(&T) -> Cursor) -> Self {
        let has_more = rows.len() as i64 > limit;
        if has_more {
            rows.truncate(limit as usize);
        }

        let cursor = if has_more {
            rows.last().map(|row| position(row).encode())
        } else {
            None
        };

        Page {
            items: rows,
            cursor,
            has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let cursor = Cursor::new(Utc::now(), Uuid::new_v4());
        let decoded = Cursor::decode(&cursor.encode()).unwrap();
        // Encoding truncates to microseconds, which matches Postgres precision
        assert_eq!(
            decoded.created_at.timestamp_micros(),
            cursor.created_at.timestamp_micros()
        );
        assert_eq!(decoded.id, cursor.id);
    }

    #[test]
    fn test_cursor_rejects_garbage() {
        assert!(Cursor::decode("not-hex!").is_err());
        assert!(Cursor::decode(&hex::encode("no-separator")).is_err());
        assert!(Cursor::decode(&hex::encode("abc:not-a-uuid")).is_err());
        assert!(Cursor::decode(&hex::encode(format!("xyz:{}", Uuid::new_v4()))).is_err());
    }

    #[test]
    fn test_page_size_clamping() {
        assert_eq!(PageRequest::default().limit(), DEFAULT_PAGE_SIZE);

        let req = PageRequest {
            cursor: None,
            page_size: Some(0),
        };
        assert_eq!(req.limit(), 1);

        let req = PageRequest {
            cursor: None,
            page_size: Some(10_000),
        };
        assert_eq!(req.limit(), MAX_PAGE_SIZE);

        let req = PageRequest {
            cursor: None,
            page_size: Some(50),
        };
        assert_eq!(req.limit(), 50);
    }

    #[test]
    fn test_page_from_rows_with_more() {
        let now = Utc::now();
        let rows: Vec<(DateTime<Utc>, Uuid)> =
            (0..6).map(|_| (now, Uuid::new_v4())).collect();
        let last_kept = rows[4];

        let page = Page::from_rows(rows, 5, |r| Cursor::new(r.0, r.1));
        assert_eq!(page.items.len(), 5);
        assert!(page.has_more);

        let cursor = Cursor::decode(page.cursor.as_deref().unwrap()).unwrap();
        assert_eq!(cursor.id, last_kept.1);
    }

    #[test]
    fn test_page_from_rows_exhausted() {
        let now = Utc::now();
        let rows: Vec<(DateTime<Utc>, Uuid)> =
            (0..3).map(|_| (now, Uuid::new_v4())).collect();

        let page = Page::from_rows(rows, 5, |r| Cursor::new(r.0, r.1));
        assert_eq!(page.items.len(), 3);
        assert!(!page.has_more);
        assert!(page.cursor.is_none());
    }
}
