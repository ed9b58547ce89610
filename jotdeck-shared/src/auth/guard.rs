/// Access control guard
///
/// Jotdeck's permission model is creator/assignee only: the creator holds
/// full rights including delete, an assignee may read and update but not
/// delete, and everyone else sees nothing. There are no roles beyond that.
///
/// Existence is checked before ownership, so an unauthorized caller probing
/// a missing id learns only "not found" and never whether an item they
/// cannot see exists.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Error;
use crate::models::item::Item;

/// Requested access mode on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// View the item and its tags
    Read,

    /// Patch fields or replace tags
    Update,

    /// Remove the item
    Delete,
}

/// Decides whether a user may act on an existing item
///
/// Pure predicate; the item has already been looked up.
///
/// # Errors
///
/// Returns `Forbidden` when the predicate fails.
pub fn authorize(user_id: Uuid, item: &Item, mode: AccessMode) -> Result<(), Error> {
    let allowed = match mode {
        AccessMode::Read | AccessMode::Update => {
            item.creator_id == user_id || item.assignee_id == Some(user_id)
        }
        AccessMode::Delete => item.creator_id == user_id,
    };

    if allowed {
        Ok(())
    } else {
        Err(Error::Forbidden(format!(
            "user {} may not {:?} item {}",
            user_id, mode, item.id
        )))
    }
}

/// Looks up an item and authorizes the access in one step
///
/// # Errors
///
/// `NotFound` if the item does not exist (checked first), `Forbidden` if it
/// exists but the user lacks rights, `Database` on lookup failure.
pub async fn load_authorized(
    pool: &PgPool,
    user_id: Uuid,
    item_id: Uuid,
    mode: AccessMode,
) -> Result<Item, Error> {
    let item = Item::find_by_id(pool, item_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("item {}", item_id)))?;

    authorize(user_id, &item, mode)?;
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item_owned_by(creator_id: Uuid, assignee_id: Option<Uuid>) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            note: String::new(),
            creator_id,
            due_date: None,
            completed: false,
            priority: None,
            assignee_id,
            is_searching: None,
            has_unseen_results: None,
            search_claimed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_creator_has_full_rights() {
        let creator = Uuid::new_v4();
        let item = item_owned_by(creator, None);

        assert!(authorize(creator, &item, AccessMode::Read).is_ok());
        assert!(authorize(creator, &item, AccessMode::Update).is_ok());
        assert!(authorize(creator, &item, AccessMode::Delete).is_ok());
    }

    #[test]
    fn test_assignee_may_update_but_not_delete() {
        let creator = Uuid::new_v4();
        let assignee = Uuid::new_v4();
        let item = item_owned_by(creator, Some(assignee));

        assert!(authorize(assignee, &item, AccessMode::Read).is_ok());
        assert!(authorize(assignee, &item, AccessMode::Update).is_ok());
        assert!(matches!(
            authorize(assignee, &item, AccessMode::Delete),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn test_stranger_sees_nothing() {
        let item = item_owned_by(Uuid::new_v4(), Some(Uuid::new_v4()));
        let stranger = Uuid::new_v4();

        for mode in [AccessMode::Read, AccessMode::Update, AccessMode::Delete] {
            assert!(matches!(
                authorize(stranger, &item, mode),
                Err(Error::Forbidden(_))
            ));
        }
    }
}
