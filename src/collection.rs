//! Insert/remove rules for the ordered collections embedded in profiles and posts.
//!
//! Comments, experience and education are most-recent-first lists addressed
//! by a generated id. Likes are a set keyed by the liking user's id.
//! Every removal locates the entry first and fails explicitly when it is
//! absent, so a miss can never turn into removing some other element.

use thiserror::Error;

use crate::auth::{authorize, Decision};
use crate::database::models::post::Like;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("Post already liked")]
    AlreadyLiked,

    #[error("Post has not yet been liked")]
    NotLiked,

    #[error("{0} does not exist")]
    EntryNotFound(&'static str),

    #[error("User not authorized")]
    Forbidden,
}

/// An embedded entry addressable by its generated id
pub trait Entry {
    /// Human-readable entry kind used in not-found messages
    const KIND: &'static str;

    fn entry_id(&self) -> &str;
}

pub fn insert_front<T>(items: &mut Vec<T>, entry: T) {
    items.insert(0, entry);
}

pub fn add_like(likes: &mut Vec<Like>, user_id: &str) -> Result<(), CollectionError> {
    if likes.iter().any(|like| like.user == user_id) {
        return Err(CollectionError::AlreadyLiked);
    }
    insert_front(likes, Like::new(user_id));
    Ok(())
}

pub fn remove_like(likes: &mut Vec<Like>, user_id: &str) -> Result<Like, CollectionError> {
    let index = likes
        .iter()
        .position(|like| like.user == user_id)
        .ok_or(CollectionError::NotLiked)?;
    Ok(likes.remove(index))
}

pub fn position_by_id<T: Entry>(items: &[T], id: &str) -> Result<usize, CollectionError> {
    items
        .iter()
        .position(|item| item.entry_id() == id)
        .ok_or(CollectionError::EntryNotFound(T::KIND))
}

pub fn remove_by_id<T: Entry>(items: &mut Vec<T>, id: &str) -> Result<T, CollectionError> {
    let index = position_by_id(items, id)?;
    Ok(items.remove(index))
}

/// Removes an entry only if `caller_id` owns it.
///
/// Existence is checked before ownership, and nothing is removed unless both
/// pass. `owner_of` picks the field that names the entry's owner.
pub fn remove_by_id_authorized<T, F>(
    items: &mut Vec<T>,
    id: &str,
    caller_id: &str,
    owner_of: F,
) -> Result<T, CollectionError>
where
    T: Entry,
    F: Fn(&T) -> &str,
{
    let index = position_by_id(items, id)?;
    match authorize(caller_id, owner_of(&items[index])) {
        Decision::Allow => Ok(items.remove(index)),
        Decision::Deny => Err(CollectionError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        owner: String,
    }

    impl Entry for Item {
        const KIND: &'static str = "Item";

        fn entry_id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, owner: &str) -> Item {
        Item {
            id: id.to_string(),
            owner: owner.to_string(),
        }
    }

    fn users(likes: &[Like]) -> Vec<&str> {
        likes.iter().map(|l| l.user.as_str()).collect()
    }

    #[test]
    fn insert_front_is_most_recent_first() {
        let mut items = Vec::new();
        insert_front(&mut items, item("a", "u1"));
        insert_front(&mut items, item("b", "u1"));
        assert_eq!(items[0].id, "b");
        assert_eq!(items[1].id, "a");
    }

    #[test]
    fn duplicate_like_is_rejected_without_mutation() {
        let mut likes = Vec::new();
        add_like(&mut likes, "u2").unwrap();
        assert_eq!(add_like(&mut likes, "u2"), Err(CollectionError::AlreadyLiked));
        assert_eq!(likes.len(), 1);
    }

    #[test]
    fn unlike_without_like_is_rejected() {
        let mut likes = vec![Like::new("u3")];
        assert_eq!(remove_like(&mut likes, "u2"), Err(CollectionError::NotLiked));
        assert_eq!(users(&likes), vec!["u3"]);
    }

    #[test]
    fn like_then_unlike_restores_other_likes_in_order() {
        let mut likes = vec![Like::new("a"), Like::new("b"), Like::new("c")];
        let before = likes.clone();

        add_like(&mut likes, "me").unwrap();
        assert_eq!(users(&likes), vec!["me", "a", "b", "c"]);

        let removed = remove_like(&mut likes, "me").unwrap();
        assert_eq!(removed.user, "me");
        assert_eq!(likes, before);
    }

    #[test]
    fn remove_unknown_id_leaves_collection_untouched() {
        let mut items = vec![item("a", "u1"), item("b", "u1"), item("c", "u1")];
        let before = items.clone();

        let err = remove_by_id(&mut items, "missing").unwrap_err();
        assert_eq!(err, CollectionError::EntryNotFound("Item"));
        assert_eq!(items, before);
    }

    #[test]
    fn remove_by_id_preserves_order_of_rest() {
        let mut items = vec![item("a", "u1"), item("b", "u1"), item("c", "u1")];
        let removed = remove_by_id(&mut items, "b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(items, vec![item("a", "u1"), item("c", "u1")]);
    }

    #[test]
    fn authorized_removal_checks_existence_first() {
        let mut items = vec![item("a", "u1")];
        let err = remove_by_id_authorized(&mut items, "zzz", "u2", |i| &i.owner).unwrap_err();
        assert_eq!(err, CollectionError::EntryNotFound("Item"));
    }

    #[test]
    fn authorized_removal_denies_non_owner() {
        let mut items = vec![item("a", "u1"), item("b", "u2")];
        let before = items.clone();

        let err = remove_by_id_authorized(&mut items, "a", "u2", |i| &i.owner).unwrap_err();
        assert_eq!(err, CollectionError::Forbidden);
        assert_eq!(items, before);

        remove_by_id_authorized(&mut items, "b", "u2", |i| &i.owner).unwrap();
        assert_eq!(items, vec![item("a", "u1")]);
    }
}
