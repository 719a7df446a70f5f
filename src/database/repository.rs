use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::database::manager::DatabaseError;

/// A top-level stored document.
///
/// Every document has a primary id and a secondary "owner" key. For profiles
/// and posts the owner key is the owning user's id; for users it is the
/// normalized email.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection (table) name
    const COLLECTION: &'static str;

    /// At most one document per owner key; `save` rejects a second one
    const UNIQUE_OWNER: bool = false;

    fn id(&self) -> &str;

    fn owner_key(&self) -> &str;
}

/// Result of a single-document lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn found_or<E>(self, err: E) -> Result<T, E> {
        match self {
            Lookup::Found(doc) => Ok(doc),
            Lookup::NotFound => Err(err),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(doc) => Some(doc),
            Lookup::NotFound => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(doc) => Lookup::Found(doc),
            None => Lookup::NotFound,
        }
    }
}

/// Seam to the document storage engine.
///
/// `save` is insert-or-replace by id; the last write wins and no version
/// check is made. For collections with a unique owner key, saving a document
/// whose owner key is held by a different id fails with
/// [`DatabaseError::DuplicateKey`].
#[async_trait]
pub trait Repository<T: Document>: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Lookup<T>, DatabaseError>;

    /// Only meaningful where the owner key is unique (profiles, users)
    async fn get_by_owner(&self, owner: &str) -> Result<Lookup<T>, DatabaseError>;

    async fn list(&self) -> Result<Vec<T>, DatabaseError>;

    async fn save(&self, doc: &T) -> Result<(), DatabaseError>;

    /// Returns whether a document was removed
    async fn delete_by_id(&self, id: &str) -> Result<bool, DatabaseError>;

    /// Returns the number of documents removed
    async fn delete_all_by_owner(&self, owner: &str) -> Result<u64, DatabaseError>;
}
