use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::repository::{Document, Lookup, Repository};

/// In-process document store.
///
/// The lock covers single calls only; a load-mutate-save sequence made of
/// several calls is not atomic, matching the Postgres adapter.
pub struct MemoryRepository<T> {
    docs: Arc<RwLock<HashMap<String, T>>>,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            docs: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Document> Repository<T> for MemoryRepository<T> {
    async fn get_by_id(&self, id: &str) -> Result<Lookup<T>, DatabaseError> {
        let docs = self.docs.read().await;
        Ok(docs.get(id).cloned().into())
    }

    async fn get_by_owner(&self, owner: &str) -> Result<Lookup<T>, DatabaseError> {
        let docs = self.docs.read().await;
        Ok(docs.values().find(|doc| doc.owner_key() == owner).cloned().into())
    }

    async fn list(&self) -> Result<Vec<T>, DatabaseError> {
        let docs = self.docs.read().await;
        Ok(docs.values().cloned().collect())
    }

    async fn save(&self, doc: &T) -> Result<(), DatabaseError> {
        let mut docs = self.docs.write().await;
        if T::UNIQUE_OWNER
            && docs
                .values()
                .any(|other| other.owner_key() == doc.owner_key() && other.id() != doc.id())
        {
            return Err(DatabaseError::DuplicateKey {
                collection: T::COLLECTION,
                key: doc.owner_key().to_string(),
            });
        }
        docs.insert(doc.id().to_string(), doc.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, DatabaseError> {
        let mut docs = self.docs.write().await;
        Ok(docs.remove(id).is_some())
    }

    async fn delete_all_by_owner(&self, owner: &str) -> Result<u64, DatabaseError> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|_, doc| doc.owner_key() != owner);
        Ok((before - docs.len()) as u64)
    }
}
