pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

use std::sync::Arc;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryRepository;
pub use postgres::PgRepository;
pub use repository::{Document, Lookup, Repository};

use models::{Post, Profile, User};

/// The three document collections the services work against
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn Repository<User>>,
    pub profiles: Arc<dyn Repository<Profile>>,
    pub posts: Arc<dyn Repository<Post>>,
}

impl Store {
    pub fn memory() -> Self {
        Self {
            users: Arc::new(MemoryRepository::<User>::new()),
            profiles: Arc::new(MemoryRepository::<Profile>::new()),
            posts: Arc::new(MemoryRepository::<Post>::new()),
        }
    }

    pub fn postgres(manager: &DatabaseManager) -> Result<Self, DatabaseError> {
        Ok(Self {
            users: Arc::new(PgRepository::<User>::new(manager.pool())?),
            profiles: Arc::new(PgRepository::<Profile>::new(manager.pool())?),
            posts: Arc::new(PgRepository::<Post>::new(manager.pool())?),
        })
    }
}
