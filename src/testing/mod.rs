use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::TokenService;
use crate::database::models::User;
use crate::database::{DatabaseError, Document, Lookup, MemoryRepository, Repository, Store};
use crate::services::{
    AccountService, AvatarResolver, CredentialHasher, Gravatar, PostService, ProfileService,
    ServiceResult,
};

/// Test utilities: services wired over a fresh in-memory store
pub struct TestContext {
    pub store: Store,
    pub tokens: Arc<TokenService>,
    pub accounts: AccountService,
    pub profiles: ProfileService,
    pub posts: PostService,
}

/// Reversible "hash" so service tests skip Argon2's cost
pub struct PlainHasher;

#[async_trait]
impl CredentialHasher for PlainHasher {
    async fn hash_password(&self, password: &str) -> ServiceResult<String> {
        Ok(format!("plain:{password}"))
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> ServiceResult<bool> {
        Ok(hashed == format!("plain:{password}"))
    }
}

/// Memory repository whose writes can be switched to fail.
///
/// Reads always go to the underlying store, so a test can check that a failed
/// save left the stored document untouched.
pub struct FlakyRepository<T> {
    inner: MemoryRepository<T>,
    failing: AtomicBool,
}

impl<T> FlakyRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: MemoryRepository::new(),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Document> Repository<T> for FlakyRepository<T> {
    async fn get_by_id(&self, id: &str) -> Result<Lookup<T>, DatabaseError> {
        self.inner.get_by_id(id).await
    }

    async fn get_by_owner(&self, owner: &str) -> Result<Lookup<T>, DatabaseError> {
        self.inner.get_by_owner(owner).await
    }

    async fn list(&self) -> Result<Vec<T>, DatabaseError> {
        self.inner.list().await
    }

    async fn save(&self, doc: &T) -> Result<(), DatabaseError> {
        self.check()?;
        self.inner.save(doc).await
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, DatabaseError> {
        self.check()?;
        self.inner.delete_by_id(id).await
    }

    async fn delete_all_by_owner(&self, owner: &str) -> Result<u64, DatabaseError> {
        self.check()?;
        self.inner.delete_all_by_owner(owner).await
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_store(Store::memory())
    }

    /// Services wired over `store`, for tests that swap in a repository double
    pub fn with_store(store: Store) -> Self {
        let tokens = Arc::new(TokenService::new("test-secret", 100));
        let hasher: Arc<dyn CredentialHasher> = Arc::new(PlainHasher);
        let avatars: Arc<dyn AvatarResolver> = Arc::new(Gravatar);

        Self {
            accounts: AccountService::new(store.clone(), tokens.clone(), hasher, avatars),
            profiles: ProfileService::new(store.clone()),
            posts: PostService::new(store.clone()),
            tokens,
            store,
        }
    }

    /// Stores a user named `name` with email `<name>@test.example`
    pub async fn seed_user(&self, name: &str) -> User {
        let user = User::new(
            name.to_string(),
            &format!("{name}@test.example"),
            Gravatar.avatar_for(name),
            format!("plain:{name}-password"),
        );
        self.store.users.save(&user).await.expect("seed user");
        user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_users_are_distinct() {
        let ctx = TestContext::new();
        let a = ctx.seed_user("a").await;
        let b = ctx.seed_user("b").await;
        assert_ne!(a.id, b.id);
        assert!(ctx.store.users.get_by_id(&a.id).await.unwrap().is_found());
    }
}
