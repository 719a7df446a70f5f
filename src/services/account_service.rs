use std::sync::Arc;

use tracing::info;

use crate::auth::TokenService;
use crate::database::models::user::normalize_email;
use crate::database::models::{PublicUser, User};
use crate::database::{DatabaseError, Lookup, Store};

use super::{AvatarResolver, CredentialHasher, ServiceError, ServiceResult};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Registration, login and account removal
#[derive(Clone)]
pub struct AccountService {
    store: Store,
    tokens: Arc<TokenService>,
    hasher: Arc<dyn CredentialHasher>,
    avatars: Arc<dyn AvatarResolver>,
}

impl AccountService {
    pub fn new(
        store: Store,
        tokens: Arc<TokenService>,
        hasher: Arc<dyn CredentialHasher>,
        avatars: Arc<dyn AvatarResolver>,
    ) -> Self {
        Self {
            store,
            tokens,
            hasher,
            avatars,
        }
    }

    /// Creates the account and returns a token for it
    pub async fn register(&self, input: NewUser) -> ServiceResult<String> {
        let email = normalize_email(&input.email);
        if self.store.users.get_by_owner(&email).await?.is_found() {
            return Err(ServiceError::Conflict("User already exists".to_string()));
        }

        let avatar = self.avatars.avatar_for(&email);
        let password_hash = self.hasher.hash_password(&input.password).await?;
        let user = User::new(input.name, &email, avatar, password_hash);
        // A concurrent registration may have taken the email since the check
        match self.store.users.save(&user).await {
            Ok(()) => {}
            Err(DatabaseError::DuplicateKey { .. }) => {
                return Err(ServiceError::Conflict("User already exists".to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        info!(user_id = %user.id, "registered user");
        Ok(self.tokens.issue(&user.id)?)
    }

    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<String> {
        let user = match self.store.users.get_by_owner(&normalize_email(email)).await? {
            Lookup::Found(user) => user,
            Lookup::NotFound => return Err(ServiceError::InvalidCredentials),
        };

        if !self.hasher.verify_password(password, &user.password).await? {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(self.tokens.issue(&user.id)?)
    }

    pub async fn current_user(&self, caller_id: &str) -> ServiceResult<PublicUser> {
        let user = self
            .store
            .users
            .get_by_id(caller_id)
            .await?
            .found_or(ServiceError::NotFound("User"))?;
        Ok(PublicUser::from(&user))
    }

    /// Removes the caller's posts, profile and account, in that order.
    ///
    /// Likes and comments left on other users' posts stay in place.
    pub async fn delete_account(&self, caller_id: &str) -> ServiceResult<()> {
        let posts = self.store.posts.delete_all_by_owner(caller_id).await?;
        let profiles = self.store.profiles.delete_all_by_owner(caller_id).await?;
        self.store.users.delete_by_id(caller_id).await?;

        info!(user_id = %caller_id, posts, profiles, "deleted account");
        Ok(())
    }
}
