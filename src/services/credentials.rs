use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;

use super::{ServiceError, ServiceResult};

/// Password hashing seam
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, password: &str) -> ServiceResult<String>;

    async fn verify_password(&self, password: &str, hashed: &str) -> ServiceResult<bool>;
}

#[derive(Default, Clone)]
pub struct Argon2Hasher {
    hasher: Argon2<'static>,
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash_password(&self, password: &str) -> ServiceResult<String> {
        let password = password.to_owned();
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            hasher
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| ServiceError::Credential(e.to_string()))
        })
        .await
        .map_err(|e| ServiceError::Credential(e.to_string()))?
    }

    async fn verify_password(&self, password: &str, hashed: &str) -> ServiceResult<bool> {
        let password = password.to_owned();
        let hashed = hashed.to_owned();
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hashed).map_err(|_| ServiceError::InvalidCredentials)?;
            Ok(hasher.verify_password(password.as_bytes(), &parsed).is_ok())
        })
        .await
        .map_err(|e| ServiceError::Credential(e.to_string()))?
    }
}
