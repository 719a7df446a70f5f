use sha2::{Digest, Sha256};

/// Derives a display avatar for a new account
pub trait AvatarResolver: Send + Sync {
    fn avatar_for(&self, email: &str) -> String;
}

/// Gravatar URL keyed by the SHA-256 of the normalized email
#[derive(Debug, Clone, Default)]
pub struct Gravatar;

impl AvatarResolver for Gravatar {
    fn avatar_for(&self, email: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(email.trim().to_lowercase().as_bytes());
        let hash = hasher.finalize();
        format!("https://www.gravatar.com/avatar/{:x}?s=200&r=pg&d=mm", hash)
    }
}
