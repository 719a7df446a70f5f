use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::repository::Document;

/// Stored account. `password` holds the credential hash and never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub password: String,
    pub date: DateTime<Utc>,
}

impl User {
    pub fn new(name: String, email: &str, avatar: String, password_hash: String) -> Self {
        Self {
            id: super::new_id(),
            name,
            email: normalize_email(email),
            avatar,
            password: password_hash,
            date: Utc::now(),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    const UNIQUE_OWNER: bool = true;

    fn id(&self) -> &str {
        &self.id
    }

    // Secondary key for users is the unique email
    fn owner_key(&self) -> &str {
        &self.email
    }
}

/// Account as returned to its owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            date: user.date,
        }
    }
}

/// Name/avatar pair joined onto profile listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}
