use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Entry;
use crate::database::repository::Document;

use super::User;

/// A post with its likes and comments embedded.
///
/// `name` and `avatar` are copied from the author at creation and are not
/// refreshed when the author later changes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: String,
    pub user: String,
    pub text: String,
    pub name: String,
    pub avatar: String,
    #[serde(default)]
    pub likes: Vec<Like>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
}

impl Post {
    pub fn new(author: &User, text: String) -> Self {
        Self {
            id: super::new_id(),
            user: author.id.clone(),
            text,
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now(),
        }
    }
}

impl Document for Post {
    const COLLECTION: &'static str = "posts";

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_key(&self) -> &str {
        &self.user
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Like {
    pub user: String,
}

impl Like {
    pub fn new(user_id: &str) -> Self {
        Self {
            user: user_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: String,
    pub user: String,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: &User, text: String) -> Self {
        Self {
            id: super::new_id(),
            user: author.id.clone(),
            text,
            name: author.name.clone(),
            avatar: author.avatar.clone(),
            date: Utc::now(),
        }
    }
}

impl Entry for Comment {
    const KIND: &'static str = "Comment";

    fn entry_id(&self) -> &str {
        &self.id
    }
}
