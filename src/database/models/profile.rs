use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::collection::Entry;
use crate::database::repository::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Youtube,
    Twitter,
    Facebook,
    Linkedin,
    Instagram,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    /// Owning user id, fixed at creation
    pub user: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    #[serde(default)]
    pub social: BTreeMap<SocialPlatform, String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    pub date: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: &str, status: String, skills: Vec<String>) -> Self {
        Self {
            id: super::new_id(),
            user: user_id.to_string(),
            company: None,
            website: None,
            location: None,
            bio: None,
            status,
            githubusername: None,
            skills,
            social: BTreeMap::new(),
            experience: Vec::new(),
            education: Vec::new(),
            date: Utc::now(),
        }
    }
}

impl Document for Profile {
    const COLLECTION: &'static str = "profiles";
    const UNIQUE_OWNER: bool = true;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_key(&self) -> &str {
        &self.user
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl Entry for Experience {
    const KIND: &'static str = "Experience";

    fn entry_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl Entry for Education {
    const KIND: &'static str = "Education";

    fn entry_id(&self) -> &str {
        &self.id
    }
}
