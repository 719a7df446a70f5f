use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::info;

use crate::collection::{insert_front, remove_by_id};
use crate::database::models::{
    new_id, Education, Experience, Profile, SocialPlatform, UserSummary,
};
use crate::database::{DatabaseError, Lookup, Store};

use super::{ServiceError, ServiceResult};

/// Profile fields supplied on create/update.
///
/// Absent optional fields keep their stored value on update; `social` is
/// always replaced as a whole.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: BTreeMap<SocialPlatform, String>,
}

#[derive(Debug, Clone)]
pub struct NewExperience {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEducation {
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

/// Profile with its owner's name and avatar joined in as `user`
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub profile: Profile,
    pub user: Option<UserSummary>,
}

impl Serialize for ProfileView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::Error;

        let mut value = serde_json::to_value(&self.profile).map_err(S::Error::custom)?;
        if let Some(user) = &self.user {
            value["user"] = serde_json::to_value(user).map_err(S::Error::custom)?;
        }
        value.serialize(serializer)
    }
}

#[derive(Clone)]
pub struct ProfileService {
    store: Store,
}

impl ProfileService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    async fn load_own(&self, caller_id: &str) -> ServiceResult<Profile> {
        self.store
            .profiles
            .get_by_owner(caller_id)
            .await?
            .found_or(ServiceError::NotFound("Profile"))
    }

    async fn view(&self, profile: Profile) -> ServiceResult<ProfileView> {
        let user = self
            .store
            .users
            .get_by_id(&profile.user)
            .await?
            .into_option()
            .map(|u| UserSummary::from(&u));
        Ok(ProfileView { profile, user })
    }

    pub async fn my_profile(&self, caller_id: &str) -> ServiceResult<ProfileView> {
        let profile = self.load_own(caller_id).await?;
        self.view(profile).await
    }

    pub async fn by_user(&self, user_id: &str) -> ServiceResult<ProfileView> {
        let profile = self
            .store
            .profiles
            .get_by_owner(user_id)
            .await?
            .found_or(ServiceError::NotFound("Profile"))?;
        self.view(profile).await
    }

    pub async fn list(&self) -> ServiceResult<Vec<ProfileView>> {
        let mut views = Vec::new();
        for profile in self.store.profiles.list().await? {
            views.push(self.view(profile).await?);
        }
        Ok(views)
    }

    /// Creates the caller's profile, or updates it in place if one exists
    pub async fn upsert(&self, caller_id: &str, fields: ProfileFields) -> ServiceResult<Profile> {
        let profile = match self.store.profiles.get_by_owner(caller_id).await? {
            Lookup::Found(mut existing) => {
                apply_fields(&mut existing, fields);
                existing
            }
            Lookup::NotFound => {
                let mut created = Profile::new(caller_id, String::new(), Vec::new());
                apply_fields(&mut created, fields);
                info!(user_id = %caller_id, "created profile");
                created
            }
        };

        match self.store.profiles.save(&profile).await {
            Ok(()) => Ok(profile),
            // Another request created the caller's profile since the lookup
            Err(DatabaseError::DuplicateKey { .. }) => {
                Err(ServiceError::Conflict("Profile already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn add_experience(
        &self,
        caller_id: &str,
        input: NewExperience,
    ) -> ServiceResult<Profile> {
        let mut profile = self.load_own(caller_id).await?;
        insert_front(
            &mut profile.experience,
            Experience {
                id: new_id(),
                title: input.title,
                company: input.company,
                location: input.location,
                from: input.from,
                to: input.to,
                current: input.current,
                description: input.description,
            },
        );
        self.store.profiles.save(&profile).await?;
        Ok(profile)
    }

    pub async fn remove_experience(&self, caller_id: &str, exp_id: &str) -> ServiceResult<Profile> {
        let mut profile = self.load_own(caller_id).await?;
        remove_by_id(&mut profile.experience, exp_id)?;
        self.store.profiles.save(&profile).await?;
        Ok(profile)
    }

    pub async fn add_education(
        &self,
        caller_id: &str,
        input: NewEducation,
    ) -> ServiceResult<Profile> {
        let mut profile = self.load_own(caller_id).await?;
        insert_front(
            &mut profile.education,
            Education {
                id: new_id(),
                school: input.school,
                degree: input.degree,
                fieldofstudy: input.fieldofstudy,
                from: input.from,
                to: input.to,
                current: input.current,
                description: input.description,
            },
        );
        self.store.profiles.save(&profile).await?;
        Ok(profile)
    }

    pub async fn remove_education(&self, caller_id: &str, edu_id: &str) -> ServiceResult<Profile> {
        let mut profile = self.load_own(caller_id).await?;
        remove_by_id(&mut profile.education, edu_id)?;
        self.store.profiles.save(&profile).await?;
        Ok(profile)
    }
}

fn apply_fields(profile: &mut Profile, fields: ProfileFields) {
    // id, owner and embedded collections are never touched here
    if fields.company.is_some() {
        profile.company = fields.company;
    }
    if fields.website.is_some() {
        profile.website = fields.website;
    }
    if fields.location.is_some() {
        profile.location = fields.location;
    }
    if fields.bio.is_some() {
        profile.bio = fields.bio;
    }
    if fields.githubusername.is_some() {
        profile.githubusername = fields.githubusername;
    }
    if !fields.status.is_empty() {
        profile.status = fields.status;
    }
    if !fields.skills.is_empty() {
        profile.skills = fields.skills;
    }
    profile.social = fields.social;
}
