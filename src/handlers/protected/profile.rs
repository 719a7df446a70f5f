use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{Profile, SocialPlatform};
use crate::error::ApiError;
use crate::handlers::{non_empty, parse_date, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{NewEducation, NewExperience, ProfileFields, ProfileView};

use super::posts::Message;

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub githubusername: Option<String>,
    /// Comma-separated
    pub skills: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl ProfileRequest {
    fn into_fields(self) -> Result<ProfileFields, ApiError> {
        let skills: Vec<String> = self
            .skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        FieldErrors::new()
            .require("status", self.status.as_deref(), "Status is required")
            .check("skills", !skills.is_empty(), "Skills is required")
            .finish()?;

        let mut social = BTreeMap::new();
        let links = [
            (SocialPlatform::Youtube, self.youtube),
            (SocialPlatform::Twitter, self.twitter),
            (SocialPlatform::Facebook, self.facebook),
            (SocialPlatform::Linkedin, self.linkedin),
            (SocialPlatform::Instagram, self.instagram),
        ];
        for (platform, url) in links {
            if let Some(url) = non_empty(url) {
                social.insert(platform, url);
            }
        }

        Ok(ProfileFields {
            company: non_empty(self.company),
            website: non_empty(self.website),
            location: non_empty(self.location),
            bio: non_empty(self.bio),
            status: self.status.unwrap_or_default().trim().to_string(),
            githubusername: non_empty(self.githubusername),
            skills,
            social,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EducationRequest {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub fieldofstudy: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

fn optional_date(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
) -> Option<chrono::NaiveDate> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    let parsed = parse_date(value);
    errors.check(field, parsed.is_some(), "Invalid date");
    parsed
}

impl ExperienceRequest {
    fn into_input(self) -> Result<NewExperience, ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .require("title", self.title.as_deref(), "Title is required")
            .require("company", self.company.as_deref(), "Company is required")
            .require("from", self.from.as_deref(), "From date is required");
        let from = optional_date(&mut errors, "from", self.from.as_deref());
        let to = optional_date(&mut errors, "to", self.to.as_deref());
        errors.finish()?;

        Ok(NewExperience {
            title: self.title.unwrap_or_default().trim().to_string(),
            company: self.company.unwrap_or_default().trim().to_string(),
            location: non_empty(self.location),
            from: from.ok_or_else(|| ApiError::bad_request("From date is required"))?,
            to,
            current: self.current,
            description: non_empty(self.description),
        })
    }
}

impl EducationRequest {
    fn into_input(self) -> Result<NewEducation, ApiError> {
        let mut errors = FieldErrors::new();
        errors
            .require("school", self.school.as_deref(), "School is required")
            .require("degree", self.degree.as_deref(), "Degree is required")
            .require("fieldofstudy", self.fieldofstudy.as_deref(), "Field of study is required")
            .require("from", self.from.as_deref(), "From date is required");
        let from = optional_date(&mut errors, "from", self.from.as_deref());
        let to = optional_date(&mut errors, "to", self.to.as_deref());
        errors.finish()?;

        Ok(NewEducation {
            school: self.school.unwrap_or_default().trim().to_string(),
            degree: self.degree.unwrap_or_default().trim().to_string(),
            fieldofstudy: self.fieldofstudy.unwrap_or_default().trim().to_string(),
            from: from.ok_or_else(|| ApiError::bad_request("From date is required"))?,
            to,
            current: self.current,
            description: non_empty(self.description),
        })
    }
}

/// GET /api/profile/me
pub async fn my_profile(State(state): State<AppState>, user: AuthUser) -> ApiResult<ProfileView> {
    Ok(ApiResponse::success(state.profiles.my_profile(&user.id).await?))
}

/// POST /api/profile - create or update the caller's profile
pub async fn upsert_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ProfileRequest>,
) -> ApiResult<Profile> {
    let fields = body.into_fields()?;
    Ok(ApiResponse::success(state.profiles.upsert(&user.id, fields).await?))
}

/// DELETE /api/profile - removes posts, profile and account
pub async fn delete_account(State(state): State<AppState>, user: AuthUser) -> ApiResult<Message> {
    state.accounts.delete_account(&user.id).await?;
    Ok(ApiResponse::success(Message { msg: "User deleted" }))
}

/// PUT /api/profile/experience
pub async fn add_experience(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ExperienceRequest>,
) -> ApiResult<Profile> {
    let input = body.into_input()?;
    Ok(ApiResponse::success(state.profiles.add_experience(&user.id, input).await?))
}

/// DELETE /api/profile/experience/:exp_id
pub async fn delete_experience(
    State(state): State<AppState>,
    user: AuthUser,
    Path(exp_id): Path<String>,
) -> ApiResult<Profile> {
    Ok(ApiResponse::success(state.profiles.remove_experience(&user.id, &exp_id).await?))
}

/// PUT /api/profile/education
pub async fn add_education(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<EducationRequest>,
) -> ApiResult<Profile> {
    let input = body.into_input()?;
    Ok(ApiResponse::success(state.profiles.add_education(&user.id, input).await?))
}

/// DELETE /api/profile/education/:edu_id
pub async fn delete_education(
    State(state): State<AppState>,
    user: AuthUser,
    Path(edu_id): Path<String>,
) -> ApiResult<Profile> {
    Ok(ApiResponse::success(state.profiles.remove_education(&user.id, &edu_id).await?))
}
