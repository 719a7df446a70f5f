use axum::extract::{Path, State};
use serde_json::Value;

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ProfileView;

/// GET /api/profile - every profile with its owner's name and avatar
pub async fn list_profiles(State(state): State<AppState>) -> ApiResult<Vec<ProfileView>> {
    let profiles = state.profiles.list().await?;
    Ok(ApiResponse::success(profiles))
}

/// GET /api/profile/user/:user_id
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<ProfileView> {
    let profile = state.profiles.by_user(&user_id).await?;
    Ok(ApiResponse::success(profile))
}

/// GET /api/profile/github/:username - latest public repositories
pub async fn github_repositories(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Value> {
    let repos = state.github.latest_repositories(&username).await?;
    Ok(ApiResponse::success(repos))
}
