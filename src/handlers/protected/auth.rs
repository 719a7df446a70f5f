use axum::extract::State;

use crate::app::AppState;
use crate::database::models::PublicUser;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth - the caller's account
pub async fn current_user(State(state): State<AppState>, user: AuthUser) -> ApiResult<PublicUser> {
    let me = state.accounts.current_user(&user.id).await?;
    Ok(ApiResponse::success(me))
}
