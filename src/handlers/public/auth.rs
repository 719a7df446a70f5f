use axum::{extract::State, Json};
use serde::Deserialize;

use crate::app::AppState;
use crate::handlers::FieldErrors;
use crate::middleware::{ApiResponse, ApiResult};

use super::users::TokenResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth - exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<TokenResponse> {
    FieldErrors::new()
        .require("email", body.email.as_deref(), "Please include a valid email")
        .require("password", body.password.as_deref(), "Password is required")
        .finish()?;

    let token = state
        .accounts
        .login(
            body.email.as_deref().unwrap_or_default(),
            body.password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(ApiResponse::success(TokenResponse { token }))
}
