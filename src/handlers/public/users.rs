use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::handlers::FieldErrors;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::NewUser;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// POST /api/users - register and receive a token
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<TokenResponse> {
    FieldErrors::new()
        .require("name", body.name.as_deref(), "Name is required")
        .check(
            "email",
            body.email.as_deref().is_some_and(looks_like_email),
            "Please include a valid email",
        )
        .check(
            "password",
            body.password.as_deref().is_some_and(|p| p.len() >= 6),
            "Please enter a password with 6 or more characters",
        )
        .finish()?;

    let input = NewUser {
        name: body.name.unwrap_or_default().trim().to_string(),
        email: body.email.unwrap_or_default(),
        password: body.password.unwrap_or_default(),
    };
    let token = state.accounts.register(input).await?;
    Ok(ApiResponse::created(TokenResponse { token }))
}
