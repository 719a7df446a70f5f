use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::models::{Comment, Like, Post};
use crate::handlers::FieldErrors;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

impl TextRequest {
    fn into_text(self) -> Result<String, crate::error::ApiError> {
        FieldErrors::new()
            .require("text", self.text.as_deref(), "Text is required")
            .finish()?;
        Ok(self.text.unwrap_or_default())
    }
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub msg: &'static str,
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<TextRequest>,
) -> ApiResult<Post> {
    let text = body.into_text()?;
    let post = state.posts.create(&user.id, text).await?;
    Ok(ApiResponse::created(post))
}

/// GET /api/posts - newest first
pub async fn list_posts(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Vec<Post>> {
    Ok(ApiResponse::success(state.posts.list().await?))
}

/// GET /api/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Post> {
    Ok(ApiResponse::success(state.posts.get(&id).await?))
}

/// DELETE /api/posts/:id - author only
pub async fn delete_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    state.posts.delete(&user.id, &id).await?;
    Ok(ApiResponse::success(Message { msg: "Post removed" }))
}

/// PUT /api/posts/like/:id
pub async fn like_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Vec<Like>> {
    Ok(ApiResponse::success(state.posts.like(&user.id, &id).await?))
}

/// PUT /api/posts/unlike/:id
pub async fn unlike_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Vec<Like>> {
    Ok(ApiResponse::success(state.posts.unlike(&user.id, &id).await?))
}

/// POST /api/posts/comment/:id
pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<TextRequest>,
) -> ApiResult<Vec<Comment>> {
    let text = body.into_text()?;
    let comments = state.posts.comment(&user.id, &id, text).await?;
    Ok(ApiResponse::created(comments))
}

/// DELETE /api/posts/comment/:id/:comment_id - comment author only
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> ApiResult<Vec<Comment>> {
    let comments = state.posts.remove_comment(&user.id, &id, &comment_id).await?;
    Ok(ApiResponse::success(comments))
}
