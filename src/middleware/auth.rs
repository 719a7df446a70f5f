use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use crate::auth::{TokenError, TokenService};
use crate::error::ApiError;

/// Authenticated caller, attached to the request by [`token_auth_middleware`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no token supplied")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::unauthorized("No token, authorization denied"),
            AuthError::InvalidToken(_) => ApiError::unauthorized("Token is not valid"),
        }
    }
}

/// Token header name plus the verifier behind it
#[derive(Clone, Debug)]
pub struct AuthGuard {
    tokens: Arc<TokenService>,
    header: HeaderName,
}

impl AuthGuard {
    pub fn new(tokens: Arc<TokenService>, header: HeaderName) -> Self {
        Self { tokens, header }
    }

    pub fn header(&self) -> &HeaderName {
        &self.header
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let token = headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let id = self.tokens.verify(token)?;
        Ok(AuthUser { id })
    }
}

/// Rejects requests without a valid token and attaches the caller otherwise
pub async fn token_auth_middleware(
    State(guard): State<AuthGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = match guard.authenticate(request.headers()) {
        Ok(user) => user,
        Err(AuthError::MissingToken) => {
            tracing::debug!(path = %request.uri().path(), "request without token");
            return Err(AuthError::MissingToken.into());
        }
        Err(AuthError::InvalidToken(e)) => {
            tracing::warn!(path = %request.uri().path(), kind = e.kind(), "rejected token: {}", e);
            return Err(AuthError::InvalidToken(e).into());
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AuthError::MissingToken.into())
    }
}
