use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, Store};
use crate::handlers::{protected, public};
use crate::middleware::{token_auth_middleware, AuthGuard};
use crate::services::{
    AccountService, Argon2Hasher, AvatarResolver, CredentialHasher, GithubClient, Gravatar,
    PostService, ProfileService, RepositoryListing,
};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub profiles: ProfileService,
    pub posts: PostService,
    pub github: Arc<dyn RepositoryListing>,
    pub guard: AuthGuard,
    /// Present when running against Postgres
    pub database: Option<DatabaseManager>,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid token header name: {0}")]
pub struct InvalidHeaderName(String);

impl AppState {
    pub fn new(
        config: &AppConfig,
        store: Store,
        database: Option<DatabaseManager>,
    ) -> Result<Self, InvalidHeaderName> {
        let hasher: Arc<dyn CredentialHasher> = Arc::new(Argon2Hasher::default());
        let avatars: Arc<dyn AvatarResolver> = Arc::new(Gravatar);
        let github: Arc<dyn RepositoryListing> = Arc::new(GithubClient::new(config.github.clone()));
        Self::with_collaborators(config, store, database, hasher, avatars, github)
    }

    pub fn with_collaborators(
        config: &AppConfig,
        store: Store,
        database: Option<DatabaseManager>,
        hasher: Arc<dyn CredentialHasher>,
        avatars: Arc<dyn AvatarResolver>,
        github: Arc<dyn RepositoryListing>,
    ) -> Result<Self, InvalidHeaderName> {
        let header = HeaderName::from_bytes(config.security.token_header.as_bytes())
            .map_err(|_| InvalidHeaderName(config.security.token_header.clone()))?;
        let tokens = Arc::new(TokenService::new(
            &config.security.jwt_secret,
            config.security.jwt_expiry_hours,
        ));

        Ok(Self {
            accounts: AccountService::new(store.clone(), tokens.clone(), hasher, avatars),
            profiles: ProfileService::new(store.clone()),
            posts: PostService::new(store),
            github,
            guard: AuthGuard::new(tokens, header),
            database,
        })
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(build_cors(config, state.guard.header()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(public::register))
        .route("/api/auth", post(public::login))
        .route("/api/profile", get(public::list_profiles))
        .route("/api/profile/user/:user_id", get(public::profile_by_user))
        .route("/api/profile/github/:username", get(public::github_repositories))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, posts, profile};

    Router::new()
        .route("/api/auth", get(auth::current_user))
        // Profile
        .route("/api/profile", post(profile::upsert_profile).delete(profile::delete_account))
        .route("/api/profile/me", get(profile::my_profile))
        .route("/api/profile/experience", put(profile::add_experience))
        .route("/api/profile/experience/:exp_id", delete(profile::delete_experience))
        .route("/api/profile/education", put(profile::add_education))
        .route("/api/profile/education/:edu_id", delete(profile::delete_education))
        // Posts
        .route("/api/posts", post(posts::create_post).get(posts::list_posts))
        .route("/api/posts/:id", get(posts::get_post).delete(posts::delete_post))
        .route("/api/posts/like/:id", put(posts::like_post))
        .route("/api/posts/unlike/:id", put(posts::unlike_post))
        .route("/api/posts/comment/:id", post(posts::add_comment))
        .route("/api/posts/comment/:id/:comment_id", delete(posts::delete_comment))
        .route_layer(middleware::from_fn_with_state(state.guard, token_auth_middleware))
}

fn build_cors(config: &AppConfig, token_header: &HeaderName) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, token_header.clone()]);

    if config.security.cors_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|s| {
            s.parse::<HeaderValue>()
                .map_err(|e| tracing::warn!("Failed to parse origin '{}': {}", s, e))
                .ok()
        })
        .collect();
    cors.allow_origin(origins)
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "DevConnector API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "users": "/api/users (public - registration)",
                "auth": "/api/auth (POST public login, GET protected)",
                "profile": "/api/profile[/me|/user/:id|/experience|/education|/github/:name]",
                "posts": "/api/posts[/:id|/like/:id|/unlike/:id|/comment/:id[/:cid]] (protected)"
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(database) = &state.database else {
        return (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "memory" }
            })),
        );
    };

    match database.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}
