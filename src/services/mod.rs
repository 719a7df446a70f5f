pub mod account_service;
pub mod avatar;
pub mod credentials;
pub mod github;
pub mod post_service;
pub mod profile_service;

use thiserror::Error;

use crate::auth::TokenError;
use crate::collection::CollectionError;
use crate::database::DatabaseError;

pub use account_service::{AccountService, NewUser};
pub use avatar::{AvatarResolver, Gravatar};
pub use credentials::{Argon2Hasher, CredentialHasher};
pub use github::{GithubClient, RepositoryListing};
pub use post_service::PostService;
pub use profile_service::{NewEducation, NewExperience, ProfileFields, ProfileService, ProfileView};

/// Failures of the load → authorize → mutate → save sequence
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("No Github profile found")]
    NoGithubProfile,

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("Credential hashing failed: {0}")]
    Credential(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Storage(#[from] DatabaseError),

    #[error("Upstream request failed: {0}")]
    Upstream(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
