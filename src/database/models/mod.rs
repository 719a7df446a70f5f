pub mod post;
pub mod profile;
pub mod user;

pub use post::{Comment, Like, Post};
pub use profile::{Education, Experience, Profile, SocialPlatform};
pub use user::{PublicUser, User, UserSummary};

/// Fresh id for documents and embedded entries
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
