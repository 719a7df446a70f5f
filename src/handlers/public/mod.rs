// handlers/public/mod.rs - endpoints that do not require a token
//
// Token acquisition (register, login) and read-only profile browsing.
pub mod auth;
pub mod profile;
pub mod users;

pub use auth::login;
pub use profile::{github_repositories, list_profiles, profile_by_user};
pub use users::register;
