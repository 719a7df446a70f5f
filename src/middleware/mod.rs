pub mod auth;
pub mod response;

pub use auth::{token_auth_middleware, AuthError, AuthGuard, AuthUser};
pub use response::{ApiResponse, ApiResult};
