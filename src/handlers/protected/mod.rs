// handlers/protected/mod.rs - endpoints behind token_auth_middleware
//
// Every handler here takes an AuthUser, which the middleware attaches
// after verifying the request's token.
pub mod auth;
pub mod posts;
pub mod profile;
