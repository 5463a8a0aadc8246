pub mod auth;

pub use auth::{session_middleware, SessionClaims};
