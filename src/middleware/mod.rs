pub mod auth;

pub use auth::{authenticate, jwt_auth_middleware};
