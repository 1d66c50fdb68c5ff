//! Identity collaborator: JWT validation and the authenticated-user request
//! extension.
//!
//! Login, registration, OAuth, and token refresh flows live outside this
//! service; all it needs is to establish "which user id is calling" from a
//! bearer token.

pub mod jwt;

use krishi_commons::UserId;

pub use jwt::{sign_token, Claims, JwtAuth, JwtError};

/// The caller identity attached to request extensions by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl AuthenticatedUser {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}
