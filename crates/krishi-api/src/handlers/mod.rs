//! HTTP and websocket handlers.

pub mod farmers;
pub mod messages;
pub mod notices;
pub mod ws;

use actix_web::{HttpMessage, HttpRequest};
use krishi_commons::UserId;

use crate::auth::AuthenticatedUser;

/// Reads the caller id attached by the auth middleware.
///
/// `None` only when a protected handler is reached without the middleware,
/// which is a wiring bug; handlers answer it with 401 rather than panicking.
pub fn caller_id(req: &HttpRequest) -> Option<UserId> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .map(|u| u.user_id.clone())
}
