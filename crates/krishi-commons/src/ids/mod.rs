//! Type-safe identifier wrappers.

mod message_id;
mod user_id;

pub use message_id::MessageId;
pub use user_id::{UserId, UserIdValidationError};
