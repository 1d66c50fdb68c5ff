//! Direct message model.

use serde::{Deserialize, Serialize};

use crate::ids::{MessageId, UserId};

/// One direct message between two users. Immutable once written.
///
/// A conversation between A and B is the set of all messages where
/// `{sender, receiver} = {A, B}` in either order, ordered by `created_at`
/// ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub sender: UserId,
    pub receiver: UserId,
    pub text: String,

    /// Server-assigned creation timestamp, epoch milliseconds.
    pub created_at: i64,
}
