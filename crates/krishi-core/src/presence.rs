//! In-process presence registry.
//!
//! Maps a user id to the live channel of its websocket connection. The
//! registry is constructed once at startup and dependency-injected into the
//! message service and the websocket handler — there is no ambient singleton.
//!
//! Presence is single-process, in-memory, and non-durable: restarting the
//! process loses all entries. At most one channel is kept per user; a later
//! registration replaces the earlier one, and teardown is nonce-guarded so a
//! stale disconnect cannot evict a newer connection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::mpsc;

use krishi_commons::UserId;

use crate::messages::MessageView;

/// Server-initiated event pushed onto a live channel.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    NewMessage(MessageView),
}

/// Sending half of a live connection's event channel.
pub type LiveSender = mpsc::UnboundedSender<ServerEvent>;

struct Entry {
    nonce: u64,
    sender: LiveSender,
}

/// Registry of currently-connected users.
#[derive(Default)]
pub struct PresenceRegistry {
    next_nonce: AtomicU64,
    entries: RwLock<HashMap<UserId, Entry>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `user_id` with a live channel, replacing any previous
    /// channel for the same user. Returns the nonce required to unregister.
    pub fn register(&self, user_id: UserId, sender: LiveSender) -> u64 {
        let nonce = self.next_nonce.fetch_add(1, Ordering::Relaxed);
        self.entries
            .write()
            .insert(user_id, Entry { nonce, sender });
        nonce
    }

    /// Removes the association, but only while it still belongs to the
    /// connection that created it.
    pub fn unregister(&self, user_id: &UserId, nonce: u64) {
        let mut entries = self.entries.write();
        if entries.get(user_id).is_some_and(|e| e.nonce == nonce) {
            entries.remove(user_id);
        }
    }

    /// Channel for a user, if one is registered.
    pub fn sender_for(&self, user_id: &UserId) -> Option<LiveSender> {
        self.entries.read().get(user_id).map(|e| e.sender.clone())
    }

    /// Number of users currently online.
    pub fn online_count(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_commons::MessageId;

    fn view() -> MessageView {
        MessageView {
            message_id: MessageId::new("m1"),
            sender: UserId::new("u1"),
            receiver: UserId::new("u2"),
            text: "Hello".into(),
            created_at: 1,
            sender_name: None,
            sender_avatar: None,
            receiver_name: None,
            receiver_avatar: None,
        }
    }

    #[test]
    fn lookup_reflects_registration() {
        let registry = PresenceRegistry::new();
        let user = UserId::new("u2");
        assert!(registry.sender_for(&user).is_none());

        let (tx, mut rx) = mpsc::unbounded_channel();
        let nonce = registry.register(user.clone(), tx);
        assert_eq!(registry.online_count(), 1);

        registry
            .sender_for(&user)
            .unwrap()
            .send(ServerEvent::NewMessage(view()))
            .unwrap();
        assert!(matches!(rx.try_recv(), Ok(ServerEvent::NewMessage(_))));

        registry.unregister(&user, nonce);
        assert!(registry.sender_for(&user).is_none());
    }

    #[test]
    fn stale_disconnect_does_not_evict_newer_connection() {
        let registry = PresenceRegistry::new();
        let user = UserId::new("u2");

        let (tx1, _rx1) = mpsc::unbounded_channel();
        let old_nonce = registry.register(user.clone(), tx1);

        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let _new_nonce = registry.register(user.clone(), tx2);

        // The first connection closes late; its teardown must be a no-op
        registry.unregister(&user, old_nonce);

        registry
            .sender_for(&user)
            .expect("newer channel must survive")
            .send(ServerEvent::NewMessage(view()))
            .unwrap();
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn new_message_event_wire_shape() {
        let json = serde_json::to_value(ServerEvent::NewMessage(view())).unwrap();
        assert_eq!(json["event"], "newMessage");
        assert_eq!(json["data"]["receiver"], "u2");
    }
}
