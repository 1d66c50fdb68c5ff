//! Message persistence, conversation retrieval, and live push.
//!
//! Messages are stored under `{conversation}:{created_at}:{message_id}` keys,
//! where `conversation` is the lexically sorted pair of participant ids. A
//! prefix scan therefore yields one conversation already ordered by creation
//! time, which is the only read pattern this subsystem has.

use std::sync::Arc;

use krishi_commons::constants::Partitions;
use krishi_commons::{Message, MessageId, StorageKey, UserId};
use krishi_store::{EntityStore, StorageBackend};
use serde::Serialize;

use crate::error::{join_err, CoreError, CoreResult};
use crate::presence::{PresenceRegistry, ServerEvent};
use crate::users::{UserDisplay, UserStore};

/// Canonical conversation identifier: the sorted participant pair.
pub fn conversation_key(a: &UserId, b: &UserId) -> String {
    if a.as_str() <= b.as_str() {
        format!("{}:{}", a, b)
    } else {
        format!("{}:{}", b, a)
    }
}

/// Composite storage key for one message.
#[derive(Debug, Clone)]
pub struct MessageKey {
    pub conversation: String,
    pub created_at: i64,
    pub message_id: MessageId,
}

impl MessageKey {
    pub fn for_message(message: &Message) -> Self {
        Self {
            conversation: conversation_key(&message.sender, &message.receiver),
            created_at: message.created_at,
            message_id: message.message_id.clone(),
        }
    }
}

impl StorageKey for MessageKey {
    fn storage_key(&self) -> Vec<u8> {
        // Zero-padded decimal keeps byte order aligned with timestamp order
        format!(
            "{}:{:020}:{}",
            self.conversation, self.created_at, self.message_id
        )
        .into_bytes()
    }
}

/// A message with participant display fields resolved for the client.
///
/// Display fields are `None` when the participant id no longer resolves to a
/// user; sending to a nonexistent id succeeds at the persistence layer.
#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub message_id: MessageId,
    pub sender: UserId,
    pub receiver: UserId,
    pub text: String,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_avatar: Option<String>,
}

impl MessageView {
    fn new(
        message: Message,
        sender_display: Option<UserDisplay>,
        receiver_display: Option<UserDisplay>,
    ) -> Self {
        let (sender_name, sender_avatar) = split(sender_display);
        let (receiver_name, receiver_avatar) = split(receiver_display);
        Self {
            message_id: message.message_id,
            sender: message.sender,
            receiver: message.receiver,
            text: message.text,
            created_at: message.created_at,
            sender_name,
            sender_avatar,
            receiver_name,
            receiver_avatar,
        }
    }
}

fn split(display: Option<UserDisplay>) -> (Option<String>, Option<String>) {
    match display {
        Some(d) => (Some(d.name), Some(d.avatar)),
        None => (None, None),
    }
}

/// RocksDB-backed message store.
#[derive(Clone)]
pub struct MessageStore {
    backend: Arc<dyn StorageBackend>,
}

impl EntityStore<MessageKey, Message> for MessageStore {
    fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    fn partition(&self) -> &str {
        Partitions::MESSAGES
    }
}

impl MessageStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn append_sync(&self, message: &Message) -> CoreResult<()> {
        Ok(self.put(&MessageKey::for_message(message), message)?)
    }

    /// Full history of the unordered pair, ascending by creation time.
    pub fn conversation_sync(&self, a: &UserId, b: &UserId) -> CoreResult<Vec<Message>> {
        let prefix = format!("{}:", conversation_key(a, b));
        Ok(self.scan_prefix(prefix.as_bytes(), None)?)
    }
}

/// Message sending and conversation retrieval.
///
/// Delivery to a live receiver is at-most-once: one push attempt at send
/// time, no acknowledgment, no retry, nothing queued for offline users.
pub struct MessageService {
    store: MessageStore,
    users: UserStore,
    presence: Arc<PresenceRegistry>,
}

impl MessageService {
    pub fn new(store: MessageStore, users: UserStore, presence: Arc<PresenceRegistry>) -> Self {
        Self {
            store,
            users,
            presence,
        }
    }

    /// Persists a message and notifies the receiver's live connection if one
    /// is registered.
    ///
    /// `sender` must come from the authenticated caller, never the request
    /// body.
    pub async fn send(
        &self,
        sender: UserId,
        receiver: UserId,
        text: &str,
    ) -> CoreResult<MessageView> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::validation("Message text is required"));
        }

        let message = Message {
            message_id: MessageId::generate(),
            sender,
            receiver,
            text: text.to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
        };

        let store = self.store.clone();
        let users = self.users.clone();
        let view = tokio::task::spawn_blocking(move || -> CoreResult<MessageView> {
            store.append_sync(&message)?;
            let sender_display = users.display_sync(&message.sender)?;
            let receiver_display = users.display_sync(&message.receiver)?;
            Ok(MessageView::new(message, sender_display, receiver_display))
        })
        .await
        .map_err(join_err)??;

        // Fire-and-forget: a closed channel means the receiver disconnected
        // between lookup and send, which is the same as being offline.
        if let Some(channel) = self.presence.sender_for(&view.receiver) {
            if channel.send(ServerEvent::NewMessage(view.clone())).is_err() {
                log::debug!("receiver {} disconnected before push", view.receiver);
            }
        }

        Ok(view)
    }

    /// Every message between `me` and `other`, oldest first.
    pub async fn conversation(&self, me: UserId, other: UserId) -> CoreResult<Vec<MessageView>> {
        let store = self.store.clone();
        let users = self.users.clone();
        tokio::task::spawn_blocking(move || -> CoreResult<Vec<MessageView>> {
            let messages = store.conversation_sync(&me, &other)?;
            // Two participants at most; resolve each display once
            let me_display = users.display_sync(&me)?;
            let other_display = users.display_sync(&other)?;
            Ok(messages
                .into_iter()
                .map(|m| {
                    let (sender_display, receiver_display) = if m.sender == me {
                        (me_display.clone(), other_display.clone())
                    } else {
                        (other_display.clone(), me_display.clone())
                    };
                    MessageView::new(m, sender_display, receiver_display)
                })
                .collect())
        })
        .await
        .map_err(join_err)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::NewUser;
    use krishi_commons::{AuthProvider, FarmerType};
    use krishi_store::test_utils::TestDb;
    use krishi_store::RocksDBBackend;
    use tokio::sync::mpsc;

    struct Fixture {
        _db: TestDb,
        users: UserStore,
        presence: Arc<PresenceRegistry>,
        service: MessageService,
    }

    fn fixture() -> Fixture {
        let db = TestDb::with_all_partitions().unwrap();
        let backend: Arc<dyn StorageBackend> = Arc::new(RocksDBBackend::new(db.db.clone()));
        let users = UserStore::new(backend.clone());
        let presence = Arc::new(PresenceRegistry::new());
        let service = MessageService::new(
            MessageStore::new(backend),
            users.clone(),
            presence.clone(),
        );
        Fixture {
            _db: db,
            users,
            presence,
            service,
        }
    }

    fn farmer(users: &UserStore, name: &str, email: &str) -> UserId {
        users
            .create_sync(NewUser {
                name: name.into(),
                email: email.into(),
                password_hash: Some("$2b$12$hash".into()),
                auth_provider: AuthProvider::Local,
                google_id: None,
                phone: "98".into(),
                location: "Chitwan".into(),
                farmer_type: FarmerType::Subsistence,
                primary_crops: "rice".into(),
                avatar: None,
            })
            .unwrap()
            .user_id
    }

    #[test]
    fn conversation_key_is_order_independent() {
        let a = UserId::new("alice");
        let b = UserId::new("bob");
        assert_eq!(conversation_key(&a, &b), conversation_key(&b, &a));
        assert_eq!(conversation_key(&a, &b), "alice:bob");
    }

    #[tokio::test]
    async fn send_resolves_display_fields_and_persists() {
        let fx = fixture();
        let sita = farmer(&fx.users, "Sita", "sita@b.com");
        let ram = farmer(&fx.users, "Ram", "ram@b.com");

        let view = fx
            .service
            .send(sita.clone(), ram.clone(), "Hello")
            .await
            .unwrap();
        assert_eq!(view.sender_name.as_deref(), Some("Sita"));
        assert_eq!(view.receiver_name.as_deref(), Some("Ram"));
        assert_eq!(view.text, "Hello");

        let history = fx.service.conversation(sita, ram).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message_id, view.message_id);
    }

    #[tokio::test]
    async fn conversation_is_complete_ordered_and_isolated() {
        let fx = fixture();
        let sita = farmer(&fx.users, "Sita", "sita@b.com");
        let ram = farmer(&fx.users, "Ram", "ram@b.com");
        let hari = farmer(&fx.users, "Hari", "hari@b.com");

        for (from, to, text) in [
            (&sita, &ram, "one"),
            (&ram, &sita, "two"),
            (&sita, &hari, "other pair"),
            (&sita, &ram, "three"),
        ] {
            fx.service
                .send(from.clone(), to.clone(), text)
                .await
                .unwrap();
        }

        let history = fx
            .service
            .conversation(ram.clone(), sita.clone())
            .await
            .unwrap();
        let texts: Vec<&str> = history.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        let stamps: Vec<i64> = history.iter().map(|m| m.created_at).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));

        // No leakage between pairs, and the read path is idempotent
        let again = fx.service.conversation(ram, sita).await.unwrap();
        assert_eq!(again.len(), 3);
    }

    #[tokio::test]
    async fn empty_conversation_is_empty_not_an_error() {
        let fx = fixture();
        let sita = farmer(&fx.users, "Sita", "sita@b.com");
        let hari = farmer(&fx.users, "Hari", "hari@b.com");

        let history = fx.service.conversation(sita, hari).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn whitespace_text_is_rejected() {
        let fx = fixture();
        let sita = farmer(&fx.users, "Sita", "sita@b.com");
        let ram = farmer(&fx.users, "Ram", "ram@b.com");

        let err = fx.service.send(sita, ram, "   ").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn offline_receiver_still_persists_without_error() {
        let fx = fixture();
        let sita = farmer(&fx.users, "Sita", "sita@b.com");
        let ram = farmer(&fx.users, "Ram", "ram@b.com");

        // No presence entry for ram
        fx.service
            .send(sita.clone(), ram.clone(), "while you were out")
            .await
            .unwrap();

        let history = fx.service.conversation(sita, ram).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn online_receiver_gets_one_push() {
        let fx = fixture();
        let sita = farmer(&fx.users, "Sita", "sita@b.com");
        let ram = farmer(&fx.users, "Ram", "ram@b.com");

        let (tx, mut rx) = mpsc::unbounded_channel();
        fx.presence.register(ram.clone(), tx);

        fx.service
            .send(sita.clone(), ram.clone(), "ping")
            .await
            .unwrap();

        let ServerEvent::NewMessage(pushed) = rx.try_recv().unwrap();
        assert_eq!(pushed.receiver, ram);
        assert_eq!(pushed.text, "ping");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dangling_receiver_id_is_accepted_with_unresolved_display() {
        let fx = fixture();
        let sita = farmer(&fx.users, "Sita", "sita@b.com");
        let ghost = UserId::new("no-such-user");

        let view = fx.service.send(sita, ghost, "anyone there?").await.unwrap();
        assert!(view.receiver_name.is_none());
        assert!(view.receiver_avatar.is_none());
    }
}
