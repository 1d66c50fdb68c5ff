//! Application context: the dependency wiring shared across HTTP handlers.
//!
//! Constructed once during server bootstrap and handed to actix as shared
//! data. Owning construction here keeps `lifecycle.rs` a thin orchestrator
//! and gives tests a single entry point for a fully wired stack.

use std::sync::Arc;

use krishi_store::StorageBackend;

use crate::error::CoreResult;
use crate::messages::{MessageService, MessageStore};
use crate::notices::{NoticeAggregator, ScrapeConfig};
use crate::presence::PresenceRegistry;
use crate::users::UserStore;

/// Shared application services.
pub struct AppContext {
    users: UserStore,
    messages: Arc<MessageService>,
    presence: Arc<PresenceRegistry>,
    notices: Arc<NoticeAggregator>,
}

impl AppContext {
    /// Wires every service on top of the given storage backend.
    pub fn init(backend: Arc<dyn StorageBackend>, scrape: ScrapeConfig) -> CoreResult<Self> {
        let users = UserStore::new(backend.clone());
        let presence = Arc::new(PresenceRegistry::new());
        let messages = Arc::new(MessageService::new(
            MessageStore::new(backend),
            users.clone(),
            presence.clone(),
        ));
        let notices = Arc::new(NoticeAggregator::new(scrape)?);

        Ok(Self {
            users,
            messages,
            presence,
            notices,
        })
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn messages(&self) -> &MessageService {
        &self.messages
    }

    pub fn presence(&self) -> &Arc<PresenceRegistry> {
        &self.presence
    }

    pub fn notices(&self) -> &NoticeAggregator {
        &self.notices
    }
}
