//! User persistence and the farmer directory.
//!
//! The store owns the uniqueness invariants of the data model: email is
//! globally unique (compared lowercased) and the external-provider id is
//! globally unique when present. Both are enforced through dedicated unique
//! index partitions.

use std::sync::Arc;

use krishi_commons::constants::{Partitions, DEFAULT_AVATAR_URL};
use krishi_commons::{AuthProvider, FarmerType, User, UserId};
use krishi_store::{EntityStore, StorageBackend, StorageError, UniqueIndex};
use serde::Serialize;

use crate::error::{join_err, CoreError, CoreResult};

/// Input for creating a user row.
///
/// Password hashing happens at the caller (the create-user command); the
/// store only ever sees the hash.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub auth_provider: AuthProvider,
    pub google_id: Option<String>,
    pub phone: String,
    pub location: String,
    pub farmer_type: FarmerType,
    pub primary_crops: String,
    pub avatar: Option<String>,
}

/// Display projection used when resolving message participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDisplay {
    pub name: String,
    pub avatar: String,
}

/// RocksDB-backed user store.
#[derive(Clone)]
pub struct UserStore {
    backend: Arc<dyn StorageBackend>,
    email_index: UniqueIndex,
    google_index: UniqueIndex,
}

impl EntityStore<UserId, User> for UserStore {
    fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    fn partition(&self) -> &str {
        Partitions::USERS
    }
}

impl UserStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            email_index: UniqueIndex::new(backend.clone(), Partitions::USERS_BY_EMAIL),
            google_index: UniqueIndex::new(backend.clone(), Partitions::USERS_BY_GOOGLE_ID),
            backend,
        }
    }

    /// Creates a user, enforcing uniqueness and local-signup field
    /// requirements. Synchronous; use [`UserStore::create`] from async code.
    pub fn create_sync(&self, new: NewUser) -> CoreResult<User> {
        let email = new.email.trim().to_lowercase();
        if new.name.trim().is_empty() || email.is_empty() {
            return Err(CoreError::validation("Please fill all fields"));
        }
        if new.auth_provider == AuthProvider::Local {
            // Phone, location, and primary crops are required for local signup
            if new.phone.trim().is_empty()
                || new.location.trim().is_empty()
                || new.primary_crops.trim().is_empty()
            {
                return Err(CoreError::validation("Please fill all fields"));
            }
            if new.password_hash.is_none() {
                return Err(CoreError::validation("Password is required"));
            }
        }

        let user_id = UserId::generate();
        self.email_index
            .insert(email.as_bytes(), user_id.as_str().as_bytes())
            .map_err(|e| match e {
                StorageError::UniqueConstraintViolation(_) => {
                    CoreError::conflict("User already exists")
                }
                other => CoreError::Storage(other),
            })?;

        if let Some(google_id) = &new.google_id {
            if let Err(e) = self
                .google_index
                .insert(google_id.as_bytes(), user_id.as_str().as_bytes())
            {
                self.email_index.remove(email.as_bytes())?;
                return Err(match e {
                    StorageError::UniqueConstraintViolation(_) => {
                        CoreError::conflict("User already exists")
                    }
                    other => CoreError::Storage(other),
                });
            }
        }

        let now = chrono::Utc::now().timestamp_millis();
        let user = User {
            user_id: user_id.clone(),
            name: new.name.trim().to_string(),
            email,
            password_hash: new.password_hash,
            auth_provider: new.auth_provider,
            google_id: new.google_id,
            refresh_token: None,
            phone: new.phone.trim().to_string(),
            location: new.location.trim().to_string(),
            farmer_type: new.farmer_type,
            primary_crops: new.primary_crops.trim().to_string(),
            avatar: new.avatar.unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            created_at: now,
            updated_at: now,
        };
        self.put(&user_id, &user)?;
        Ok(user)
    }

    pub fn get_sync(&self, user_id: &UserId) -> CoreResult<Option<User>> {
        Ok(self.get(user_id)?)
    }

    pub fn get_by_email_sync(&self, email: &str) -> CoreResult<Option<User>> {
        let email = email.trim().to_lowercase();
        match self.email_index.get(email.as_bytes())? {
            Some(id_bytes) => {
                let id = UserId::try_new(String::from_utf8_lossy(&id_bytes).into_owned())
                    .map_err(|e| CoreError::internal(e.to_string()))?;
                Ok(self.get(&id)?)
            }
            None => Ok(None),
        }
    }

    /// Replaces the stored refresh token, succeeding only when the presented
    /// token exactly matches the current one (at most one live token per
    /// user).
    pub fn rotate_refresh_token_sync(
        &self,
        user_id: &UserId,
        presented: Option<&str>,
        next: Option<String>,
    ) -> CoreResult<User> {
        let mut user = self
            .get(user_id)?
            .ok_or_else(|| CoreError::not_found(format!("user {}", user_id)))?;
        if user.refresh_token.as_deref() != presented {
            return Err(CoreError::validation("Invalid refresh token"));
        }
        user.refresh_token = next;
        user.updated_at = chrono::Utc::now().timestamp_millis();
        self.put(user_id, &user)?;
        Ok(user)
    }

    /// Resolves name + avatar for a participant, or `None` when the id does
    /// not resolve (dangling receiver ids are accepted at persistence).
    pub fn display_sync(&self, user_id: &UserId) -> CoreResult<Option<UserDisplay>> {
        Ok(self.get(user_id)?.map(|u| UserDisplay {
            name: u.name,
            avatar: u.avatar,
        }))
    }

    /// Every farmer, credentials stripped.
    pub fn all_farmers_sync(&self) -> CoreResult<Vec<User>> {
        Ok(self.scan_all()?.iter().map(User::public).collect())
    }

    /// Farmers sharing the caller's free-text location, excluding the caller.
    pub fn farmers_near_sync(&self, user_id: &UserId) -> CoreResult<Vec<User>> {
        let me = self
            .get(user_id)?
            .ok_or_else(|| CoreError::not_found(format!("user {}", user_id)))?;
        Ok(self
            .scan_all()?
            .iter()
            .filter(|u| u.location == me.location && u.user_id != me.user_id)
            .map(|u| u.public())
            .collect())
    }

    // Async wrappers: RocksDB calls run on the blocking pool so the actix
    // event loop never stalls on storage I/O.

    pub async fn create(&self, new: NewUser) -> CoreResult<User> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.create_sync(new))
            .await
            .map_err(join_err)?
    }

    pub async fn get_user(&self, user_id: UserId) -> CoreResult<Option<User>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.get_sync(&user_id))
            .await
            .map_err(join_err)?
    }

    pub async fn all_farmers(&self) -> CoreResult<Vec<User>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.all_farmers_sync())
            .await
            .map_err(join_err)?
    }

    pub async fn farmers_near(&self, user_id: UserId) -> CoreResult<Vec<User>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.farmers_near_sync(&user_id))
            .await
            .map_err(join_err)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_store::test_utils::TestDb;
    use krishi_store::RocksDBBackend;

    fn store() -> (TestDb, UserStore) {
        let test_db = TestDb::with_all_partitions().unwrap();
        let backend: Arc<dyn StorageBackend> = Arc::new(RocksDBBackend::new(test_db.db.clone()));
        (test_db, UserStore::new(backend))
    }

    fn local_user(email: &str) -> NewUser {
        NewUser {
            name: "Sita".into(),
            email: email.into(),
            password_hash: Some("$2b$12$hash".into()),
            auth_provider: AuthProvider::Local,
            google_id: None,
            phone: "9800000000".into(),
            location: "Chitwan".into(),
            farmer_type: FarmerType::Subsistence,
            primary_crops: "rice".into(),
            avatar: None,
        }
    }

    #[test]
    fn create_assigns_defaults_and_lowercases_email() {
        let (_guard, store) = store();
        let user = store.create_sync(local_user("Sita@Example.COM")).unwrap();

        assert_eq!(user.email, "sita@example.com");
        assert_eq!(user.avatar, DEFAULT_AVATAR_URL);
        assert_eq!(store.get_sync(&user.user_id).unwrap(), Some(user.clone()));
        assert_eq!(
            store.get_by_email_sync("SITA@example.com").unwrap(),
            Some(user)
        );
    }

    #[test]
    fn duplicate_email_is_rejected_case_insensitively() {
        let (_guard, store) = store();
        store.create_sync(local_user("sita@example.com")).unwrap();

        let err = store.create_sync(local_user("SITA@EXAMPLE.COM")).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
    }

    #[test]
    fn local_signup_requires_profile_fields() {
        let (_guard, store) = store();
        let mut new = local_user("a@b.com");
        new.primary_crops = "  ".into();
        assert!(matches!(
            store.create_sync(new),
            Err(CoreError::Validation(_))
        ));

        let mut new = local_user("a@b.com");
        new.password_hash = None;
        assert!(matches!(
            store.create_sync(new),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn google_id_is_unique() {
        let (_guard, store) = store();
        let mut first = local_user("a@b.com");
        first.auth_provider = AuthProvider::Google;
        first.password_hash = None;
        first.google_id = Some("g-1".into());
        store.create_sync(first).unwrap();

        let mut second = local_user("c@d.com");
        second.auth_provider = AuthProvider::Google;
        second.password_hash = None;
        second.google_id = Some("g-1".into());
        let err = store.create_sync(second).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));

        // The losing insert must not leave a dangling email reservation
        assert!(store.get_by_email_sync("c@d.com").unwrap().is_none());
    }

    #[test]
    fn refresh_token_rotates_only_on_exact_match() {
        let (_guard, store) = store();
        let user = store.create_sync(local_user("a@b.com")).unwrap();

        // No token stored yet: presenting none succeeds
        let user = store
            .rotate_refresh_token_sync(&user.user_id, None, Some("rt-1".into()))
            .unwrap();
        assert_eq!(user.refresh_token.as_deref(), Some("rt-1"));

        // Wrong presented token fails
        let err = store
            .rotate_refresh_token_sync(&user.user_id, Some("rt-0"), Some("rt-2".into()))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        // Exact match rotates
        let user = store
            .rotate_refresh_token_sync(&user.user_id, Some("rt-1"), Some("rt-2".into()))
            .unwrap();
        assert_eq!(user.refresh_token.as_deref(), Some("rt-2"));
    }

    #[test]
    fn directory_filters_by_location_and_strips_credentials() {
        let (_guard, store) = store();
        let sita = store.create_sync(local_user("sita@b.com")).unwrap();

        let mut ram = local_user("ram@b.com");
        ram.name = "Ram".into();
        let ram = store.create_sync(ram).unwrap();

        let mut hari = local_user("hari@b.com");
        hari.name = "Hari".into();
        hari.location = "Jumla".into();
        store.create_sync(hari).unwrap();

        let nearby = store.farmers_near_sync(&sita.user_id).unwrap();
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].user_id, ram.user_id);
        assert!(nearby[0].password_hash.is_none());

        let all = store.all_farmers_sync().unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|u| u.password_hash.is_none()));
    }
}
