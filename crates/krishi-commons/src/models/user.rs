//! Farmer account model.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_AVATAR_URL;
use crate::ids::UserId;

/// How the account was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Email + password signup.
    Local,
    /// External identity provider.
    Google,
}

impl Default for AuthProvider {
    fn default() -> Self {
        AuthProvider::Local
    }
}

/// Farmer classification used by the directory and marketplace screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FarmerType {
    Subsistence,
    Commercial,
    Hobbyist,
    Student,
}

impl Default for FarmerType {
    fn default() -> Self {
        FarmerType::Subsistence
    }
}

/// A farmer account.
///
/// Created at registration or first OAuth login; mutated on profile update or
/// token refresh; never hard-deleted in this scope.
///
/// Invariants (enforced by the user store, not this struct):
/// - `email` is globally unique, compared case-insensitively
/// - `google_id` is globally unique when present
/// - `password_hash` is present only for `AuthProvider::Local`
/// - at most one live `refresh_token` per user; a refresh succeeds only if
///   the presented token exactly matches the stored one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,

    /// Stored lowercased.
    pub email: String,

    /// Bcrypt hash. `None` for externally-authenticated accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    #[serde(default)]
    pub auth_provider: AuthProvider,

    /// External provider subject id, when `auth_provider` is not `Local`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,

    /// Current live refresh token, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    pub phone: String,
    pub location: String,

    #[serde(default)]
    pub farmer_type: FarmerType,

    /// Free text, e.g. "rice, maize".
    pub primary_crops: String,

    #[serde(default = "default_avatar")]
    pub avatar: String,

    /// Epoch milliseconds.
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_avatar() -> String {
    DEFAULT_AVATAR_URL.to_string()
}

impl User {
    /// Returns a copy with credentials stripped, safe for API responses.
    pub fn public(&self) -> User {
        User {
            password_hash: None,
            refresh_token: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            user_id: UserId::new("u1"),
            name: "Sita".to_string(),
            email: "sita@example.com".to_string(),
            password_hash: Some("$2b$12$abcdefgh".to_string()),
            auth_provider: AuthProvider::Local,
            google_id: None,
            refresh_token: Some("rt-1".to_string()),
            phone: "9800000000".to_string(),
            location: "Chitwan".to_string(),
            farmer_type: FarmerType::Commercial,
            primary_crops: "rice, maize".to_string(),
            avatar: DEFAULT_AVATAR_URL.to_string(),
            created_at: 1,
            updated_at: 1,
        }
    }

    #[test]
    fn public_strips_credentials() {
        let user = sample_user().public();
        assert!(user.password_hash.is_none());
        assert!(user.refresh_token.is_none());
        assert_eq!(user.name, "Sita");
    }

    #[test]
    fn serialized_public_user_has_no_credential_fields() {
        let json = serde_json::to_value(sample_user().public()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("refresh_token").is_none());
        assert_eq!(json["farmer_type"], "commercial");
    }

    #[test]
    fn farmer_type_defaults_to_subsistence() {
        assert_eq!(FarmerType::default(), FarmerType::Subsistence);
    }
}
