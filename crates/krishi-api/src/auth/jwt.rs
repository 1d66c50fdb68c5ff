//! JWT validation and signing using the jsonwebtoken crate.

use std::fmt;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use krishi_commons::UserId;
use serde::{Deserialize, Serialize};

/// JWT authentication errors
#[derive(Debug)]
pub enum JwtError {
    /// Token is missing from the request
    MissingToken,

    /// Token format is invalid (not "Bearer <token>")
    InvalidFormat,

    /// Token signature verification failed
    InvalidSignature(String),

    /// Token has expired
    Expired,

    /// Claims do not form a valid identity
    InvalidClaims(String),

    /// Token could not be signed
    Signing(String),
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JwtError::MissingToken => write!(f, "Missing JWT token"),
            JwtError::InvalidFormat => {
                write!(f, "Invalid token format (expected 'Bearer <token>')")
            }
            JwtError::InvalidSignature(msg) => write!(f, "Invalid token signature: {}", msg),
            JwtError::Expired => write!(f, "Token has expired"),
            JwtError::InvalidClaims(msg) => write!(f, "Invalid claims: {}", msg),
            JwtError::Signing(msg) => write!(f, "Failed to sign token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: u64,

    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    /// Extracts the typed user id from the claims.
    pub fn user_id(&self) -> Result<UserId, JwtError> {
        UserId::try_new(self.sub.clone()).map_err(|e| JwtError::InvalidClaims(e.to_string()))
    }
}

/// JWT validation service. Constructed once at startup from the configured
/// secret and shared across workers.
pub struct JwtAuth {
    secret: String,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validates a raw token and returns its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::InvalidSignature(e.to_string()),
        })
    }

    /// Extracts the raw token from an `Authorization: Bearer <token>` value.
    pub fn bearer_token(header: &str) -> Result<&str, JwtError> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(JwtError::InvalidFormat)
    }
}

/// Signs a token for a user. Used by the create-user command (so a fresh
/// deployment has a working credential) and by tests.
pub fn sign_token(user_id: &UserId, secret: &str, expiry_hours: i64) -> Result<String, JwtError> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.as_str().to_string(),
        iat: now.timestamp() as u64,
        exp: (now + chrono::Duration::hours(expiry_hours)).timestamp() as u64,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::Signing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn sign_then_validate_roundtrip() {
        let user = UserId::new("u1");
        let token = sign_token(&user, SECRET, 1).unwrap();

        let auth = JwtAuth::new(SECRET);
        let claims = auth.validate(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = sign_token(&UserId::new("u1"), SECRET, 1).unwrap();
        let auth = JwtAuth::new("other-secret");
        assert!(matches!(
            auth.validate(&token),
            Err(JwtError::InvalidSignature(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign_token(&UserId::new("u1"), SECRET, -1).unwrap();
        let auth = JwtAuth::new(SECRET);
        assert!(matches!(auth.validate(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(JwtAuth::bearer_token("Bearer abc").unwrap(), "abc");
        assert!(JwtAuth::bearer_token("Basic abc").is_err());
        assert!(JwtAuth::bearer_token("Bearer ").is_err());
    }
}
