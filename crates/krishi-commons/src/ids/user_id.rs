//! Type-safe wrapper for user identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage_key::StorageKey;

/// Type-safe wrapper for user identifiers.
///
/// Ensures user ids cannot be accidentally used where message ids are
/// expected, and that no id can smuggle a key-separator or path character
/// into a storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

/// Error type for UserId validation failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdValidationError(pub String);

impl fmt::Display for UserIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for UserIdValidationError {}

impl UserId {
    /// Creates a new UserId from a string.
    ///
    /// # Panics
    /// Panics if the id contains reserved characters. Use `try_new()` for
    /// fallible creation.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self::try_new(id).expect("UserId contains invalid characters")
    }

    /// Creates a new UserId from a string, returning an error if validation
    /// fails.
    ///
    /// Rejects ids containing `:` (the storage key separator), path
    /// separators, null bytes, and the empty string.
    pub fn try_new(id: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let id = id.into();
        Self::validate_id(&id)?;
        Ok(Self(id))
    }

    fn validate_id(id: &str) -> Result<(), UserIdValidationError> {
        if id.is_empty() {
            return Err(UserIdValidationError("User id cannot be empty".to_string()));
        }
        for forbidden in [':', '/', '\\', '\0'] {
            if id.contains(forbidden) {
                return Err(UserIdValidationError(format!(
                    "User id cannot contain {:?}",
                    forbidden
                )));
            }
        }
        Ok(())
    }

    /// Generates a new unique UserId using NanoID (21 URL-safe characters).
    ///
    /// The default NanoID alphabet (`A-Za-z0-9_-`) is safe for storage keys
    /// and URLs.
    #[inline]
    pub fn generate() -> Self {
        Self(nanoid::nanoid!())
    }

    /// Returns the user id as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl StorageKey for UserId {
    fn storage_key(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_reserved_characters() {
        assert!(UserId::try_new("a:b").is_err());
        assert!(UserId::try_new("a/b").is_err());
        assert!(UserId::try_new("").is_err());
        assert!(UserId::try_new("farmer_01").is_ok());
    }

    #[test]
    fn generated_ids_are_unique_and_valid() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 21);
    }

    #[test]
    fn serializes_transparently() {
        let id = UserId::new("u1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u1\"");
    }
}
