//! Storage key trait for type-safe key serialization.
//!
//! Keys in the store are plain UTF-8 strings with `:`-separated components.
//! This is safe because every component is either a NanoID (alphabet
//! `A-Za-z0-9_-`, no `:`) or a zero-padded decimal timestamp, so the byte
//! order of the encoded key matches the logical order of its components.
//!
//! The trait provides an explicit contract for storage serialization,
//! separate from `AsRef<[u8]>` which may be used for other purposes.

/// Contract for converting a typed identifier into its storage key bytes.
pub trait StorageKey {
    /// Encodes this key to bytes. The encoding must preserve the logical
    /// ordering of keys under lexicographic byte comparison.
    fn storage_key(&self) -> Vec<u8>;
}

impl StorageKey for String {
    fn storage_key(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl StorageKey for &str {
    fn storage_key(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}
