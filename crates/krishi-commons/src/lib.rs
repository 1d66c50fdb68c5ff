//! # krishi-commons
//!
//! Shared types, constants, and utilities for the Krishi Sahayogi backend.
//!
//! This crate provides foundational types used across all backend crates
//! (krishi-store, krishi-core, krishi-api, krishi-server). It stays
//! dependency-light to prevent circular dependency issues.
//!
//! ## Type-Safe Wrappers
//!
//! - `UserId`: user identifier wrapper
//! - `MessageId`: message identifier wrapper
//!
//! ## Domain Models
//!
//! The `models` module is the single source of truth for domain records:
//! - `User`: farmer account (identity, credentials, profile)
//! - `Message`: one direct message between two users
//! - `Notice`: an externally sourced announcement or subsidy document
//!
//! Do not create duplicate model definitions elsewhere in the codebase.

pub mod constants;
pub mod ids;
pub mod models;
pub mod storage_key;

pub use ids::{MessageId, UserId};
pub use models::{AuthProvider, FarmerType, Message, Notice, NoticeKind, User};
pub use storage_key::StorageKey;
