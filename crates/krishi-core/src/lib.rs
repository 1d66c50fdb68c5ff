//! # krishi-core
//!
//! Business logic for the Krishi Sahayogi backend.
//!
//! This crate is HTTP-framework-free: the API layer (krishi-api) calls into
//! the services here, and the services talk to storage through the
//! krishi-store abstraction.
//!
//! ## Modules
//!
//! - `users`: user persistence, uniqueness invariants, farmer directory
//! - `messages`: message persistence, conversation retrieval, live push
//! - `presence`: in-process user → live channel registry
//! - `notices`: multi-source government notice aggregation with fallback
//! - `app_context`: dependency wiring shared across handlers

pub mod app_context;
pub mod error;
pub mod messages;
pub mod notices;
pub mod presence;
pub mod users;

pub use app_context::AppContext;
pub use error::{CoreError, CoreResult};
