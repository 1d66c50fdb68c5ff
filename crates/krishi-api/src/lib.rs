//! # krishi-api
//!
//! The HTTP surface of the Krishi Sahayogi backend: REST handlers, the
//! websocket endpoint, JWT validation, and route configuration.

pub mod auth;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
