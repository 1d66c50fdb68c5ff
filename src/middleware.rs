//! Server-wide middleware configuration helpers.
//!
//! Keeps the Actix application setup focused by providing a reusable
//! constructor for the CORS layer.

use actix_cors::Cors;

use crate::config::SecuritySettings;

/// Build CORS middleware from server configuration using actix-cors.
///
/// The web and mobile frontends authenticate with bearer tokens, so
/// credentials support stays enabled for the configured origins.
pub fn build_cors(security: &SecuritySettings) -> Cors {
    let origins = &security.cors.allowed_origins;

    let mut cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);
        log::debug!("CORS: allowing any origin");
    } else {
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
        log::debug!("CORS: allowed origins: {:?}", origins);
    }

    cors
}
