//! API routes configuration.
//!
//! All REST endpoints live under the /v1/api prefix; the websocket endpoint
//! is /v1/ws:
//! - POST /v1/api/messages - send a message (auth)
//! - GET  /v1/api/messages/{user_id} - conversation history (auth)
//! - GET  /v1/api/notices - aggregated government notices (public)
//! - GET  /v1/api/farmers - farmer directory (public)
//! - GET  /v1/api/farmers/nearby - farmers at the caller's location (auth)
//! - GET  /v1/api/healthcheck - health check (public)
//! - GET  /v1/ws - websocket for live message notifications (auth)

use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::auth::JwtAuth;
use crate::handlers;
use crate::middleware::AuthMiddleware;

/// Configures all routes. The JWT service is also registered as app data by
/// the server; it is passed here separately so the middleware can be
/// constructed per scope.
pub fn configure_routes(cfg: &mut web::ServiceConfig, jwt: Arc<JwtAuth>) {
    cfg.service(
        web::scope("/v1")
            .service(
                web::scope("/api")
                    .route("/healthcheck", web::get().to(healthcheck_handler))
                    .route("/notices", web::get().to(handlers::notices::get_notices))
                    .route("/farmers", web::get().to(handlers::farmers::get_farmers))
                    .service(
                        web::scope("")
                            .wrap(AuthMiddleware::new(jwt))
                            .route(
                                "/messages",
                                web::post().to(handlers::messages::send_message),
                            )
                            .route(
                                "/messages/{user_id}",
                                web::get().to(handlers::messages::get_conversation),
                            )
                            .route(
                                "/farmers/nearby",
                                web::get().to(handlers::farmers::get_nearby_farmers),
                            ),
                    ),
            )
            .service(handlers::ws::websocket_handler),
    );
}

/// Health check endpoint handler.
async fn healthcheck_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1"
    }))
}
