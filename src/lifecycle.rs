//! Server lifecycle management helpers.
//!
//! Encapsulates the heavy lifting kept out of `main.rs`: bootstrapping
//! storage and services, wiring the HTTP server, and graceful shutdown.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Result;
use log::info;

use krishi_api::auth::JwtAuth;
use krishi_core::AppContext;
use krishi_store::{RocksDBBackend, RocksDbInit};

use crate::config::ServerConfig;
use crate::middleware;

/// Aggregated application components shared across the HTTP server and the
/// create-user command.
pub struct ApplicationComponents {
    pub app_context: Arc<AppContext>,
    pub jwt: Arc<JwtAuth>,
}

/// Initialize RocksDB and wire every service.
pub fn bootstrap(config: &ServerConfig) -> Result<ApplicationComponents> {
    let phase_start = std::time::Instant::now();
    let db = RocksDbInit::new(&config.storage.rocksdb_path).open()?;
    let backend = Arc::new(RocksDBBackend::new(db));
    info!(
        "RocksDB initialized at {} ({:.2}ms)",
        config.storage.rocksdb_path,
        phase_start.elapsed().as_secs_f64() * 1000.0
    );

    let app_context = Arc::new(AppContext::init(
        backend,
        config.notices.to_scrape_config(),
    )?);
    let jwt = Arc::new(JwtAuth::new(&config.auth.jwt_secret));

    Ok(ApplicationComponents { app_context, jwt })
}

/// Runs the HTTP server until it is stopped (ctrl-c triggers actix's
/// graceful shutdown).
pub async fn run(config: ServerConfig, components: ApplicationComponents) -> Result<()> {
    let ctx = components.app_context;
    let jwt = components.jwt;
    let security = config.security.clone();

    let host = config.server.host.clone();
    let port = config.server.port;

    let server = HttpServer::new(move || {
        let jwt = jwt.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(middleware::build_cors(&security))
            .app_data(web::Data::new(ctx.clone()))
            .app_data(web::Data::new(jwt.clone()))
            .configure(|cfg| krishi_api::routes::configure_routes(cfg, jwt.clone()))
    })
    .workers(config.server.workers)
    .bind((host.as_str(), port))?
    .run();

    info!("Listening on {}:{}", host, port);
    server.await?;
    info!("Server stopped");
    Ok(())
}
