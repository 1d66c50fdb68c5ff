// Krishi Sahayogi Server entrypoint
//!
//! The heavy lifting (initialization, middleware wiring, shutdown) lives in
//! dedicated modules so this file remains a thin orchestrator.

mod commands;

use std::env;

use anyhow::Result;
use log::info;

use krishi_server::config::ServerConfig;
use krishi_server::{lifecycle, logging};

const CONFIG_PATH: &str = "config.toml";

#[actix_web::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = if std::path::Path::new(CONFIG_PATH).exists() {
        match ServerConfig::from_file(CONFIG_PATH) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("FATAL: failed to load {}: {}", CONFIG_PATH, e);
                std::process::exit(1);
            }
        }
    } else {
        eprintln!(
            "No {} found, using development defaults (replace the JWT secret before deploying)",
            CONFIG_PATH
        );
        ServerConfig::default()
    };

    logging::init_logging(&config.logging)?;

    if args.get(1).map(String::as_str) == Some("create-user") {
        let components = lifecycle::bootstrap(&config)?;
        return commands::create_user::run(&args[2..], &config, &components).await;
    }

    info!(
        "Krishi Sahayogi Server v{} (commit {}, branch {}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_COMMIT_HASH"),
        env!("GIT_BRANCH"),
        env!("BUILD_DATE")
    );
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    let components = lifecycle::bootstrap(&config)?;
    lifecycle::run(config, components).await
}
