// Logging module — powered by tracing-subscriber
//
// Uses tracing-subscriber for the actual output layers. A compatibility
// bridge (`tracing_log::LogTracer`) captures all existing `log::*` macro
// calls across the crates and routes them through the subscriber.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Build the `EnvFilter` from the base level plus hardcoded noisy-crate
/// overrides.
fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let mut directives = vec![level.to_string()];

    // Suppress noisy third-party crates
    let noisy: &[(&str, &str)] = &[
        ("actix_server", "warn"),
        ("actix_web", "warn"),
        ("h2", "warn"),
        ("hyper", "warn"),
        ("reqwest", "warn"),
        ("html5ever", "warn"),
        ("selectors", "warn"),
    ];
    for (target, target_level) in noisy {
        directives.push(format!("{}={}", target, target_level));
    }

    Ok(EnvFilter::try_new(directives.join(","))?)
}

/// Initializes global logging from config. Must run before any other side
/// effects so startup problems are captured.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    // Bridge `log` macros into tracing before the subscriber goes live
    let _ = tracing_log::LogTracer::init();

    let filter = build_env_filter(&settings.level)?;

    let console_layer = settings
        .log_to_console
        .then(|| tracing_subscriber::fmt::layer().with_target(true));

    let file_layer = if settings.log_to_file {
        let dir = Path::new(&settings.logs_path);
        fs::create_dir_all(dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("server.log"))?;
        Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_accepts_configured_levels() {
        assert!(build_env_filter("info").is_ok());
        assert!(build_env_filter("debug").is_ok());
        assert!(build_env_filter("trace").is_ok());
    }
}
