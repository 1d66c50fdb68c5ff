// Configuration module

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use krishi_core::notices::ScrapeConfig;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub security: SecuritySettings,
    #[serde(default)]
    pub notices: NoticeSettings,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    pub rocksdb_path: String,
}

/// Identity settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    /// Token lifetime handed out by the create-user command.
    #[serde(default = "default_jwt_expiry_hours")]
    pub jwt_expiry_hours: i64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default = "default_logs_path")]
    pub logs_path: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_to_console: true,
            log_to_file: false,
            logs_path: default_logs_path(),
        }
    }
}

/// Security settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecuritySettings {
    #[serde(default)]
    pub cors: CorsSettings,
}

/// CORS policy for the web and mobile frontends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsSettings {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Notice aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeSettings {
    #[serde(default = "default_doa_homepage")]
    pub homepage_url: String,
    #[serde(default = "default_doa_base")]
    pub base_url: String,
    #[serde(default = "default_doa_fallback")]
    pub fallback_notice_url: String,
    #[serde(default = "default_scrape_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_homepage_timeout")]
    pub homepage_timeout_secs: u64,
    #[serde(default = "default_notice_timeout")]
    pub notice_timeout_secs: u64,
    #[serde(default = "default_row_limit")]
    pub row_limit: usize,
}

impl Default for NoticeSettings {
    fn default() -> Self {
        Self {
            homepage_url: default_doa_homepage(),
            base_url: default_doa_base(),
            fallback_notice_url: default_doa_fallback(),
            user_agent: default_scrape_user_agent(),
            homepage_timeout_secs: default_homepage_timeout(),
            notice_timeout_secs: default_notice_timeout(),
            row_limit: default_row_limit(),
        }
    }
}

impl NoticeSettings {
    pub fn to_scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            homepage_url: self.homepage_url.clone(),
            base_url: self.base_url.clone(),
            fallback_notice_url: self.fallback_notice_url.clone(),
            user_agent: self.user_agent.clone(),
            homepage_timeout_secs: self.homepage_timeout_secs,
            notice_timeout_secs: self.notice_timeout_secs,
            row_limit: self.row_limit,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 7000,
                workers: default_workers(),
            },
            storage: StorageSettings {
                rocksdb_path: "./data/rocksdb".to_string(),
            },
            auth: AuthSettings {
                jwt_secret: "default_secret_for_development_replace_immediately".to_string(),
                jwt_expiry_hours: default_jwt_expiry_hours(),
            },
            logging: LoggingSettings::default(),
            security: SecuritySettings::default(),
            notices: NoticeSettings::default(),
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
}

fn default_jwt_expiry_hours() -> i64 {
    // 30 days
    720
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_logs_path() -> String {
    "logs".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:3001".to_string(),
        "http://localhost:3002".to_string(),
    ]
}

fn default_doa_homepage() -> String {
    ScrapeConfig::default().homepage_url
}

fn default_doa_base() -> String {
    ScrapeConfig::default().base_url
}

fn default_doa_fallback() -> String {
    ScrapeConfig::default().fallback_notice_url
}

fn default_scrape_user_agent() -> String {
    ScrapeConfig::default().user_agent
}

fn default_homepage_timeout() -> u64 {
    ScrapeConfig::default().homepage_timeout_secs
}

fn default_notice_timeout() -> u64 {
    ScrapeConfig::default().notice_timeout_secs
}

fn default_row_limit() -> usize {
    ScrapeConfig::default().row_limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 7000

            [storage]
            rocksdb_path = "/tmp/krishi"

            [auth]
            jwt_secret = "secret"
        "#;
        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.auth.jwt_expiry_hours, 720);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.security.cors.allowed_origins.len(), 3);
        assert_eq!(config.notices.homepage_timeout_secs, 8);
        assert_eq!(config.notices.row_limit, 31);
    }
}
