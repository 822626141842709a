//! Configuration module for the portal backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// SQLite file backing the local fallback store
    pub db_path: PathBuf,
    /// Remote document store (`mongodb://...` or `memory://`); unset means local only
    pub remote_url: Option<String>,
    /// Database name on the remote store
    pub remote_database: String,
    /// Seed the default rewards catalog at startup when none are stored
    pub seed_rewards: bool,
    /// Snapshot imported into the local store before serving
    pub import_file: Option<PathBuf>,
    /// Directory a local snapshot is exported to on shutdown
    pub export_dir: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("PORTAL_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3001".to_string())
            .parse()
            .expect("Invalid PORTAL_BIND_ADDR format");

        let db_path = env::var("PORTAL_DB_PATH")
            .unwrap_or_else(|_| "./data/portal.sqlite".to_string())
            .into();

        let remote_url = env::var("PORTAL_REMOTE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let remote_database =
            env::var("PORTAL_REMOTE_DATABASE").unwrap_or_else(|_| "intern-portal".to_string());

        let seed_rewards = env::var("PORTAL_SEED_REWARDS")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        let import_file = env::var("PORTAL_IMPORT_FILE").ok().map(PathBuf::from);
        let export_dir = env::var("PORTAL_EXPORT_DIR").ok().map(PathBuf::from);

        let log_level = env::var("PORTAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Self {
            bind_addr,
            db_path,
            remote_url,
            remote_database,
            seed_rewards,
            import_file,
            export_dir,
            log_level,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
