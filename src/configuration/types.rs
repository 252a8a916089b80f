use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_NOTIFICATION_TTL_MS: u64 = 3000;
pub const DEFAULT_EXPORT_FEEDBACK_DELAY_MS: u64 = 1000;
pub const DEFAULT_LOG_FILE: &str = "capview.log";

/// Shape of the TOML configuration file.
///
/// Every key is optional, missing keys fall back to the built-in defaults.
#[derive(Debug, Default, Deserialize, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub backend_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub notification_ttl_ms: Option<u64>,
    pub export_feedback_delay_ms: Option<u64>,
    pub export_dir: Option<PathBuf>,
    pub assume_yes: Option<bool>,
    pub log_file: Option<PathBuf>,
}
