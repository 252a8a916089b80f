use super::types::*;
use crate::error_handling::types::ConfigError;
use clap::Parser;
use log::debug;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Command-line arguments of the `capview` binary.
///
/// Every flag is optional and, when present, overrides the value coming from the configuration
/// file (or from the built-in default when no file is given).
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "capview")]
#[command(version)]
#[command(about = "Live dashboard for a packet-capture backend")]
pub struct CliArgs {
    /// Optional TOML configuration file
    pub config_file: Option<PathBuf>,

    /// Base URL of the capture backend, e.g. `http://localhost:5000`
    ///
    /// # Command Line
    /// Use `--backend-url <URL>` or the `CAPVIEW_BACKEND_URL` environment variable
    #[arg(long, env = "CAPVIEW_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Period of the refresh cycle while capturing, in milliseconds
    #[arg(long, env = "CAPVIEW_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// How long a notification stays visible, in milliseconds
    #[arg(long)]
    pub notification_ttl_ms: Option<u64>,

    /// Delay before the export success notification, in milliseconds
    #[arg(long)]
    pub export_feedback_delay_ms: Option<u64>,

    /// Directory where exported captures are written
    #[arg(long, env = "CAPVIEW_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// Answer "yes" to the reset confirmation without asking
    ///
    /// This is a boolean flag that doesn't take a value - its presence enables the feature
    #[arg(long = "yes", short = 'y', action = clap::ArgAction::SetTrue)]
    pub assume_yes: bool,

    /// File receiving the log output, the terminal itself is taken by the dashboard
    #[arg(long, env = "CAPVIEW_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Runtime configuration of the dashboard.
///
/// # Fields Overview
///
/// - `backend_url`: base URL every API path is joined to
/// - `poll_interval`: period of the refresh scheduler
/// - `notification_ttl`: display window of a notification
/// - `export_feedback_delay`: delay of the optimistic "export done" notification
/// - `export_dir`: where the export download is written
/// - `assume_yes`: skip the interactive confirmation on reset
/// - `log_file`: where `env_logger` writes, appended to
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    pub poll_interval_ms: u64,
    pub notification_ttl_ms: u64,
    pub export_feedback_delay_ms: u64,
    pub export_dir: PathBuf,
    pub assume_yes: bool,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            notification_ttl_ms: DEFAULT_NOTIFICATION_TTL_MS,
            export_feedback_delay_ms: DEFAULT_EXPORT_FEEDBACK_DELAY_MS,
            export_dir: PathBuf::from("."),
            assume_yes: false,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Reads and parses a TOML configuration file. The result is not validated yet.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Reading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        let defaults = Config::default();

        Ok(Self {
            backend_url: file.backend_url.unwrap_or(defaults.backend_url),
            poll_interval_ms: file.poll_interval_ms.unwrap_or(defaults.poll_interval_ms),
            notification_ttl_ms: file
                .notification_ttl_ms
                .unwrap_or(defaults.notification_ttl_ms),
            export_feedback_delay_ms: file
                .export_feedback_delay_ms
                .unwrap_or(defaults.export_feedback_delay_ms),
            export_dir: file.export_dir.unwrap_or(defaults.export_dir),
            assume_yes: file.assume_yes.unwrap_or(defaults.assume_yes),
            log_file: file.log_file.unwrap_or(defaults.log_file),
        })
    }

    /// Builds the final configuration: file (if any), then command-line overrides, then
    /// validation.
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, args: &CliArgs) {
        if let Some(url) = &args.backend_url {
            self.backend_url = url.clone();
        }
        if let Some(ms) = args.poll_interval_ms {
            self.poll_interval_ms = ms;
        }
        if let Some(ms) = args.notification_ttl_ms {
            self.notification_ttl_ms = ms;
        }
        if let Some(ms) = args.export_feedback_delay_ms {
            self.export_feedback_delay_ms = ms;
        }
        if let Some(dir) = &args.export_dir {
            self.export_dir = dir.clone();
        }
        if args.assume_yes {
            self.assume_yes = true;
        }
        if let Some(path) = &args.log_file {
            self.log_file = path.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.backend_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.backend_url, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                self.backend_url,
                url.scheme()
            )));
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::NotInRange(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.notification_ttl_ms == 0 {
            return Err(ConfigError::NotInRange(
                "notification_ttl_ms must be greater than 0".to_string(),
            ));
        }

        if !self.export_dir.is_dir() {
            return Err(ConfigError::DirectoryDoesNotExist(format!(
                "{} is not a directory",
                self.export_dir.display()
            )));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn export_feedback_delay(&self) -> Duration {
        Duration::from_millis(self.export_feedback_delay_ms)
    }
}
