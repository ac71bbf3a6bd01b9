//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILFILER_CONFIG` (environment variable)
//! 2. `~/.config/mailfiler/config.toml` (Linux/macOS)
//!    `%APPDATA%\mailfiler\config.toml` (Windows)
//! 3. Built-in defaults
//!
//! The destination bucket can also be set with `BUCKET_NAME`, which takes
//! precedence over the file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::rule::{default_rules, KeywordRule, KeywordTable};

/// Bucket used when neither `BUCKET_NAME` nor the config file names one.
pub const DEFAULT_BUCKET: &str = "your-default-bucket-name";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Destination storage.
    pub storage: StorageConfig,
    /// Attachment routing rules.
    pub routing: RoutingConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override directory for the log file.
    pub log_dir: Option<PathBuf>,
}

/// Which object store attachments are written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Directory tree under `root`.
    #[default]
    Local,
    /// S3-compatible service at `endpoint`.
    S3,
}

/// Destination storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
    /// Destination bucket name.
    pub bucket: Option<String>,
    /// Root directory of the local object store.
    pub root: Option<PathBuf>,
    /// S3 endpoint URL. Defaults to AWS for `region`.
    pub endpoint: Option<String>,
    /// S3 region. Defaults to `us-east-1`.
    pub region: Option<String>,
    /// S3 access key. When unset, `AWS_ACCESS_KEY_ID` or the AWS profile is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Address buckets as `<endpoint>/<bucket>` (MinIO, Garage).
    pub path_style: bool,
}

/// Attachment routing rules, tested in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub rules: Vec<KeywordRule>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl Config {
    /// Resolve the bucket name: explicit override (flag or `BUCKET_NAME`),
    /// then the config file, then [`DEFAULT_BUCKET`].
    pub fn bucket(&self, explicit: Option<&str>) -> String {
        explicit
            .filter(|b| !b.is_empty())
            .or(self.storage.bucket.as_deref().filter(|b| !b.is_empty()))
            .unwrap_or(DEFAULT_BUCKET)
            .to_string()
    }

    /// Build the keyword table. An empty rule list falls back to the defaults.
    pub fn keyword_table(&self) -> KeywordTable {
        if self.routing.rules.is_empty() {
            tracing::warn!("No routing rules configured, using defaults");
            return KeywordTable::default();
        }
        KeywordTable::new(self.routing.rules.iter().cloned())
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MAILFILER_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("mailfiler").join("config.toml"))
}

/// Return the directory for the log file.
pub fn log_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.log_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailfiler")
}
