//! Configuration management for the backup tool.
//!
//! Loads configuration from an optional TOML file, with environment
//! variable overrides for the storage endpoint and credentials.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Storage service base URL
    #[serde(default)]
    pub url: Option<String>,

    /// Service-role key with read access to the bucket
    #[serde(default)]
    pub service_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Bucket to back up
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Maximum archive age in days before the sweeper deletes it
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    /// Local directory holding staging directories and archives
    #[serde(default = "default_backup_root")]
    pub backup_root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append-mode log file, mirrored to the console
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

// Default values
fn default_bucket() -> String {
    "resumes".to_string()
}

fn default_retention_days() -> i64 {
    90
}

fn default_backup_root() -> PathBuf {
    PathBuf::from("./backups/storage")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("backups/backup.log")
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            retention_days: default_retention_days(),
            backup_root: default_backup_root(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Overlay storage endpoint and credentials from the environment.
    ///
    /// `VITE_SUPABASE_URL` is checked before `SUPABASE_URL`; empty values
    /// count as unset.
    pub fn apply_env(&mut self) {
        let _ = dotenvy::dotenv();

        if let Some(url) = env_nonempty("VITE_SUPABASE_URL").or_else(|| env_nonempty("SUPABASE_URL"))
        {
            self.storage.url = Some(url);
        }
        if let Some(key) = env_nonempty("SUPABASE_SERVICE_ROLE_KEY") {
            self.storage.service_key = Some(key);
        }
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
