//! Backup runner — orchestrates a single bucket backup run.
//!
//! Lists the bucket, downloads every object into a timestamped staging
//! directory, writes a manifest, compresses the result into a tar.gz
//! archive and prunes archives past the retention window.

pub mod manifest;

use crate::archive;
use crate::config::BackupConfig;
use crate::retention;
use crate::storage::ObjectStore;
use crate::utils::errors::{BackupError, Result};
use manifest::Manifest;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Name prefix shared by staging directories and archive files.
pub const ARCHIVE_PREFIX: &str = "storage_backup_";

/// Extension of finished archives.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// Sortable timestamp embedded in staging and archive names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Summary of a completed backup run.
#[derive(Debug)]
pub struct BackupReport {
    pub total_files: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub failed_files: Vec<String>,
    pub archive_path: PathBuf,
    pub archive_bytes: u64,
}

/// Executes backup runs against any [`ObjectStore`].
pub struct BackupRunner<S> {
    store: S,
    config: BackupConfig,
}

impl<S: ObjectStore> BackupRunner<S> {
    pub fn new(store: S, config: BackupConfig) -> Self {
        Self { store, config }
    }

    /// Execute one backup run.
    ///
    /// Returns `Ok(None)` when the bucket is empty — a valid terminal
    /// state with no archive produced.
    pub async fn run(&self) -> Result<Option<BackupReport>> {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.execute(&timestamp).await
    }

    async fn execute(&self, timestamp: &str) -> Result<Option<BackupReport>> {
        std::fs::create_dir_all(&self.config.backup_root)?;

        // Non-recursive create: a second run landing on the same second
        // collides here instead of mixing two runs in one staging tree.
        let staging_dir = self
            .config
            .backup_root
            .join(format!("{}{}", ARCHIVE_PREFIX, timestamp));
        std::fs::create_dir(&staging_dir)?;

        info!("Starting storage backup for bucket: {}", self.config.bucket);

        let entries = match self.store.list(&self.config.bucket).await {
            Ok(entries) => entries,
            Err(e) => {
                error!("Failed to list files: {}", e);
                return Err(e);
            }
        };

        if entries.is_empty() {
            info!("No files found in bucket");
            let _ = std::fs::remove_dir(&staging_dir);
            return Ok(None);
        }

        info!("Found {} files to backup", entries.len());

        let mut downloaded = 0usize;
        let mut failed = 0usize;
        let mut failed_files = Vec::new();
        let mut listed_names = Vec::new();

        for entry in &entries {
            if entry.name.is_empty() {
                continue;
            }
            listed_names.push(entry.name.clone());

            match self.download_object(&staging_dir, &entry.name).await {
                Ok(()) => {
                    downloaded += 1;
                    debug!("Downloaded: {}", entry.name);
                }
                Err(e) => {
                    error!("Error downloading {}: {}", entry.name, e);
                    failed += 1;
                    failed_files.push(entry.name.clone());
                }
            }
        }

        let manifest = Manifest {
            timestamp: timestamp.to_string(),
            bucket: self.config.bucket.clone(),
            total_files: entries.len(),
            downloaded,
            failed,
            failed_files: failed_files.clone(),
            files: listed_names,
        };
        let manifest_path = manifest.write_to(&staging_dir)?;
        info!("Manifest created: {}", manifest_path.display());

        let archive_path = self
            .config
            .backup_root
            .join(format!("{}{}{}", ARCHIVE_PREFIX, timestamp, ARCHIVE_SUFFIX));
        info!("Creating archive: {}", archive_path.display());

        // Staging is intentionally preserved when compression fails
        let archive_bytes = match self.compress_staging(&staging_dir, &archive_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to create archive: {}", e);
                return Err(e);
            }
        };
        info!("Archive created: {}", archive_path.display());

        std::fs::remove_dir_all(&staging_dir)?;
        info!("Removed uncompressed backup directory");

        info!(
            "Archive size: {:.2} MB",
            archive_bytes as f64 / (1024.0 * 1024.0)
        );
        info!("Backup summary:");
        info!("  Files downloaded: {}", downloaded);
        info!("  Files failed: {}", failed);
        info!("  Archive: {}", archive_path.display());
        if failed > 0 {
            warn!("  Failed files: {}", failed_files.join(", "));
        }

        if let Err(e) = retention::sweep(&self.config.backup_root, self.config.retention_days) {
            warn!("Retention sweep failed: {}", e);
        }

        info!("Storage backup completed successfully");

        Ok(Some(BackupReport {
            total_files: entries.len(),
            downloaded,
            failed,
            failed_files,
            archive_path,
            archive_bytes,
        }))
    }

    async fn download_object(&self, staging_dir: &Path, name: &str) -> Result<()> {
        let bytes = self.store.download(&self.config.bucket, name).await?;
        std::fs::write(staging_dir.join(name), &bytes)?;
        Ok(())
    }

    async fn compress_staging(&self, staging_dir: &Path, archive_path: &Path) -> Result<u64> {
        let staging = staging_dir.to_path_buf();
        let dest = archive_path.to_path_buf();

        tokio::task::spawn_blocking(move || archive::create_tar_gz(&staging, &dest))
            .await
            .map_err(|e| BackupError::Archive(format!("archive task failed: {}", e)))?
    }
}
