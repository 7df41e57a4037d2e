//! Retention sweeping for aged-out archives.

use crate::backup::{ARCHIVE_PREFIX, ARCHIVE_SUFFIX};
use crate::utils::errors::Result;
use chrono::{DateTime, Duration, Local};
use std::path::Path;
use tracing::{info, warn};

/// Delete archives in `backup_root` whose last modification is older than
/// `retention_days`. Returns the number of files removed.
///
/// Per-file metadata or delete errors are logged and skipped; only a
/// failure to read the root directory surfaces as an error.
pub fn sweep(backup_root: &Path, retention_days: i64) -> Result<usize> {
    let cutoff = Local::now() - Duration::days(retention_days);
    let mut deleted = 0usize;

    for entry in std::fs::read_dir(backup_root)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };

        let file_name = entry.file_name();
        if !is_archive_name(&file_name.to_string_lossy()) {
            continue;
        }

        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(modified) => DateTime::<Local>::from(modified),
            Err(e) => {
                warn!("Skipping {}: cannot read mtime: {}", file_name.to_string_lossy(), e);
                continue;
            }
        };

        if modified < cutoff {
            match std::fs::remove_file(entry.path()) {
                Ok(()) => {
                    deleted += 1;
                    info!("Removed old backup: {}", entry.path().display());
                }
                Err(e) => {
                    warn!("Failed to remove {}: {}", entry.path().display(), e);
                }
            }
        }
    }

    if deleted > 0 {
        info!("Removed {} old backup(s)", deleted);
    } else {
        info!("No old backups to remove");
    }

    Ok(deleted)
}

fn is_archive_name(name: &str) -> bool {
    name.starts_with(ARCHIVE_PREFIX) && name.ends_with(ARCHIVE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration as StdDuration, SystemTime};
    use tempfile::TempDir;

    fn write_aged_file(dir: &Path, name: &str, age_days: u64) {
        let path = dir.join(name);
        fs::write(&path, b"archive").unwrap();
        let mtime = SystemTime::now() - StdDuration::from_secs(age_days * 86_400);
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(mtime).unwrap();
    }

    #[test]
    fn test_sweep_deletes_only_expired_archives() {
        let temp_dir = TempDir::new().unwrap();
        write_aged_file(temp_dir.path(), "storage_backup_20250101_120000.tar.gz", 10);
        write_aged_file(temp_dir.path(), "storage_backup_20241001_120000.tar.gz", 95);
        write_aged_file(temp_dir.path(), "storage_backup_20240101_120000.tar.gz", 200);

        let deleted = sweep(temp_dir.path(), 90).unwrap();
        assert_eq!(deleted, 2);

        assert!(temp_dir
            .path()
            .join("storage_backup_20250101_120000.tar.gz")
            .exists());
        assert!(!temp_dir
            .path()
            .join("storage_backup_20241001_120000.tar.gz")
            .exists());
        assert!(!temp_dir
            .path()
            .join("storage_backup_20240101_120000.tar.gz")
            .exists());
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        write_aged_file(temp_dir.path(), "storage_backup_20240101_120000.tar.gz", 200);
        write_aged_file(temp_dir.path(), "storage_backup_20250101_120000.tar.gz", 10);

        assert_eq!(sweep(temp_dir.path(), 90).unwrap(), 1);
        assert_eq!(sweep(temp_dir.path(), 90).unwrap(), 0);

        let remaining: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(remaining, vec!["storage_backup_20250101_120000.tar.gz"]);
    }

    #[test]
    fn test_sweep_ignores_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        write_aged_file(temp_dir.path(), "notes.txt", 200);
        write_aged_file(temp_dir.path(), "storage_backup_20240101_120000.tar", 200);
        write_aged_file(temp_dir.path(), "other_backup_20240101_120000.tar.gz", 200);

        assert_eq!(sweep(temp_dir.path(), 90).unwrap(), 0);
        assert!(temp_dir.path().join("notes.txt").exists());
        assert!(temp_dir
            .path()
            .join("storage_backup_20240101_120000.tar")
            .exists());
        assert!(temp_dir
            .path()
            .join("other_backup_20240101_120000.tar.gz")
            .exists());
    }

    #[test]
    fn test_archive_name_matching() {
        assert!(is_archive_name("storage_backup_20250101_120000.tar.gz"));
        assert!(!is_archive_name("storage_backup_20250101_120000"));
        assert!(!is_archive_name("manifest.json"));
    }
}
