//! Manifest types for backup runs.
//!
//! A manifest records what a single run attempted and achieved. It is
//! written into the staging directory and travels inside the archive.

use crate::utils::errors::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backup manifest — serialized as `manifest.json` inside each archive.
///
/// `total_files` counts every listing entry, named or not; `files` holds
/// the non-empty names in listing order, so `downloaded + failed` always
/// equals `files.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub timestamp: String,
    pub bucket: String,
    pub total_files: usize,
    pub downloaded: usize,
    pub failed: usize,
    pub failed_files: Vec<String>,
    pub files: Vec<String>,
}

impl Manifest {
    pub const FILE_NAME: &'static str = "manifest.json";

    /// Write the manifest pretty-printed into `dir`
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(Self::FILE_NAME);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}
