//! Storage Backup Library
//!
//! Downloads every object from a storage bucket into a timestamped
//! tar.gz archive with a manifest, and prunes archives past the
//! retention window.

pub mod archive;
pub mod backup;
pub mod config;
pub mod retention;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use utils::errors::BackupError;
pub type Result<T> = std::result::Result<T, BackupError>;
