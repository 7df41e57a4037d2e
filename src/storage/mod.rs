//! Storage backends.
//!
//! The backup runner only depends on the two-operation [`ObjectStore`]
//! capability; everything service-specific lives behind it.

pub mod supabase;

use crate::utils::errors::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

/// A single entry returned by a bucket listing.
///
/// Folder placeholders come back without a usable name; the runner skips
/// those silently.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntry {
    #[serde(default)]
    pub name: String,
}

/// The capability a storage service must provide to be backed up.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List all objects in the bucket, in service order.
    async fn list(&self, bucket: &str) -> Result<Vec<ObjectEntry>>;

    /// Download a single object as raw bytes.
    async fn download(&self, bucket: &str, name: &str) -> Result<Bytes>;
}
