//! Supabase Storage client.
//!
//! Talks to the Storage HTTP API with the service-role key. Listing is
//! paginated transparently; callers always see the full bucket contents.

use crate::config::StorageConfig;
use crate::storage::{ObjectEntry, ObjectStore};
use crate::utils::errors::{BackupError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

/// Objects fetched per listing request.
const LIST_PAGE_SIZE: usize = 1000;

/// Upper bound on any single HTTP call, so a hung connection cannot
/// stall the run indefinitely.
const REQUEST_TIMEOUT_SECS: u64 = 300;

pub struct SupabaseStore {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl SupabaseStore {
    /// Build a client from the storage configuration.
    ///
    /// Returns a configuration error naming the missing value when the
    /// endpoint or service key is absent; the caller decides whether to
    /// terminate.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let url = config.url.clone().ok_or_else(|| {
            BackupError::Config("SUPABASE_URL or VITE_SUPABASE_URL must be set".to_string())
        })?;
        let service_key = config.service_key.clone().ok_or_else(|| {
            BackupError::Config("SUPABASE_SERVICE_ROLE_KEY must be set".to_string())
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: url.trim_end_matches('/').to_string(),
            service_key,
        })
    }

    fn list_url(&self, bucket: &str) -> String {
        format!("{}/storage/v1/object/list/{}", self.base_url, bucket)
    }

    fn object_url(&self, bucket: &str, name: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, name)
    }
}

#[async_trait]
impl ObjectStore for SupabaseStore {
    async fn list(&self, bucket: &str) -> Result<Vec<ObjectEntry>> {
        let url = self.list_url(bucket);
        let mut entries = Vec::new();
        let mut offset = 0usize;

        loop {
            let body = serde_json::json!({
                "prefix": "",
                "limit": LIST_PAGE_SIZE,
                "offset": offset,
                "sortBy": { "column": "name", "order": "asc" },
            });

            let resp = self
                .http
                .post(&url)
                .bearer_auth(&self.service_key)
                .header("apikey", &self.service_key)
                .json(&body)
                .send()
                .await?;

            if !resp.status().is_success() {
                return Err(BackupError::Storage(format!(
                    "listing bucket {} failed with status {}",
                    bucket,
                    resp.status()
                )));
            }

            let page: Vec<ObjectEntry> = resp.json().await?;
            let page_len = page.len();
            entries.extend(page);

            if page_len < LIST_PAGE_SIZE {
                break;
            }
            offset += page_len;
        }

        Ok(entries)
    }

    async fn download(&self, bucket: &str, name: &str) -> Result<Bytes> {
        let resp = self
            .http
            .get(self.object_url(bucket, name))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(BackupError::Storage(format!(
                "download of {} failed with status {}",
                name,
                resp.status()
            )));
        }

        Ok(resp.bytes().await?)
    }
}
