//! Artifact store over the `object_store` crate
//!
//! One factory covers the three backends: a `gs://bucket` or `s3://bucket`
//! URL selects cloud storage with credentials taken from the environment,
//! anything else is treated as a local directory (useful for development
//! and smoke tests).

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions};
use tracing::info;

use crate::config::StorageConfig;
use crate::domain::export::ArtifactStore;
use crate::domain::DomainError;

#[derive(Debug)]
pub struct ObjectStoreArtifactStore {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreArtifactStore {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Build the backend selected by the storage URL.
    pub fn from_config(config: &StorageConfig) -> Result<Self, DomainError> {
        let store: Arc<dyn ObjectStore> = if let Some(bucket) = config.url.strip_prefix("gs://") {
            let store = GoogleCloudStorageBuilder::from_env()
                .with_bucket_name(bucket.trim_end_matches('/'))
                .build()
                .map_err(|e| {
                    DomainError::configuration(format!("Invalid GCS storage config: {}", e))
                })?;
            Arc::new(store)
        } else if let Some(bucket) = config.url.strip_prefix("s3://") {
            let store = AmazonS3Builder::from_env()
                .with_bucket_name(bucket.trim_end_matches('/'))
                .build()
                .map_err(|e| {
                    DomainError::configuration(format!("Invalid S3 storage config: {}", e))
                })?;
            Arc::new(store)
        } else {
            std::fs::create_dir_all(&config.url).map_err(|e| {
                DomainError::configuration(format!(
                    "Cannot create local storage directory '{}': {}",
                    config.url, e
                ))
            })?;
            let store = LocalFileSystem::new_with_prefix(&config.url).map_err(|e| {
                DomainError::configuration(format!("Invalid local storage path: {}", e))
            })?;
            Arc::new(store)
        };

        info!(url = %config.url, "Initialized artifact store");
        Ok(Self::new(store))
    }
}

#[async_trait]
impl ArtifactStore for ObjectStoreArtifactStore {
    async fn put_json(&self, path: &str, body: Bytes) -> Result<(), DomainError> {
        let location = ObjectPath::from(path);
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, "application/json".into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, body.into(), opts)
            .await
            .map_err(|e| DomainError::upload(format!("Failed to upload '{}': {}", path, e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_store_overwrites_on_second_put() {
        let dir = std::env::temp_dir().join(format!("artifact-store-{}", uuid::Uuid::new_v4()));
        let config = StorageConfig {
            url: dir.to_string_lossy().to_string(),
            prefix: "n8n".to_string(),
        };
        let store = ObjectStoreArtifactStore::from_config(&config).unwrap();

        store
            .put_json("n8n/a/b/c/2024-01-15/x.json", Bytes::from_static(b"{\"v\":1}"))
            .await
            .unwrap();
        store
            .put_json("n8n/a/b/c/2024-01-15/x.json", Bytes::from_static(b"{\"v\":2}"))
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.join("n8n/a/b/c/2024-01-15/x.json")).unwrap();
        assert_eq!(written, "{\"v\":2}");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_from_config_rejects_unwritable_local_path() {
        let config = StorageConfig {
            url: "/proc/no-such-dir/exports".to_string(),
            prefix: "n8n".to_string(),
        };
        assert!(ObjectStoreArtifactStore::from_config(&config).is_err());
    }
}
