//! In-memory artifact store for tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::export::ArtifactStore;
use crate::domain::DomainError;

/// HashMap-backed store that records every put. `with_failure` makes any
/// path containing the given fragment fail, for exercising the
/// best-effort upload path.
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    objects: Mutex<HashMap<String, Bytes>>,
    fail_on: Mutex<Option<String>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(self, path_fragment: impl Into<String>) -> Self {
        *self.fail_on.lock().unwrap() = Some(path_fragment.into());
        self
    }

    pub fn get(&self, path: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn put_json(&self, path: &str, body: Bytes) -> Result<(), DomainError> {
        if let Some(fragment) = self.fail_on.lock().unwrap().as_deref() {
            if path.contains(fragment) {
                return Err(DomainError::upload(format!(
                    "Simulated upload failure for '{}'",
                    path
                )));
            }
        }
        self.objects
            .lock()
            .unwrap()
            .insert(path.to_string(), body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryArtifactStore::new();
        store
            .put_json("a/b.json", Bytes::from_static(b"{}"))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a/b.json").unwrap(), Bytes::from_static(b"{}"));
        assert!(store.get("missing").is_none());
    }

    #[tokio::test]
    async fn test_overwrite_keeps_latest() {
        let store = InMemoryArtifactStore::new();
        store
            .put_json("a.json", Bytes::from_static(b"1"))
            .await
            .unwrap();
        store
            .put_json("a.json", Bytes::from_static(b"2"))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a.json").unwrap(), Bytes::from_static(b"2"));
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let store = InMemoryArtifactStore::new().with_failure("summary");
        assert!(store
            .put_json("n8n/x/summary_1.json", Bytes::from_static(b"{}"))
            .await
            .is_err());
        assert!(store
            .put_json("n8n/x/executions_1.json", Bytes::from_static(b"{}"))
            .await
            .is_ok());
        assert_eq!(store.len(), 1);
    }
}
