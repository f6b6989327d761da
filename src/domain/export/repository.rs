//! Artifact store trait

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::DomainError;

/// Write-capable content store addressed by hierarchical string paths.
///
/// Semantics are "write whole object, overwrite if exists": writing the
/// same path twice leaves the latest body, which is what makes re-running
/// an export idempotent.
#[async_trait]
pub trait ArtifactStore: Send + Sync + Debug {
    /// Write a JSON document at `path`, replacing any existing object.
    async fn put_json(&self, path: &str, body: Bytes) -> Result<(), DomainError>;
}
