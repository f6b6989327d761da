//! Export service trait

use async_trait::async_trait;

use crate::domain::execution::ExecutionQuery;
use crate::domain::DomainError;

use super::ExportResult;

/// The daily log-export operation.
///
/// One implementation serves both entry points; the CLI and the HTTP
/// handler differ only in how they parse the date and filters into an
/// [`ExecutionQuery`].
#[async_trait]
pub trait ExportService: Send + Sync {
    /// Snapshot one day's execution logs and summary statistics into the
    /// content store, partitioned by (tenant, job type, channel).
    ///
    /// Read-only against the relational store and idempotent against the
    /// content store. Per-artifact upload failures are logged and skipped;
    /// connection and query failures are fatal.
    async fn export(&self, query: &ExecutionQuery) -> Result<ExportResult, DomainError>;
}
