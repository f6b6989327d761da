//! Domain layer - entities, repository traits, and errors

pub mod error;
pub mod execution;
pub mod export;

pub use error::DomainError;
pub use execution::{
    ExecutionLogRepository, ExecutionQuery, ExecutionRecord, ExecutionStatus, SummaryStat,
};
pub use export::{ArtifactStore, ExportResult, ExportService};
