//! Infrastructure layer - concrete repository, store, and service
//! implementations plus process-level concerns (logging)

pub mod artifact;
pub mod execution;
pub mod export;
pub mod logging;

pub use artifact::{InMemoryArtifactStore, ObjectStoreArtifactStore};
pub use execution::{InMemoryExecutionLogRepository, PostgresExecutionLogRepository};
pub use export::LogExportService;
