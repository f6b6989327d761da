//! Export domain: groups, artifacts, result types, service and store traits

mod entity;
mod repository;
mod service;

pub use entity::{
    artifact_path, distinct_stat_keys, executions_filename, group_records, summary_filename,
    ExecutionsArtifact, ExecutionsMetadata, ExportGroup, ExportGroupKey, ExportResult,
    SummaryArtifact, SummaryMetadata, EXPORTER_VERSION,
};
pub use repository::ArtifactStore;
pub use service::ExportService;
