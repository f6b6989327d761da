//! n8n Log Exporter
//!
//! Snapshots one day's workflow execution logs from an n8n PostgreSQL
//! database into dated, hierarchically-prefixed JSON objects in a content
//! store (GCS, S3, or a local directory):
//!
//! `<prefix>/<saas_edge_id>/<job_type>/<channel>/<date>/executions_<date>.json`
//!
//! plus a per-partition `summary_<date>.json` with aggregate statistics.
//! One export job serves both entry points: the `export` CLI subcommand
//! and the `POST /v1/exports` HTTP trigger.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

pub use config::AppConfig;

use api::state::AppState;
use infrastructure::{
    LogExportService, ObjectStoreArtifactStore, PostgresExecutionLogRepository,
};

/// Wire configuration into the running application: validate the database
/// section, connect the repository (with bounded retry), build the
/// artifact store, and assemble the export service.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.database.validate()?;

    let repository = Arc::new(PostgresExecutionLogRepository::connect(&config.database).await?);
    let store = Arc::new(ObjectStoreArtifactStore::from_config(&config.storage)?);
    let export_service = Arc::new(LogExportService::new(
        repository.clone(),
        store,
        config.storage.prefix.clone(),
    ));

    Ok(AppState::new(export_service, repository))
}
