//! Log export service
//!
//! The one reusable export job: fetch a day's execution records and
//! summary statistics, partition them by (tenant, job type, channel),
//! and write one executions artifact plus one summary artifact per
//! partition to the content store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::execution::{ExecutionLogRepository, ExecutionQuery};
use crate::domain::export::{
    artifact_path, distinct_stat_keys, executions_filename, group_records, summary_filename,
    ArtifactStore, ExecutionsArtifact, ExportGroupKey, ExportResult, ExportService,
    SummaryArtifact,
};
use crate::domain::DomainError;

#[derive(Debug)]
pub struct LogExportService<R, S> {
    repository: Arc<R>,
    store: Arc<S>,
    prefix: String,
}

impl<R, S> LogExportService<R, S>
where
    R: ExecutionLogRepository,
    S: ArtifactStore,
{
    pub fn new(repository: Arc<R>, store: Arc<S>, prefix: impl Into<String>) -> Self {
        Self {
            repository,
            store,
            prefix: prefix.into(),
        }
    }

    /// Serialize and upload one artifact. Failures are logged and reported
    /// as `false`; the caller keeps going with the remaining artifacts.
    async fn upload<T: Serialize>(&self, path: &str, artifact: &T) -> bool {
        let body = match serde_json::to_vec_pretty(artifact) {
            Ok(body) => body,
            Err(e) => {
                warn!(path, error = %e, "Failed to serialize artifact");
                return false;
            }
        };

        match self.store.put_json(path, body.into()).await {
            Ok(()) => {
                info!(path, "Uploaded artifact");
                true
            }
            Err(e) => {
                warn!(path, error = %e, "Failed to upload artifact");
                false
            }
        }
    }

    fn path_for(&self, key: &ExportGroupKey, date: NaiveDate, filename: String) -> String {
        artifact_path(&self.prefix, key, date, &filename)
    }

    async fn run(
        &self,
        query: &ExecutionQuery,
        export_date: DateTime<Utc>,
    ) -> Result<ExportResult, DomainError> {
        info!(
            date = %query.target_date,
            saas_edge_id = query.saas_edge_id.as_deref().unwrap_or("*"),
            job_type = query.job_type.as_deref().unwrap_or("*"),
            channel = query.channel.as_deref().unwrap_or("*"),
            "Starting log export"
        );

        let executions = self.repository.fetch_executions(query).await?;
        let stats = self.repository.fetch_summary_stats(query).await?;

        if executions.is_empty() && stats.is_empty() {
            info!(date = %query.target_date, "No logs found for the specified criteria");
            return Ok(ExportResult::no_logs(query.target_date));
        }

        let total_executions = executions.len();
        let groups = group_records(executions);
        let total_groups = groups.len();
        let mut uploaded_files = Vec::new();

        for group in groups {
            let path = self.path_for(
                &group.key,
                query.target_date,
                executions_filename(query.target_date),
            );
            let artifact =
                ExecutionsArtifact::new(export_date, query.target_date, &group.key, group.records);
            if self.upload(&path, &artifact).await {
                uploaded_files.push(path);
            }
        }

        for key in distinct_stat_keys(&stats) {
            let rows = stats
                .iter()
                .filter(|s| {
                    s.saas_edge_id == key.saas_edge_id
                        && s.job_type == key.job_type
                        && s.channel == key.channel
                })
                .cloned()
                .collect();
            let path = self.path_for(&key, query.target_date, summary_filename(query.target_date));
            let artifact = SummaryArtifact::new(export_date, query.target_date, rows);
            if self.upload(&path, &artifact).await {
                uploaded_files.push(path);
            }
        }

        info!(
            uploaded = uploaded_files.len(),
            total_executions, total_groups, "Export completed"
        );

        Ok(ExportResult::success(
            query.target_date,
            total_executions,
            total_groups,
            uploaded_files,
        ))
    }
}

#[async_trait]
impl<R, S> ExportService for LogExportService<R, S>
where
    R: ExecutionLogRepository,
    S: ArtifactStore,
{
    async fn export(&self, query: &ExecutionQuery) -> Result<ExportResult, DomainError> {
        self.run(query, Utc::now()).await
    }
}
