//! PostgreSQL execution log repository with connection pooling

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::domain::execution::{
    ExecutionLogRepository, ExecutionQuery, ExecutionRecord, SummaryStat,
};
use crate::domain::DomainError;

/// Resolves each execution to its tenant/job-type/channel through the
/// workflow metadata, falling back to name heuristics and then to the
/// documented defaults when a workflow carries no metadata at all.
const WORKFLOW_METADATA_CTE: &str = r#"
WITH workflow_metadata AS (
  SELECT
    id AS workflow_id,
    name,
    COALESCE(
      meta->>'saas_edge_id',
      settings->>'saas_edge_id',
      'unknown'
    ) AS saas_edge_id,
    COALESCE(
      meta->>'job_type',
      settings->>'job_type',
      CASE
        WHEN name ILIKE '%webhook%' THEN 'webhook'
        WHEN name ILIKE '%schedule%' THEN 'scheduled'
        WHEN name ILIKE '%trigger%' THEN 'trigger'
        ELSE 'workflow'
      END
    ) AS job_type,
    COALESCE(
      meta->>'channel',
      settings->>'channel',
      'production'
    ) AS channel
  FROM workflow_entity
  WHERE "deletedAt" IS NULL
)
"#;

#[derive(Debug, sqlx::FromRow)]
struct ExecutionRow {
    execution_id: String,
    saas_edge_id: String,
    job_type: String,
    channel: String,
    workflow_name: String,
    status: String,
    mode: String,
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    finished: bool,
    retry_of: Option<String>,
    execution_date: NaiveDate,
    duration_ms: Option<f64>,
}

impl From<ExecutionRow> for ExecutionRecord {
    fn from(row: ExecutionRow) -> Self {
        Self {
            execution_id: row.execution_id,
            saas_edge_id: row.saas_edge_id,
            job_type: row.job_type,
            channel: row.channel,
            workflow_name: row.workflow_name,
            status: row.status.into(),
            mode: row.mode,
            started_at: row.started_at,
            stopped_at: row.stopped_at,
            created_at: row.created_at,
            finished: row.finished,
            retry_of: row.retry_of,
            execution_date: row.execution_date,
            duration_ms: row.duration_ms,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    saas_edge_id: String,
    job_type: String,
    channel: String,
    execution_date: NaiveDate,
    total_executions: i64,
    successful: i64,
    failed: i64,
    running: i64,
    waiting: i64,
    avg_duration_ms: Option<f64>,
    first_execution: Option<DateTime<Utc>>,
    last_execution: Option<DateTime<Utc>>,
    unique_workflows: i64,
    success_rate_percent: Option<f64>,
    failure_rate_percent: Option<f64>,
}

impl From<SummaryRow> for SummaryStat {
    fn from(row: SummaryRow) -> Self {
        Self {
            saas_edge_id: row.saas_edge_id,
            job_type: row.job_type,
            channel: row.channel,
            execution_date: row.execution_date,
            total_executions: row.total_executions,
            successful: row.successful,
            failed: row.failed,
            running: row.running,
            waiting: row.waiting,
            avg_duration_ms: row.avg_duration_ms,
            first_execution: row.first_execution,
            last_execution: row.last_execution,
            unique_workflows: row.unique_workflows,
            success_rate_percent: row.success_rate_percent,
            failure_rate_percent: row.failure_rate_percent,
        }
    }
}

/// PostgreSQL-backed execution log repository.
///
/// Read-only: both queries select from the execution table, never write.
/// When `placeholder_metadata` is set, tenant/job-type/channel are filled
/// with constant defaults instead of joining the workflow table. This is
/// a fallback for stores without workflow metadata, not the normal path.
#[derive(Debug)]
pub struct PostgresExecutionLogRepository {
    pool: PgPool,
    placeholder_metadata: bool,
}

impl PostgresExecutionLogRepository {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool, placeholder_metadata: bool) -> Self {
        Self {
            pool,
            placeholder_metadata,
        }
    }

    /// Connect with a bounded retry: up to `max_connect_attempts`, with a
    /// linearly growing delay between attempts. The final error carries
    /// the last underlying cause.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let attempts = config.max_connect_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            let result = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
                .connect(&config.url())
                .await;

            match result {
                Ok(pool) => {
                    info!(
                        host = %config.host,
                        database = %config.database,
                        "Database connection established"
                    );
                    return Ok(Self::new(pool, config.placeholder_metadata));
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = attempts,
                        error = %e,
                        "Database connection attempt failed"
                    );
                    last_error = Some(e);
                    if attempt < attempts {
                        tokio::time::sleep(Duration::from_millis(
                            config.retry_backoff_ms * attempt as u64,
                        ))
                        .await;
                    }
                }
            }
        }

        Err(DomainError::connection(format!(
            "Failed to connect to PostgreSQL after {} attempts: {}",
            attempts,
            last_error.map(|e| e.to_string()).unwrap_or_default()
        )))
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn executions_query(&self) -> String {
        if self.placeholder_metadata {
            // Demo fallback: constant metadata, no workflow join.
            r#"
            SELECT
              e.id::text AS execution_id,
              'unknown' AS saas_edge_id,
              'workflow' AS job_type,
              'production' AS channel,
              'test_workflow' AS workflow_name,
              e.status AS status,
              COALESCE(e.mode, 'manual') AS mode,
              e."startedAt" AS started_at,
              e."stoppedAt" AS stopped_at,
              e."createdAt" AS created_at,
              COALESCE(e.finished, false) AS finished,
              e."retryOf"::text AS retry_of,
              DATE(COALESCE(e."startedAt", e."createdAt")) AS execution_date,
              (CASE
                WHEN e."startedAt" IS NOT NULL AND e."stoppedAt" IS NOT NULL
                THEN EXTRACT(EPOCH FROM (e."stoppedAt" - e."startedAt")) * 1000
                ELSE NULL
              END)::double precision AS duration_ms
            FROM execution_entity e
            WHERE DATE(COALESCE(e."startedAt", e."createdAt")) = $1
            ORDER BY e."createdAt" DESC
            LIMIT 100
            "#
            .to_string()
        } else {
            format!(
                r#"{WORKFLOW_METADATA_CTE}
                SELECT
                  e.id::text AS execution_id,
                  w.saas_edge_id AS saas_edge_id,
                  w.job_type AS job_type,
                  w.channel AS channel,
                  w.name AS workflow_name,
                  e.status AS status,
                  COALESCE(e.mode, 'manual') AS mode,
                  e."startedAt" AS started_at,
                  e."stoppedAt" AS stopped_at,
                  e."createdAt" AS created_at,
                  COALESCE(e.finished, false) AS finished,
                  e."retryOf"::text AS retry_of,
                  DATE(COALESCE(e."startedAt", e."createdAt")) AS execution_date,
                  (CASE
                    WHEN e."startedAt" IS NOT NULL AND e."stoppedAt" IS NOT NULL
                    THEN EXTRACT(EPOCH FROM (e."stoppedAt" - e."startedAt")) * 1000
                    ELSE NULL
                  END)::double precision AS duration_ms
                FROM execution_entity e
                INNER JOIN workflow_metadata w ON e."workflowId" = w.workflow_id
                WHERE e."deletedAt" IS NULL
                  AND DATE(COALESCE(e."startedAt", e."createdAt")) = $1
                  AND ($2::text IS NULL OR w.saas_edge_id = $2)
                  AND ($3::text IS NULL OR w.job_type = $3)
                  AND ($4::text IS NULL OR w.channel = $4)
                ORDER BY w.saas_edge_id, w.job_type, w.channel, e."createdAt" DESC
                "#
            )
        }
    }

    fn summary_query(&self) -> String {
        if self.placeholder_metadata {
            r#"
            SELECT
              'unknown' AS saas_edge_id,
              'workflow' AS job_type,
              'production' AS channel,
              DATE(COALESCE(e."startedAt", e."createdAt")) AS execution_date,
              COUNT(*) AS total_executions,
              COUNT(CASE WHEN e.status = 'success' THEN 1 END) AS successful,
              COUNT(CASE WHEN e.status = 'error' THEN 1 END) AS failed,
              COUNT(CASE WHEN e.status = 'running' THEN 1 END) AS running,
              COUNT(CASE WHEN e.status = 'waiting' THEN 1 END) AS waiting,
              AVG(
                CASE
                  WHEN e."startedAt" IS NOT NULL AND e."stoppedAt" IS NOT NULL
                  THEN EXTRACT(EPOCH FROM (e."stoppedAt" - e."startedAt")) * 1000
                  ELSE NULL
                END
              )::double precision AS avg_duration_ms,
              MIN(e."startedAt") AS first_execution,
              MAX(e."stoppedAt") AS last_execution,
              COUNT(*) AS unique_workflows,
              ROUND((COUNT(CASE WHEN e.status = 'success' THEN 1 END)::float
                / NULLIF(COUNT(*), 0) * 100)::numeric, 2)::double precision AS success_rate_percent,
              ROUND((COUNT(CASE WHEN e.status = 'error' THEN 1 END)::float
                / NULLIF(COUNT(*), 0) * 100)::numeric, 2)::double precision AS failure_rate_percent
            FROM execution_entity e
            WHERE DATE(COALESCE(e."startedAt", e."createdAt")) = $1
            GROUP BY DATE(COALESCE(e."startedAt", e."createdAt"))
            ORDER BY execution_date
            "#
            .to_string()
        } else {
            format!(
                r#"{WORKFLOW_METADATA_CTE},
                daily_stats AS (
                  SELECT
                    w.saas_edge_id,
                    w.job_type,
                    w.channel,
                    DATE(COALESCE(e."startedAt", e."createdAt")) AS execution_date,
                    COUNT(*) AS total_executions,
                    COUNT(CASE WHEN e.status = 'success' THEN 1 END) AS successful,
                    COUNT(CASE WHEN e.status = 'error' THEN 1 END) AS failed,
                    COUNT(CASE WHEN e.status = 'running' THEN 1 END) AS running,
                    COUNT(CASE WHEN e.status = 'waiting' THEN 1 END) AS waiting,
                    AVG(
                      CASE
                        WHEN e."startedAt" IS NOT NULL AND e."stoppedAt" IS NOT NULL
                        THEN EXTRACT(EPOCH FROM (e."stoppedAt" - e."startedAt")) * 1000
                        ELSE NULL
                      END
                    )::double precision AS avg_duration_ms,
                    MIN(e."startedAt") AS first_execution,
                    MAX(e."stoppedAt") AS last_execution,
                    COUNT(DISTINCT w.workflow_id) AS unique_workflows
                  FROM execution_entity e
                  INNER JOIN workflow_metadata w ON e."workflowId" = w.workflow_id
                  WHERE e."deletedAt" IS NULL
                    AND DATE(COALESCE(e."startedAt", e."createdAt")) = $1
                    AND ($2::text IS NULL OR w.saas_edge_id = $2)
                    AND ($3::text IS NULL OR w.job_type = $3)
                    AND ($4::text IS NULL OR w.channel = $4)
                  GROUP BY w.saas_edge_id, w.job_type, w.channel,
                    DATE(COALESCE(e."startedAt", e."createdAt"))
                )
                SELECT
                  *,
                  ROUND((successful::float / NULLIF(total_executions, 0) * 100)::numeric, 2)
                    ::double precision AS success_rate_percent,
                  ROUND((failed::float / NULLIF(total_executions, 0) * 100)::numeric, 2)
                    ::double precision AS failure_rate_percent
                FROM daily_stats
                ORDER BY saas_edge_id, job_type, channel
                "#
            )
        }
    }
}

#[async_trait]
impl ExecutionLogRepository for PostgresExecutionLogRepository {
    async fn fetch_executions(
        &self,
        query: &ExecutionQuery,
    ) -> Result<Vec<ExecutionRecord>, DomainError> {
        let sql = self.executions_query();
        let mut q = sqlx::query_as::<_, ExecutionRow>(&sql).bind(query.target_date);
        if !self.placeholder_metadata {
            q = q
                .bind(query.saas_edge_id.as_deref())
                .bind(query.job_type.as_deref())
                .bind(query.channel.as_deref());
        }

        let rows = q.fetch_all(&self.pool).await.map_err(|e| {
            DomainError::query(format!(
                "Failed to fetch executions for {}: {}",
                query.target_date, e
            ))
        })?;

        info!(
            count = rows.len(),
            date = %query.target_date,
            "Extracted execution logs"
        );
        Ok(rows.into_iter().map(ExecutionRecord::from).collect())
    }

    async fn fetch_summary_stats(
        &self,
        query: &ExecutionQuery,
    ) -> Result<Vec<SummaryStat>, DomainError> {
        let sql = self.summary_query();
        let mut q = sqlx::query_as::<_, SummaryRow>(&sql).bind(query.target_date);
        if !self.placeholder_metadata {
            q = q
                .bind(query.saas_edge_id.as_deref())
                .bind(query.job_type.as_deref())
                .bind(query.channel.as_deref());
        }

        let rows = q.fetch_all(&self.pool).await.map_err(|e| {
            DomainError::query(format!(
                "Failed to fetch summary stats for {}: {}",
                query.target_date, e
            ))
        })?;

        info!(
            count = rows.len(),
            date = %query.target_date,
            "Extracted summary stats"
        );
        Ok(rows.into_iter().map(SummaryStat::from).collect())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::connection(format!("Database ping failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(placeholder: bool) -> PostgresExecutionLogRepository {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/n8n")
            .unwrap();
        PostgresExecutionLogRepository::new(pool, placeholder)
    }

    #[tokio::test]
    async fn test_primary_queries_join_workflow_metadata() {
        let repo = repo(false);
        let sql = repo.executions_query();
        assert!(sql.contains("workflow_metadata"));
        assert!(sql.contains("$4::text IS NULL"));
        assert!(sql.contains(r#"ORDER BY w.saas_edge_id, w.job_type, w.channel, e."createdAt" DESC"#));

        let summary = repo.summary_query();
        assert!(summary.contains("daily_stats"));
        assert!(summary.contains("success_rate_percent"));
        assert!(summary.contains("COUNT(DISTINCT w.workflow_id)"));
    }

    #[tokio::test]
    async fn test_placeholder_queries_use_constants() {
        let repo = repo(true);
        let sql = repo.executions_query();
        assert!(sql.contains("'unknown' AS saas_edge_id"));
        assert!(sql.contains("LIMIT 100"));
        assert!(!sql.contains("workflow_metadata"));

        let summary = repo.summary_query();
        assert!(summary.contains("'production' AS channel"));
        assert!(!summary.contains("workflow_metadata"));
    }
}
