//! In-memory execution log repository for tests and local development

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::execution::{
    ExecutionLogRepository, ExecutionQuery, ExecutionRecord, SummaryStat,
};
use crate::domain::DomainError;

/// Repository over a fixed record set. Mirrors the SQL contract: date and
/// filter predicate, key-then-newest ordering, and the daily aggregate.
#[derive(Debug, Default)]
pub struct InMemoryExecutionLogRepository {
    records: Vec<ExecutionRecord>,
}

impl InMemoryExecutionLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: ExecutionRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_records(mut self, records: impl IntoIterator<Item = ExecutionRecord>) -> Self {
        self.records.extend(records);
        self
    }

    fn matching(&self, query: &ExecutionQuery) -> Vec<ExecutionRecord> {
        let mut records: Vec<ExecutionRecord> = self
            .records
            .iter()
            .filter(|r| {
                r.execution_date == query.target_date
                    && query.matches(&r.saas_edge_id, &r.job_type, &r.channel)
            })
            .cloned()
            .collect();

        records.sort_by(|a, b| {
            (&a.saas_edge_id, &a.job_type, &a.channel)
                .cmp(&(&b.saas_edge_id, &b.job_type, &b.channel))
                .then(b.created_at.cmp(&a.created_at))
        });
        records
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn aggregate(records: &[ExecutionRecord]) -> Vec<SummaryStat> {
    let mut stats: Vec<SummaryStat> = Vec::new();

    for record in records {
        let position = stats.iter().position(|s| {
            s.saas_edge_id == record.saas_edge_id
                && s.job_type == record.job_type
                && s.channel == record.channel
        });
        let stat = match position {
            Some(i) => &mut stats[i],
            None => {
                stats.push(SummaryStat {
                    saas_edge_id: record.saas_edge_id.clone(),
                    job_type: record.job_type.clone(),
                    channel: record.channel.clone(),
                    execution_date: record.execution_date,
                    total_executions: 0,
                    successful: 0,
                    failed: 0,
                    running: 0,
                    waiting: 0,
                    avg_duration_ms: None,
                    first_execution: None,
                    last_execution: None,
                    unique_workflows: 0,
                    success_rate_percent: None,
                    failure_rate_percent: None,
                });
                stats.last_mut().unwrap()
            }
        };

        stat.total_executions += 1;
        match record.status.as_str() {
            "success" => stat.successful += 1,
            "error" => stat.failed += 1,
            "running" => stat.running += 1,
            "waiting" => stat.waiting += 1,
            _ => {}
        }
        stat.first_execution = min_time(stat.first_execution, record.started_at);
        stat.last_execution = max_time(stat.last_execution, record.stopped_at);
    }

    for stat in &mut stats {
        let group: Vec<&ExecutionRecord> = records
            .iter()
            .filter(|r| {
                r.saas_edge_id == stat.saas_edge_id
                    && r.job_type == stat.job_type
                    && r.channel == stat.channel
            })
            .collect();

        let durations: Vec<f64> = group.iter().filter_map(|r| r.duration_ms).collect();
        if !durations.is_empty() {
            stat.avg_duration_ms =
                Some(durations.iter().sum::<f64>() / durations.len() as f64);
        }

        let mut workflows: Vec<&str> =
            group.iter().map(|r| r.workflow_name.as_str()).collect();
        workflows.sort_unstable();
        workflows.dedup();
        stat.unique_workflows = workflows.len() as i64;

        if stat.total_executions > 0 {
            let total = stat.total_executions as f64;
            stat.success_rate_percent = Some(round2(stat.successful as f64 / total * 100.0));
            stat.failure_rate_percent = Some(round2(stat.failed as f64 / total * 100.0));
        }
    }

    stats.sort_by(|a, b| {
        (&a.saas_edge_id, &a.job_type, &a.channel).cmp(&(&b.saas_edge_id, &b.job_type, &b.channel))
    });
    stats
}

fn min_time(
    current: Option<DateTime<Utc>>,
    candidate: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn max_time(
    current: Option<DateTime<Utc>>,
    candidate: Option<DateTime<Utc>>,
) -> Option<DateTime<Utc>> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

#[async_trait]
impl ExecutionLogRepository for InMemoryExecutionLogRepository {
    async fn fetch_executions(
        &self,
        query: &ExecutionQuery,
    ) -> Result<Vec<ExecutionRecord>, DomainError> {
        Ok(self.matching(query))
    }

    async fn fetch_summary_stats(
        &self,
        query: &ExecutionQuery,
    ) -> Result<Vec<SummaryStat>, DomainError> {
        Ok(aggregate(&self.matching(query)))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
