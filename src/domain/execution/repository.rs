//! Execution log repository trait

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::DomainError;

use super::{ExecutionRecord, SummaryStat};

/// Query parameters for one export run: a target date plus three optional
/// exact-match filters. An absent filter matches every value of that
/// dimension.
#[derive(Debug, Clone)]
pub struct ExecutionQuery {
    pub target_date: NaiveDate,
    pub saas_edge_id: Option<String>,
    pub job_type: Option<String>,
    pub channel: Option<String>,
}

impl ExecutionQuery {
    pub fn for_date(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            saas_edge_id: None,
            job_type: None,
            channel: None,
        }
    }

    pub fn with_saas_edge_id(mut self, saas_edge_id: impl Into<String>) -> Self {
        self.saas_edge_id = Some(saas_edge_id.into());
        self
    }

    pub fn with_job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// True when the record's key triple passes all present filters.
    pub fn matches(&self, saas_edge_id: &str, job_type: &str, channel: &str) -> bool {
        self.saas_edge_id.as_deref().is_none_or(|f| f == saas_edge_id)
            && self.job_type.as_deref().is_none_or(|f| f == job_type)
            && self.channel.as_deref().is_none_or(|f| f == channel)
    }
}

/// Read-only access to the execution log store.
///
/// Implementations must return execution rows ordered by
/// (saas_edge_id, job_type, channel), then by creation time descending,
/// and summary rows ordered by the key triple.
#[async_trait]
pub trait ExecutionLogRepository: Send + Sync + Debug {
    /// Fetch all execution records for the query's date and filters.
    async fn fetch_executions(
        &self,
        query: &ExecutionQuery,
    ) -> Result<Vec<ExecutionRecord>, DomainError>;

    /// Fetch aggregated daily statistics over the same predicate.
    async fn fetch_summary_stats(
        &self,
        query: &ExecutionQuery,
    ) -> Result<Vec<SummaryStat>, DomainError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_query_builder() {
        let query = ExecutionQuery::for_date(date())
            .with_saas_edge_id("acme")
            .with_job_type("webhook")
            .with_channel("staging");

        assert_eq!(query.target_date, date());
        assert_eq!(query.saas_edge_id.as_deref(), Some("acme"));
        assert_eq!(query.job_type.as_deref(), Some("webhook"));
        assert_eq!(query.channel.as_deref(), Some("staging"));
    }

    #[test]
    fn test_absent_filters_match_everything() {
        let query = ExecutionQuery::for_date(date());
        assert!(query.matches("acme", "workflow", "production"));
        assert!(query.matches("other", "webhook", "staging"));
    }

    #[test]
    fn test_explicit_filter_excludes_mismatches() {
        let query = ExecutionQuery::for_date(date()).with_saas_edge_id("acme");
        assert!(query.matches("acme", "workflow", "production"));
        assert!(!query.matches("other", "workflow", "production"));

        let query = query.with_channel("production");
        assert!(!query.matches("acme", "workflow", "staging"));
    }
}
