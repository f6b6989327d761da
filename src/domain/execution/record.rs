//! Execution log entities

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Final status of a workflow execution
///
/// The execution table stores free-form status strings; the four values
/// below are the ones n8n writes for normal runs. Anything else (e.g.
/// `canceled`, `crashed`, `new`) round-trips verbatim through `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    Success,
    Error,
    Running,
    Waiting,
    Other(String),
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Running => "running",
            Self::Waiting => "waiting",
            Self::Other(s) => s,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl From<String> for ExecutionStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            "running" => Self::Running,
            "waiting" => Self::Waiting,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for ExecutionStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ExecutionStatus> for String {
    fn from(status: ExecutionStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the execution log: a single run of a workflow, resolved to
/// its tenant/job-type/channel, with derived date and duration.
///
/// Records are produced by a read-only query and never mutated. All
/// timestamps are UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub execution_id: String,
    pub saas_edge_id: String,
    pub job_type: String,
    pub channel: String,
    pub workflow_name: String,
    pub status: ExecutionStatus,
    pub mode: String,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub finished: bool,
    pub retry_of: Option<String>,
    /// Calendar date the execution belongs to: the start timestamp's date,
    /// falling back to the creation timestamp when the run never started.
    pub execution_date: NaiveDate,
    /// Wall-clock duration in milliseconds; `None` unless both the start
    /// and stop timestamps are present.
    pub duration_ms: Option<f64>,
}

/// Aggregated statistics for one (tenant, job type, channel, date)
/// combination, recomputed from scratch on every export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStat {
    pub saas_edge_id: String,
    pub job_type: String,
    pub channel: String,
    pub execution_date: NaiveDate,
    pub total_executions: i64,
    pub successful: i64,
    pub failed: i64,
    pub running: i64,
    pub waiting: i64,
    pub avg_duration_ms: Option<f64>,
    pub first_execution: Option<DateTime<Utc>>,
    pub last_execution: Option<DateTime<Utc>>,
    pub unique_workflows: i64,
    /// `successful / total * 100`, rounded to 2 decimals; `None` when the
    /// total is zero.
    pub success_rate_percent: Option<f64>,
    pub failure_rate_percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_from_known_strings() {
        assert_eq!(ExecutionStatus::from("success"), ExecutionStatus::Success);
        assert_eq!(ExecutionStatus::from("error"), ExecutionStatus::Error);
        assert_eq!(ExecutionStatus::from("running"), ExecutionStatus::Running);
        assert_eq!(ExecutionStatus::from("waiting"), ExecutionStatus::Waiting);
    }

    #[test]
    fn test_status_unknown_string_round_trips() {
        let status = ExecutionStatus::from("crashed");
        assert_eq!(status, ExecutionStatus::Other("crashed".to_string()));
        assert_eq!(status.as_str(), "crashed");
        assert_eq!(String::from(status), "crashed");
    }

    #[test]
    fn test_status_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&ExecutionStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&ExecutionStatus::Other("canceled".into())).unwrap(),
            "\"canceled\""
        );
    }

    #[test]
    fn test_status_predicates() {
        assert!(ExecutionStatus::Success.is_success());
        assert!(!ExecutionStatus::Success.is_error());
        assert!(ExecutionStatus::Error.is_error());
    }

    #[test]
    fn test_record_serialization_shape() {
        let record = ExecutionRecord {
            execution_id: "42".to_string(),
            saas_edge_id: "acme".to_string(),
            job_type: "workflow".to_string(),
            channel: "production".to_string(),
            workflow_name: "Sync Orders".to_string(),
            status: ExecutionStatus::Success,
            mode: "trigger".to_string(),
            started_at: Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap()),
            stopped_at: Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 2).unwrap()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap(),
            finished: true,
            retry_of: None,
            execution_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            duration_ms: Some(2000.0),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["execution_date"], "2024-01-15");
        assert_eq!(json["duration_ms"], 2000.0);
        assert_eq!(json["retry_of"], serde_json::Value::Null);
    }
}
