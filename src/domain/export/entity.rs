//! Export artifacts, grouping, and path derivation

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::execution::{ExecutionRecord, SummaryStat};

/// Version string embedded in every artifact's metadata header.
pub const EXPORTER_VERSION: &str = "1.0.0";

/// Grouping key for one exported file: (tenant, job type, channel).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExportGroupKey {
    pub saas_edge_id: String,
    pub job_type: String,
    pub channel: String,
}

impl ExportGroupKey {
    pub fn new(
        saas_edge_id: impl Into<String>,
        job_type: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            saas_edge_id: saas_edge_id.into(),
            job_type: job_type.into(),
            channel: channel.into(),
        }
    }

    fn of_record(record: &ExecutionRecord) -> Self {
        Self::new(
            record.saas_edge_id.clone(),
            record.job_type.clone(),
            record.channel.clone(),
        )
    }

    fn of_stat(stat: &SummaryStat) -> Self {
        Self::new(
            stat.saas_edge_id.clone(),
            stat.job_type.clone(),
            stat.channel.clone(),
        )
    }
}

impl std::fmt::Display for ExportGroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.saas_edge_id, self.job_type, self.channel)
    }
}

/// One export group: all execution records sharing a key, in query order.
#[derive(Debug, Clone)]
pub struct ExportGroup {
    pub key: ExportGroupKey,
    pub records: Vec<ExecutionRecord>,
}

/// Partition records into groups keyed by (tenant, job type, channel).
///
/// Group order is first-seen order and record order within a group is
/// input order, so a key-sorted input yields key-sorted groups with
/// most-recent-first records.
pub fn group_records(records: Vec<ExecutionRecord>) -> Vec<ExportGroup> {
    let mut groups: Vec<ExportGroup> = Vec::new();
    let mut index: std::collections::HashMap<ExportGroupKey, usize> =
        std::collections::HashMap::new();

    for record in records {
        let key = ExportGroupKey::of_record(&record);
        match index.get(&key) {
            Some(&i) => groups[i].records.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(ExportGroup {
                    key,
                    records: vec![record],
                });
            }
        }
    }

    groups
}

/// Distinct (tenant, job type, channel) triples present in the summary
/// rows, in first-seen order.
pub fn distinct_stat_keys(stats: &[SummaryStat]) -> Vec<ExportGroupKey> {
    let mut keys: Vec<ExportGroupKey> = Vec::new();
    for stat in stats {
        let key = ExportGroupKey::of_stat(stat);
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Derive the object path for an artifact.
///
/// Literal substitution only: `{prefix}/{tenant}/{job_type}/{channel}/{date}/{filename}`.
/// This layout is a compatibility contract with downstream consumers and
/// must not normalize or reorder segments.
pub fn artifact_path(
    prefix: &str,
    key: &ExportGroupKey,
    date: NaiveDate,
    filename: &str,
) -> String {
    format!(
        "{}/{}/{}/{}/{}/{}",
        prefix,
        key.saas_edge_id,
        key.job_type,
        key.channel,
        date.format("%Y-%m-%d"),
        filename
    )
}

/// Filename for the execution-group artifact: `executions_<YYYYMMDD>.json`.
pub fn executions_filename(date: NaiveDate) -> String {
    format!("executions_{}.json", date.format("%Y%m%d"))
}

/// Filename for the summary artifact: `summary_<YYYYMMDD>.json`.
pub fn summary_filename(date: NaiveDate) -> String {
    format!("summary_{}.json", date.format("%Y%m%d"))
}

/// Metadata header of an execution-group artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionsMetadata {
    pub export_date: DateTime<Utc>,
    pub target_date: NaiveDate,
    pub saas_edge_id: String,
    pub job_type: String,
    pub channel: String,
    pub total_executions: usize,
    pub exporter_version: String,
}

/// Execution-group artifact: header plus the full record list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionsArtifact {
    pub export_metadata: ExecutionsMetadata,
    pub executions: Vec<ExecutionRecord>,
}

impl ExecutionsArtifact {
    pub fn new(
        export_date: DateTime<Utc>,
        target_date: NaiveDate,
        key: &ExportGroupKey,
        executions: Vec<ExecutionRecord>,
    ) -> Self {
        Self {
            export_metadata: ExecutionsMetadata {
                export_date,
                target_date,
                saas_edge_id: key.saas_edge_id.clone(),
                job_type: key.job_type.clone(),
                channel: key.channel.clone(),
                total_executions: executions.len(),
                exporter_version: EXPORTER_VERSION.to_string(),
            },
            executions,
        }
    }
}

/// Metadata header of a daily-summary artifact. Carries a `type` marker
/// instead of the key triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryMetadata {
    pub export_date: DateTime<Utc>,
    pub target_date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub exporter_version: String,
}

/// Daily-summary artifact: header plus the stats rows for one key triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryArtifact {
    pub export_metadata: SummaryMetadata,
    pub summary_stats: Vec<SummaryStat>,
}

impl SummaryArtifact {
    pub fn new(
        export_date: DateTime<Utc>,
        target_date: NaiveDate,
        summary_stats: Vec<SummaryStat>,
    ) -> Self {
        Self {
            export_metadata: SummaryMetadata {
                export_date,
                target_date,
                kind: "daily_summary".to_string(),
                exporter_version: EXPORTER_VERSION.to_string(),
            },
            summary_stats,
        }
    }
}

/// Outcome of one export run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub target_date: NaiveDate,
    pub total_executions: usize,
    pub total_groups: usize,
    pub uploaded_files: Vec<String>,
}

impl ExportResult {
    /// Success result after uploading.
    pub fn success(
        target_date: NaiveDate,
        total_executions: usize,
        total_groups: usize,
        uploaded_files: Vec<String>,
    ) -> Self {
        Self {
            status: "success".to_string(),
            message: None,
            target_date,
            total_executions,
            total_groups,
            uploaded_files,
        }
    }

    /// The no-data outcome: still a success, with an explanatory message
    /// and an empty upload list.
    pub fn no_logs(target_date: NaiveDate) -> Self {
        Self {
            status: "success".to_string(),
            message: Some("No logs found".to_string()),
            target_date,
            total_executions: 0,
            total_groups: 0,
            uploaded_files: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::ExecutionStatus;
    use chrono::TimeZone;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn record(saas_edge_id: &str, job_type: &str, channel: &str, id: &str) -> ExecutionRecord {
        ExecutionRecord {
            execution_id: id.to_string(),
            saas_edge_id: saas_edge_id.to_string(),
            job_type: job_type.to_string(),
            channel: channel.to_string(),
            workflow_name: "wf".to_string(),
            status: ExecutionStatus::Success,
            mode: "trigger".to_string(),
            started_at: None,
            stopped_at: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            finished: true,
            retry_of: None,
            execution_date: date(),
            duration_ms: None,
        }
    }

    #[test]
    fn test_path_is_literal_substitution() {
        let key = ExportGroupKey::new("acme", "workflow", "production");
        assert_eq!(
            artifact_path("n8n", &key, date(), "executions_20240115.json"),
            "n8n/acme/workflow/production/2024-01-15/executions_20240115.json"
        );
    }

    #[test]
    fn test_path_keeps_segments_verbatim() {
        // No normalization: odd key values pass through untouched.
        let key = ExportGroupKey::new("Acme Inc", "Scheduled", "PROD");
        assert_eq!(
            artifact_path("logs", &key, date(), "f.json"),
            "logs/Acme Inc/Scheduled/PROD/2024-01-15/f.json"
        );
    }

    #[test]
    fn test_filenames_strip_date_dashes() {
        assert_eq!(executions_filename(date()), "executions_20240115.json");
        assert_eq!(summary_filename(date()), "summary_20240115.json");
    }

    #[test]
    fn test_group_records_preserves_order() {
        let records = vec![
            record("acme", "workflow", "production", "1"),
            record("acme", "workflow", "production", "2"),
            record("beta", "webhook", "production", "3"),
            record("acme", "workflow", "production", "4"),
        ];

        let groups = group_records(records);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, ExportGroupKey::new("acme", "workflow", "production"));
        let ids: Vec<&str> = groups[0]
            .records
            .iter()
            .map(|r| r.execution_id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
        assert_eq!(groups[1].records.len(), 1);
    }

    #[test]
    fn test_group_records_empty_input() {
        assert!(group_records(Vec::new()).is_empty());
    }

    #[test]
    fn test_executions_artifact_header() {
        let key = ExportGroupKey::new("acme", "workflow", "production");
        let export_date = Utc.with_ymd_and_hms(2024, 1, 16, 1, 0, 0).unwrap();
        let artifact = ExecutionsArtifact::new(
            export_date,
            date(),
            &key,
            vec![record("acme", "workflow", "production", "1")],
        );

        let json = serde_json::to_value(&artifact).unwrap();
        let meta = &json["export_metadata"];
        assert_eq!(meta["saas_edge_id"], "acme");
        assert_eq!(meta["total_executions"], 1);
        assert_eq!(meta["exporter_version"], EXPORTER_VERSION);
        assert_eq!(meta["target_date"], "2024-01-15");
        assert_eq!(json["executions"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_summary_artifact_header_has_type_marker() {
        let export_date = Utc.with_ymd_and_hms(2024, 1, 16, 1, 0, 0).unwrap();
        let artifact = SummaryArtifact::new(export_date, date(), Vec::new());

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["export_metadata"]["type"], "daily_summary");
        assert!(json["export_metadata"].get("saas_edge_id").is_none());
    }

    #[test]
    fn test_no_logs_result_shape() {
        let result = ExportResult::no_logs(date());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "No logs found");
        assert_eq!(json["total_executions"], 0);
        assert_eq!(json["uploaded_files"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_success_result_omits_message() {
        let result = ExportResult::success(date(), 5, 2, vec!["a".into()]);
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("message"));
        assert!(json.contains("\"total_groups\":2"));
    }
}
