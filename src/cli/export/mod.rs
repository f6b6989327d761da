//! Export command - runs one export and prints the result as JSON

use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use serde_json::json;
use tracing::error;

use crate::config::AppConfig;
use crate::domain::execution::ExecutionQuery;
use crate::domain::export::ExportResult;
use crate::domain::DomainError;
use crate::infrastructure::logging;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Target date (YYYY-MM-DD)
    #[arg(long, required_unless_present = "yesterday", conflicts_with = "yesterday")]
    pub date: Option<String>,

    /// Export yesterday's logs
    #[arg(long)]
    pub yesterday: bool,

    /// Filter by SaaS Edge ID
    #[arg(long)]
    pub saas_edge_id: Option<String>,

    /// Filter by job type
    #[arg(long)]
    pub job_type: Option<String>,

    /// Filter by channel
    #[arg(long)]
    pub channel: Option<String>,
}

impl ExportArgs {
    /// `--yesterday` resolves against the current date; `--date` must be
    /// an explicit `YYYY-MM-DD`.
    fn target_date(&self, today: NaiveDate) -> Result<NaiveDate, DomainError> {
        if self.yesterday {
            return Ok(today - Duration::days(1));
        }
        let raw = self
            .date
            .as_deref()
            .ok_or_else(|| DomainError::validation("Either --date or --yesterday is required"))?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            DomainError::validation(format!("Invalid date '{}': expected YYYY-MM-DD", raw))
        })
    }

    fn into_query(self, target_date: NaiveDate) -> ExecutionQuery {
        ExecutionQuery {
            target_date,
            saas_edge_id: self.saas_edge_id,
            job_type: self.job_type,
            channel: self.channel,
        }
    }
}

/// Run the export command. Prints the result document to stdout; on a
/// fatal failure prints a structured error document and exits non-zero.
pub async fn run(args: ExportArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    match run_export(args, &config).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Export failed");
            let body = json!({ "status": "error", "message": e.to_string() });
            println!("{}", serde_json::to_string_pretty(&body)?);
            std::process::exit(1);
        }
    }
}

async fn run_export(args: ExportArgs, config: &AppConfig) -> anyhow::Result<ExportResult> {
    let target_date = args.target_date(Utc::now().date_naive())?;
    let query = args.into_query(target_date);

    let state = crate::create_app_state(config).await?;
    Ok(state.export_service.export(&query).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
    }

    fn args(date: Option<&str>, yesterday: bool) -> ExportArgs {
        ExportArgs {
            date: date.map(String::from),
            yesterday,
            saas_edge_id: None,
            job_type: None,
            channel: None,
        }
    }

    #[test]
    fn test_yesterday_flag_wins() {
        let resolved = args(None, true).target_date(today()).unwrap();
        assert_eq!(resolved, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_explicit_date() {
        let resolved = args(Some("2023-12-01"), false).target_date(today()).unwrap();
        assert_eq!(resolved, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
    }

    #[test]
    fn test_malformed_date_rejected() {
        let err = args(Some("15-01-2024"), false).target_date(today()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }
}
