//! Export request body for the HTTP trigger

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::execution::ExecutionQuery;
use crate::domain::DomainError;

/// Body of `POST /v1/exports`. All fields optional; an absent or
/// `"yesterday"` date selects the previous calendar day, which is what a
/// nightly scheduler posting `{"date": "yesterday"}` wants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportRequest {
    pub date: Option<String>,
    pub saas_edge_id: Option<String>,
    pub job_type: Option<String>,
    pub channel: Option<String>,
}

impl ExportRequest {
    /// Resolve `"yesterday"` / `"today"` / explicit `YYYY-MM-DD` against
    /// the given current date.
    pub fn resolve_target_date(&self, today: NaiveDate) -> Result<NaiveDate, DomainError> {
        match self.date.as_deref() {
            None | Some("yesterday") => Ok(today - Duration::days(1)),
            Some("today") => Ok(today),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                DomainError::validation(format!(
                    "Invalid date '{}': expected YYYY-MM-DD, 'yesterday', or 'today'",
                    raw
                ))
            }),
        }
    }

    /// Build the repository query for this request.
    pub fn into_query(self, target_date: NaiveDate) -> ExecutionQuery {
        ExecutionQuery {
            target_date,
            saas_edge_id: self.saas_edge_id,
            job_type: self.job_type,
            channel: self.channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
    }

    #[test]
    fn test_absent_date_means_yesterday() {
        let request = ExportRequest::default();
        assert_eq!(
            request.resolve_target_date(today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_yesterday_and_today_keywords() {
        let request = ExportRequest {
            date: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert_eq!(
            request.resolve_target_date(today()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );

        let request = ExportRequest {
            date: Some("today".to_string()),
            ..Default::default()
        };
        assert_eq!(request.resolve_target_date(today()).unwrap(), today());
    }

    #[test]
    fn test_explicit_date() {
        let request = ExportRequest {
            date: Some("2023-12-31".to_string()),
            ..Default::default()
        };
        assert_eq!(
            request.resolve_target_date(today()).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_invalid_date_is_a_validation_error() {
        let request = ExportRequest {
            date: Some("01/15/2024".to_string()),
            ..Default::default()
        };
        let err = request.resolve_target_date(today()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_into_query_carries_filters() {
        let request = ExportRequest {
            date: None,
            saas_edge_id: Some("acme".to_string()),
            job_type: None,
            channel: Some("production".to_string()),
        };
        let query = request.into_query(today());
        assert_eq!(query.target_date, today());
        assert_eq!(query.saas_edge_id.as_deref(), Some("acme"));
        assert!(query.job_type.is_none());
        assert_eq!(query.channel.as_deref(), Some("production"));
    }
}
