//! Export trigger endpoint

use axum::extract::State;
use chrono::Utc;
use tracing::error;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ExportRequest, Json};
use crate::domain::export::ExportResult;

/// POST /v1/exports - run one export for the requested date and filters
///
/// The body mirrors what a nightly scheduler posts: an optional date
/// (`"yesterday"`, `"today"`, or explicit `YYYY-MM-DD`) and the three
/// optional filters. An empty JSON object is a valid request.
pub async fn create_export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<ExportResult>, ApiError> {
    let target_date = request
        .resolve_target_date(Utc::now().date_naive())
        .map_err(ApiError::from)?;

    let query = request.into_query(target_date);
    let result = state.export_service.export(&query).await.map_err(|e| {
        error!(date = %target_date, error = %e, "Export failed");
        ApiError::from(e)
    })?;

    Ok(Json(result))
}
