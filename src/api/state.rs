//! Application state for shared services

use std::sync::Arc;

use crate::domain::execution::ExecutionLogRepository;
use crate::domain::export::ExportService;

/// Shared state for the HTTP surface: the export job itself, plus the
/// repository handle the readiness probe uses for connectivity checks.
#[derive(Clone)]
pub struct AppState {
    pub export_service: Arc<dyn ExportService>,
    pub repository: Arc<dyn ExecutionLogRepository>,
}

impl AppState {
    pub fn new(
        export_service: Arc<dyn ExportService>,
        repository: Arc<dyn ExecutionLogRepository>,
    ) -> Self {
        Self {
            export_service,
            repository,
        }
    }
}
