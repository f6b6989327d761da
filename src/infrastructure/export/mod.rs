//! Export service implementation

mod service;

pub use service::LogExportService;
