//! HTTP API request/response types

pub mod error;
pub mod export;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use export::ExportRequest;
pub use json::Json;
