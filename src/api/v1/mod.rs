//! v1 API endpoints

pub mod exports;

use axum::{routing::post, Router};

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new().route("/exports", post(exports::create_export))
}
