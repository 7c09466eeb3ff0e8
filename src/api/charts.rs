use axum::{Json, extract::State};
use std::sync::Arc;

use super::AppState;
use crate::services::reporting::ChartRow;

/// GET /chart-data
/// One object per distinct date. Returns the bare array, not the response
/// envelope, for output-shape compatibility with existing chart consumers.
pub async fn chart_data(State(state): State<Arc<AppState>>) -> Json<Vec<ChartRow>> {
    Json(state.reporting().chart().await)
}
