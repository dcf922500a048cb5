use std::sync::Arc;

use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::info;

/// Live vehicles with their popup content.
pub async fn vehicles(State(state): State<Arc<AppState>>) -> Response {
    Json(state.session.vehicle_markers()).into_response()
}

pub async fn reload(State(state): State<Arc<AppState>>) -> StatusCode {
    info!("Reload requested");
    state.reload().await;
    StatusCode::NO_CONTENT
}
