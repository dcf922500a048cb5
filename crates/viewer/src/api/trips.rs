use std::{collections::HashMap, sync::Arc};

use crate::{dto::AnimatedVehicleDto, state::AppState};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Selects a trip. With `from_stop` the vehicle starts at that stop.
pub async fn select_trip(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let selection = match params.get("from_stop") {
        Some(stop_id) => state.session.select_trip_from_stop(&id, stop_id).await,
        None => state.session.select_trip(&id).await,
    };
    Json(selection.as_ref().clone()).into_response()
}

pub async fn selection(State(state): State<Arc<AppState>>) -> Response {
    Json(state.session.selection().as_ref().clone()).into_response()
}

pub async fn clear_selection(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.clear_selection().await;
    StatusCode::NO_CONTENT
}

pub async fn vehicle(State(state): State<Arc<AppState>>) -> Response {
    let selection = state.session.selection();
    let frame = state.session.animation();
    Json(AnimatedVehicleDto::from(&selection, frame)).into_response()
}
