use std::{collections::HashMap, sync::Arc};

use crate::{
    dto::{StopDto, StopPopupDto},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn map(State(state): State<Arc<AppState>>) -> Response {
    Json(state.session.map_defaults()).into_response()
}

/// Stop markers. `zoom` is the map's current zoom level.
pub async fn stops(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    if let Some(zoom) = params.get("zoom") {
        let zoom: f64 = zoom.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
        state.session.set_zoom(zoom);
    }
    let result: Vec<_> = state
        .session
        .list_stops()
        .iter()
        .map(StopDto::from)
        .collect();
    Ok(Json(result).into_response())
}

pub async fn stop(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let popup = state
        .session
        .popup_content(&id)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(StopPopupDto::from(popup)).into_response())
}
