mod api;
mod dto;
mod state;

use crate::state::AppState;
use axum::routing::{get, post};
use busmap::prelude::*;
use std::{sync::Arc, time::Instant};
use tracing::{error, info, warn};

const PORT: u32 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting viewer...");
    let args: Vec<_> = std::env::args().collect();
    if args.len() < 2 {
        error!("Missing data location (directory, gtfs zip or base url)");
        std::process::exit(1);
    }
    let source = DataSource::from_location(&args[1]);
    let config = match args.get(2).map(String::as_str) {
        Some("json") => Config::json(),
        _ => Config::default(),
    };

    let provider = match std::env::var("ORS_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Some(OpenRouteService::new(OrsConfig::new(key))),
        _ => {
            warn!("ORS_API_KEY is not set, trips are drawn stop to stop");
            None
        }
    };

    let state = Arc::new(AppState {
        session: Session::new(Settings::default(), provider),
        source,
        config,
    });

    info!("Loading data...");
    let now = Instant::now();
    state.reload().await;
    info!("Loading data took {:?}", now.elapsed());

    let app = axum::Router::new()
        .route("/map", get(api::map))
        .route("/stops", get(api::stops))
        .route("/stops/{id}", get(api::stop))
        .route("/trips/{id}/select", post(api::select_trip))
        .route(
            "/selection",
            get(api::selection).delete(api::clear_selection),
        )
        .route("/vehicle", get(api::vehicle))
        .route("/vehicles", get(api::vehicles))
        .route("/reload", post(api::reload))
        .with_state(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", PORT)).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {PORT}: {err}");
            std::process::exit(1);
        }
    };
    info!("Listening to port {PORT}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
    }
}
