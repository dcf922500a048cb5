//! One map view: the published data snapshot, the zoom level reported by
//! the map, the selected trip and the vehicle animation along it.
//!
//! Every reader sees a whole snapshot. Reloads build a new [`Repository`]
//! off to the side and publish it in one swap.

use std::{sync::Arc, time::Instant};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info};

mod models;
mod settings;
pub use models::*;
pub use settings::*;

use crate::{
    animator::{AnimationState, Frame, VehicleAnimator},
    geometry::{GeometryAdapter, RouteProvider},
    gtfs::{self, Source},
    repository::{Repository, Stop, TripStop},
    shared::{Coordinate, closest_index},
    siri::{self, VehicleActivity},
};

pub struct Session<P> {
    settings: Settings,
    repository: watch::Sender<Arc<Repository>>,
    vehicles: watch::Sender<Arc<[VehicleActivity]>>,
    selection: watch::Sender<Arc<Selection>>,
    zoom: watch::Sender<f64>,
    // Bumped by every selection change; a route answer that comes back
    // under an older generation is dropped.
    generation: Mutex<u64>,
    geometry: GeometryAdapter<P>,
    animator: VehicleAnimator,
}

impl<P: RouteProvider> Session<P> {
    /// Starts with an empty snapshot. Must be called inside a tokio runtime.
    pub fn new(settings: Settings, provider: P) -> Self {
        let geometry = GeometryAdapter::new(provider).with_timeout(settings.route_timeout);
        let animator = VehicleAnimator::spawn(settings.tick_interval);
        let (repository, _) = watch::channel(Arc::new(Repository::new()));
        let (vehicles, _) = watch::channel(Arc::<[VehicleActivity]>::from(Vec::new()));
        let (selection, _) = watch::channel(Arc::new(Selection::default()));
        let (zoom, _) = watch::channel(settings.default_zoom);
        Self {
            settings,
            repository,
            vehicles,
            selection,
            zoom,
            generation: Mutex::new(0),
            geometry,
            animator,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Reloads every table and the vehicle snapshot from `source`.
    /// Failed tables leave their part of the snapshot empty.
    pub async fn reload<S: Source>(&self, source: &S, config: &gtfs::Config) {
        info!("Reloading data...");
        let now = Instant::now();
        let tables = gtfs::load_tables(source, config).await;
        let repository = tokio::task::spawn_blocking(move || Repository::from_tables(tables))
            .await
            .unwrap_or_else(|err| {
                error!("Failed to build repository: {err}");
                Repository::new()
            });
        self.publish(repository).await;

        match siri::load_snapshot(source, config).await {
            Ok(vehicles) => self.publish_vehicles(vehicles),
            Err(err) => {
                error!("Failed to load vehicle snapshot: {err}");
                self.publish_vehicles(Vec::new());
            }
        }
        info!("Reloading data took {:?}", now.elapsed());
    }

    /// Swaps in a new snapshot. The selection refers to the old one and is cleared.
    pub async fn publish(&self, repository: Repository) {
        let mut generation = self.generation.lock().await;
        *generation += 1;
        self.animator.stop();
        self.selection.send_replace(Arc::new(Selection::default()));
        self.repository.send_replace(Arc::new(repository));
    }

    pub fn publish_vehicles(&self, vehicles: Vec<VehicleActivity>) {
        debug!("Publishing {} vehicles", vehicles.len());
        self.vehicles.send_replace(vehicles.into());
    }

    /// The current snapshot. Stays valid while held, even across a reload.
    pub fn snapshot(&self) -> Arc<Repository> {
        self.repository.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Repository>> {
        self.repository.subscribe()
    }

    /// Called by the map whenever its zoom changes.
    pub fn set_zoom(&self, zoom: f64) {
        self.zoom.send_replace(zoom);
    }

    pub fn zoom(&self) -> f64 {
        *self.zoom.borrow()
    }

    pub fn map_defaults(&self) -> MapDefaults {
        MapDefaults {
            center: self.settings.default_center,
            zoom: self.settings.default_zoom,
            zoom_threshold: self.settings.zoom_threshold,
        }
    }

    /// Stops to draw as markers: every stop with a position once the map is
    /// zoomed in far enough, nothing before that.
    pub fn list_stops(&self) -> Vec<Stop> {
        if self.zoom() < self.settings.zoom_threshold {
            return Vec::new();
        }
        self.snapshot().mapped_stops().cloned().collect()
    }

    pub fn popup_content(&self, stop_id: &str) -> Option<StopPopup> {
        let repository = self.snapshot();
        let stop = repository.stop_by_id(stop_id)?;
        Some(StopPopup {
            id: stop.id.clone(),
            name: stop.name.clone(),
            coordinate: stop.coordinate,
            departures: repository.top_departures(&stop.id, self.settings.departures),
        })
    }

    /// Selects a trip and animates a vehicle along it from the first point.
    pub async fn select_trip(&self, trip_id: &str) -> Arc<Selection> {
        self.select(trip_id, None).await
    }

    /// Selects a trip from a stop popup. The vehicle starts at the point of
    /// the route closest to that stop.
    pub async fn select_trip_from_stop(&self, trip_id: &str, stop_id: &str) -> Arc<Selection> {
        self.select(trip_id, Some(stop_id)).await
    }

    async fn select(&self, trip_id: &str, from_stop: Option<&str>) -> Arc<Selection> {
        let generation = {
            let mut generation = self.generation.lock().await;
            *generation += 1;
            self.animator.stop();
            *generation
        };

        let repository = self.snapshot();
        let stops = repository.path_for(trip_id);
        let stop_path: Vec<Coordinate> = stops.iter().map(|stop| stop.coordinate).collect();
        let path: Arc<[Coordinate]> = self.geometry.road_path_or_fallback(&stop_path).await.into();
        let start = from_stop
            .and_then(|stop_id| repository.stop_by_id(stop_id))
            .and_then(|stop| stop.coordinate)
            .and_then(|coordinate| closest_index(&path, &coordinate))
            .unwrap_or(0);

        let current = self.generation.lock().await;
        if *current != generation {
            debug!("Discarding stale path for trip {trip_id}");
            return self.selection();
        }
        let selection = Arc::new(Selection {
            trip_id: Some(trip_id.into()),
            stops,
            path: path.clone(),
        });
        self.selection.send_replace(selection.clone());
        self.animator.start_at(path, start);
        selection
    }

    pub async fn clear_selection(&self) {
        let mut generation = self.generation.lock().await;
        *generation += 1;
        self.animator.stop();
        self.selection.send_replace(Arc::new(Selection::default()));
    }

    pub fn selection(&self) -> Arc<Selection> {
        self.selection.borrow().clone()
    }

    pub fn subscribe_selection(&self) -> watch::Receiver<Arc<Selection>> {
        self.selection.subscribe()
    }

    /// The polyline of the selected trip, empty without a selection.
    pub fn selected_path(&self) -> Arc<[Coordinate]> {
        self.selection.borrow().path.clone()
    }

    pub fn selected_stops(&self) -> Vec<TripStop> {
        self.selection.borrow().stops.clone()
    }

    pub fn animated_position(&self) -> Option<Coordinate> {
        self.animator.position()
    }

    pub fn animation(&self) -> Frame {
        self.animator.frame()
    }

    pub fn animation_state(&self) -> AnimationState {
        self.animator.state()
    }

    pub fn subscribe_animation(&self) -> watch::Receiver<Frame> {
        self.animator.subscribe()
    }

    pub fn vehicles(&self) -> Arc<[VehicleActivity]> {
        self.vehicles.borrow().clone()
    }

    /// Vehicles with a position, each with its popup content.
    pub fn vehicle_markers(&self) -> Vec<VehicleMarker> {
        self.vehicles()
            .iter()
            .filter_map(|vehicle| {
                Some(VehicleMarker {
                    position: vehicle.location?,
                    popup: vehicle.popup(),
                })
            })
            .collect()
    }
}
