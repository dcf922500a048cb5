use serde::Serialize;
use std::sync::Arc;

use crate::{
    repository::{RankedDeparture, TripStop},
    shared::Coordinate,
    siri::VehiclePopup,
};

/// The trip currently drawn on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Selection {
    pub trip_id: Option<Arc<str>>,
    /// Stops along the trip in sequence order.
    pub stops: Vec<TripStop>,
    /// Polyline to draw and animate along, road geometry or the stop path.
    pub path: Arc<[Coordinate]>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.trip_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopPopup {
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub coordinate: Option<Coordinate>,
    pub departures: Vec<RankedDeparture>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleMarker {
    pub position: Coordinate,
    pub popup: VehiclePopup,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapDefaults {
    pub center: Coordinate,
    pub zoom: f64,
    pub zoom_threshold: f64,
}
