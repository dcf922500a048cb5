use serde::Serialize;
use std::sync::Arc;

use crate::shared::{Coordinate, Time};

/// A physical point where passengers can board or alight from a vehicle.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Stop {
    /// Position in [`Repository::stops`](super::Repository::stops).
    #[serde(skip)]
    pub index: u32,
    /// Unique external identifier for the stop.
    pub id: Arc<str>,
    /// Human-readable name, the id when the feed has none.
    pub name: Arc<str>,
    /// None when the feed had no usable latitude/longitude.
    /// Such stops are never drawn or joined into a path.
    pub coordinate: Option<Coordinate>,
}

/// A scheduled visit of one trip to one stop.
#[derive(Debug, Default, Clone)]
pub struct StopTime {
    pub index: u32,
    pub trip_id: Arc<str>,
    pub stop_id: Arc<str>,
    /// The order of this stop within the trip.
    pub sequence: u32,
    /// Arrival as published, `HH:MM:SS`.
    pub arrival_time: Arc<str>,
    pub departure_time: Arc<str>,
    /// Parsed arrival, None if the published value is not a valid time.
    pub arrival: Option<Time>,
    pub departure: Option<Time>,
}

/// A single scheduled run of a vehicle.
#[derive(Debug, Default, Clone)]
pub struct Trip {
    pub index: u32,
    pub id: Arc<str>,
    pub headsign: Option<Arc<str>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDeparture {
    pub trip_id: Arc<str>,
    pub headsign: Arc<str>,
    pub arrival_time: Arc<str>,
}

/// One entry of a trip's path: a stop it calls at, with its position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripStop {
    pub stop_id: Arc<str>,
    pub coordinate: Coordinate,
    pub arrival_time: Arc<str>,
}
