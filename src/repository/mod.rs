use std::{collections::HashMap, sync::Arc};

mod models;
pub use models::*;

mod source {
    mod gtfs;
}

use crate::shared::Coordinate;

/// Shown for trips that are not in the trip table or have no headsign.
pub const UNKNOWN_DESTINATION: &str = "Unknown Destination";

/// Departures listed per stop unless asked otherwise.
pub const DEFAULT_DEPARTURES: usize = 5;

type IdToIndex = HashMap<Arc<str>, u32>;
type IdToIndexes = HashMap<Arc<str>, Box<[u32]>>;

/// An immutable snapshot of one table-load cycle.
///
/// Built once from the raw tables and never mutated afterwards; a reload
/// builds a new repository and swaps it in whole.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    pub stops: Box<[Stop]>,
    pub trips: Box<[Trip]>,
    pub stop_times: Box<[StopTime]>,

    stop_lookup: IdToIndex,
    trip_lookup: IdToIndex,
    // Stop time indexes per trip, ordered by sequence.
    trip_to_stop_times: IdToIndexes,
    // Stop time indexes per stop, ordered by arrival time.
    stop_to_departures: IdToIndexes,
}

impl Repository {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty() && self.trips.is_empty() && self.stop_times.is_empty()
    }

    /// Get a stop with the given id.
    /// If no stop is found with the given id None is returned.
    pub fn stop_by_id(&self, id: &str) -> Option<&Stop> {
        let index = self.stop_lookup.get(id)?;
        Some(&self.stops[*index as usize])
    }

    /// Stops that can be placed on a map, in table order.
    pub fn mapped_stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter().filter(|stop| stop.coordinate.is_some())
    }

    /// Gets a trip with the given id.
    /// If no trip with the given id was found None is returned.
    pub fn trip_by_id(&self, id: &str) -> Option<&Trip> {
        let index = self.trip_lookup.get(id)?;
        Some(&self.trips[*index as usize])
    }

    /// The display headsign of a trip, [`UNKNOWN_DESTINATION`] when the
    /// trip is unknown or has no headsign.
    pub fn headsign(&self, trip_id: &str) -> &str {
        self.trip_by_id(trip_id)
            .and_then(|trip| trip.headsign.as_deref())
            .unwrap_or(UNKNOWN_DESTINATION)
    }

    fn resolve_headsign(&self, trip_id: &str) -> Arc<str> {
        self.trip_by_id(trip_id)
            .and_then(|trip| trip.headsign.clone())
            .unwrap_or_else(|| UNKNOWN_DESTINATION.into())
    }

    /// Returns all the stop times for a given trip ordered by sequence.
    /// Empty when the trip has no stop times.
    pub fn stop_times_by_trip_id(&self, trip_id: &str) -> Vec<&StopTime> {
        self.trip_to_stop_times
            .get(trip_id)
            .map(|indexes| {
                indexes
                    .iter()
                    .map(|i| &self.stop_times[*i as usize])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The first `n` departures at a stop, ordered by arrival time.
    /// Rows with equal arrival keep their table order.
    pub fn top_departures(&self, stop_id: &str, n: usize) -> Vec<RankedDeparture> {
        let Some(indexes) = self.stop_to_departures.get(stop_id) else {
            return Vec::new();
        };
        indexes
            .iter()
            .take(n)
            .map(|i| {
                let stop_time = &self.stop_times[*i as usize];
                RankedDeparture {
                    trip_id: stop_time.trip_id.clone(),
                    headsign: self.resolve_headsign(&stop_time.trip_id),
                    arrival_time: stop_time.arrival_time.clone(),
                }
            })
            .collect()
    }

    /// The stops a trip visits in sequence order, joined with their positions.
    /// Stops that are unknown or have no position are left out.
    /// An unknown trip gives an empty path.
    pub fn path_for(&self, trip_id: &str) -> Vec<TripStop> {
        self.stop_times_by_trip_id(trip_id)
            .into_iter()
            .filter_map(|stop_time| {
                let stop = self.stop_by_id(&stop_time.stop_id)?;
                Some(TripStop {
                    stop_id: stop.id.clone(),
                    coordinate: stop.coordinate?,
                    arrival_time: stop_time.arrival_time.clone(),
                })
            })
            .collect()
    }

    /// Just the coordinates of [`Repository::path_for`].
    pub fn coordinates_for(&self, trip_id: &str) -> Vec<Coordinate> {
        self.path_for(trip_id)
            .into_iter()
            .map(|stop| stop.coordinate)
            .collect()
    }
}
