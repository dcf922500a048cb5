use crate::{
    gtfs::{GtfsStop, GtfsStopTime, GtfsTrip, Tables},
    repository::{Repository, Stop, StopTime, Trip},
    shared::{Coordinate, Time},
};
use rayon::prelude::*;
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Instant,
};
use tracing::{debug, error, warn};

impl Repository {
    /// Builds a snapshot from one load cycle.
    /// A table that failed to load is logged and left empty, the others
    /// are indexed as usual.
    pub fn from_tables(tables: Tables) -> Self {
        let mut repository = Self::new();
        match tables.stops {
            Ok(rows) => repository.load_stops(rows),
            Err(err) => error!("Failed to load stops: {err}"),
        }
        match tables.trips {
            Ok(rows) => repository.load_trips(rows),
            Err(err) => error!("Failed to load trips: {err}"),
        }
        match tables.stop_times {
            Ok(rows) => repository.load_stop_times(rows),
            Err(err) => error!("Failed to load stop times: {err}"),
        }
        repository.generate_trip_paths();
        repository.generate_departures();
        repository
    }

    pub fn from_rows(
        stops: Vec<GtfsStop>,
        stop_times: Vec<GtfsStopTime>,
        trips: Vec<GtfsTrip>,
    ) -> Self {
        Self::from_tables(Tables {
            stops: Ok(stops),
            stop_times: Ok(stop_times),
            trips: Ok(trips),
        })
    }

    fn load_stops(&mut self, rows: Vec<GtfsStop>) {
        debug!("Loading stops...");
        let now = Instant::now();
        let mut stop_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut stops: Vec<Stop> = Vec::new();
        let mut duplicates = 0;
        let mut unmapped = 0;
        rows.into_iter().for_each(|row| {
            let id = row.stop_id.trim();
            if id.is_empty() {
                return;
            }
            let id: Arc<str> = id.into();
            let coordinate = Coordinate::parse(row.stop_lat.as_deref(), row.stop_lon.as_deref());
            if coordinate.is_none() {
                unmapped += 1;
            }
            let name = non_empty(row.stop_name).unwrap_or_else(|| id.clone());

            // Last row wins, the stop keeps the position of its first row
            if let Some(index) = stop_lookup.get(&id) {
                duplicates += 1;
                let stop = &mut stops[*index as usize];
                stop.name = name;
                stop.coordinate = coordinate;
                return;
            }

            let index = stops.len() as u32;
            stop_lookup.insert(id.clone(), index);
            stops.push(Stop {
                index,
                id,
                name,
                coordinate,
            });
        });
        if duplicates > 0 {
            warn!("{duplicates} duplicated stop ids, kept the last row of each");
        }
        if unmapped > 0 {
            debug!("{unmapped} stops have no usable coordinates");
        }
        self.stops = stops.into();
        self.stop_lookup = stop_lookup;
        debug!("Loading stops took {:?}", now.elapsed());
    }

    fn load_trips(&mut self, rows: Vec<GtfsTrip>) {
        debug!("Loading trips...");
        let now = Instant::now();
        let mut trip_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut trips: Vec<Trip> = Vec::new();
        rows.into_iter().for_each(|row| {
            let id = row.trip_id.trim();
            if id.is_empty() {
                return;
            }
            let id: Arc<str> = id.into();
            let headsign = non_empty(row.trip_headsign);
            if let Some(index) = trip_lookup.get(&id) {
                trips[*index as usize].headsign = headsign;
                return;
            }
            let index = trips.len() as u32;
            trip_lookup.insert(id.clone(), index);
            trips.push(Trip {
                index,
                id,
                headsign,
            });
        });
        self.trips = trips.into();
        self.trip_lookup = trip_lookup;
        debug!("Loading trips took {:?}", now.elapsed());
    }

    fn load_stop_times(&mut self, rows: Vec<GtfsStopTime>) {
        debug!("Loading stop times...");
        let now = Instant::now();
        // Share one allocation per id across all stop times
        let mut owner_lookup: HashSet<Arc<str>> = HashSet::new();
        let mut intern = |id: &str| -> Arc<str> {
            if let Some(id) = owner_lookup.get(id) {
                id.clone()
            } else {
                let id: Arc<str> = id.into();
                owner_lookup.insert(id.clone());
                id
            }
        };

        let mut stop_times: Vec<StopTime> = Vec::with_capacity(rows.len());
        let mut invalid = 0;
        rows.into_iter().for_each(|row| {
            let Some(sequence) = parse_sequence(&row.stop_sequence) else {
                invalid += 1;
                return;
            };
            let arrival_time: Arc<str> = row.arrival_time.unwrap_or_default().into();
            let departure_time: Arc<str> = row.departure_time.unwrap_or_default().into();
            stop_times.push(StopTime {
                index: stop_times.len() as u32,
                trip_id: intern(row.trip_id.trim()),
                stop_id: intern(row.stop_id.trim()),
                sequence,
                arrival: Time::from_hms(&arrival_time),
                departure: Time::from_hms(&departure_time),
                arrival_time,
                departure_time,
            });
        });
        if invalid > 0 {
            warn!("Dropped {invalid} stop times without a valid stop_sequence");
        }
        self.stop_times = stop_times.into();
        debug!("Loading stop times took {:?}", now.elapsed());
    }

    fn generate_trip_paths(&mut self) {
        debug!("Generating trip paths...");
        let now = Instant::now();
        let mut trip_to_stop_times: HashMap<Arc<str>, Vec<u32>> = HashMap::new();
        self.stop_times.iter().for_each(|stop_time| {
            trip_to_stop_times
                .entry(stop_time.trip_id.clone())
                .or_default()
                .push(stop_time.index);
        });

        let stop_times = &self.stop_times;
        trip_to_stop_times.par_iter_mut().for_each(|(_, indexes)| {
            indexes.sort_by_key(|i| stop_times[*i as usize].sequence);
        });

        self.trip_to_stop_times = trip_to_stop_times
            .into_iter()
            .map(|(trip_id, indexes)| (trip_id, indexes.into()))
            .collect();
        debug!("Generating trip paths took {:?}", now.elapsed());
    }

    fn generate_departures(&mut self) {
        // Ranking every stop up front keeps popup lookups to a slice read
        debug!("Generating departures...");
        let now = Instant::now();
        let mut stop_to_departures: HashMap<Arc<str>, Vec<u32>> = HashMap::new();
        self.stop_times.iter().for_each(|stop_time| {
            stop_to_departures
                .entry(stop_time.stop_id.clone())
                .or_default()
                .push(stop_time.index);
        });

        let stop_times = &self.stop_times;
        stop_to_departures.par_iter_mut().for_each(|(_, indexes)| {
            indexes.sort_by_key(|i| arrival_key(&stop_times[*i as usize]));
        });

        self.stop_to_departures = stop_to_departures
            .into_iter()
            .map(|(stop_id, indexes)| (stop_id, indexes.into()))
            .collect();
        debug!("Generating departures took {:?}", now.elapsed());
    }
}

// Unparseable arrivals sort after every valid time.
fn arrival_key(stop_time: &StopTime) -> u32 {
    stop_time.arrival.map_or(u32::MAX, |time| time.as_seconds())
}

fn parse_sequence(value: &str) -> Option<u32> {
    let value = value.trim();
    value.parse::<u32>().ok().or_else(|| {
        // JSON exports sometimes carry "3.0"
        let value: f64 = value.parse().ok()?;
        (value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64).then_some(value as u32)
    })
}

fn non_empty(value: Option<String>) -> Option<Arc<str>> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(|value| value.into())
}
