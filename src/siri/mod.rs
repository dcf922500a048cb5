//! Vehicle-monitoring snapshots (SIRI VM delivered as JSON).
//!
//! A snapshot is transient: every fetch replaces the previous one wholesale.

use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, warn};

mod models;
use models::*;

use crate::{
    gtfs::{self, Source},
    shared::{Coordinate, NOT_AVAILABLE},
};

/// One vehicle as seen in a vehicle-monitoring snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleActivity {
    /// Missing when the feed has no usable position; such vehicles are not drawn.
    pub location: Option<Coordinate>,
    pub line_name: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub occupancy: Occupancy,
    /// Progress between the previous and the next stop, clamped to 0..=100.
    pub progress: Option<f64>,
    pub previous_calls: Vec<StopCall>,
    pub monitored_call: Option<StopCall>,
    pub onward_calls: Vec<StopCall>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Occupancy {
    pub percentage: Option<f64>,
    pub passengers: Option<u32>,
    pub capacity: Option<u32>,
    pub seats: Option<u32>,
}

/// A call of the vehicle at a stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopCall {
    pub name: Option<String>,
    /// Raw `date`T`time` timestamp as published.
    pub aimed_arrival: Option<String>,
}

impl StopCall {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// The time-of-day part of the aimed arrival, `HH:MM:SS` when it parses.
    pub fn arrival_clock(&self) -> String {
        let Some(raw) = self.aimed_arrival.as_deref() else {
            return NOT_AVAILABLE.to_string();
        };
        if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
            return time.format("%H:%M:%S").to_string();
        }
        if let Ok(time) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
            return time.format("%H:%M:%S").to_string();
        }
        match raw.split_once('T') {
            Some((_, clock)) if !clock.is_empty() => clock.to_string(),
            _ => NOT_AVAILABLE.to_string(),
        }
    }
}

/// A stop line in a vehicle popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallLine {
    pub name: String,
    pub arrival: String,
}

impl From<&StopCall> for CallLine {
    fn from(call: &StopCall) -> Self {
        Self {
            name: call.display_name().to_string(),
            arrival: call.arrival_clock(),
        }
    }
}

/// Everything the vehicle popup displays, missing values already rendered as "N/A".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehiclePopup {
    pub line_name: String,
    pub origin: String,
    pub destination: String,
    /// Progress bar fill, 0..=100. Zero when unknown.
    pub progress: f64,
    pub progress_label: String,
    /// "passengers/capacity".
    pub occupancy: String,
    pub occupancy_percentage: String,
    pub seats: String,
    pub previous_stops: Vec<CallLine>,
    pub current_stop: CallLine,
    pub upcoming_stops: Vec<CallLine>,
}

impl VehicleActivity {
    pub fn popup(&self) -> VehiclePopup {
        let text = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.into());
        let occupancy = &self.occupancy;
        VehiclePopup {
            line_name: text(&self.line_name),
            origin: text(&self.origin),
            destination: text(&self.destination),
            progress: self.progress.unwrap_or(0.0),
            progress_label: display(self.progress),
            occupancy: format!(
                "{}/{}",
                display(occupancy.passengers),
                display(occupancy.capacity)
            ),
            occupancy_percentage: display(occupancy.percentage),
            seats: display(occupancy.seats),
            previous_stops: self.previous_calls.iter().map(CallLine::from).collect(),
            current_stop: self
                .monitored_call
                .as_ref()
                .map(CallLine::from)
                .unwrap_or_else(|| CallLine::from(&StopCall::default())),
            upcoming_stops: self.onward_calls.iter().map(CallLine::from).collect(),
        }
    }
}

fn display<T: ToString>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub async fn load_snapshot<S: Source>(
    source: &S,
    config: &gtfs::Config,
) -> Result<Vec<VehicleActivity>, gtfs::Error> {
    let name = &config.vehicles_file_name;
    debug!("Fetching {name}...");
    let now = Instant::now();
    let bytes = source.fetch(name).await?;
    let vehicles = parse_snapshot(&bytes)?;
    debug!(
        "Fetching {name} took {:?} ({} vehicles)",
        now.elapsed(),
        vehicles.len()
    );
    Ok(vehicles)
}

pub fn parse_snapshot(bytes: &[u8]) -> Result<Vec<VehicleActivity>, gtfs::Error> {
    let document: SiriDocument = serde_json::from_slice(bytes)?;
    let vehicles = document
        .siri
        .service_delivery
        .vehicle_monitoring_delivery
        .map(OneOrMany::into_vec)
        .unwrap_or_default()
        .into_iter()
        .flat_map(|delivery| {
            delivery
                .vehicle_activity
                .map(OneOrMany::into_vec)
                .unwrap_or_default()
        })
        .map(vehicle_from_raw)
        .collect();
    Ok(vehicles)
}

fn vehicle_from_raw(value: RawVehicleActivity) -> VehicleActivity {
    let journey = value.monitored_vehicle_journey;
    let location = journey.vehicle_location.and_then(|location| {
        let latitude = location.latitude.and_then(Text::into_string);
        let longitude = location.longitude.and_then(Text::into_string);
        Coordinate::parse(latitude.as_deref(), longitude.as_deref())
    });
    let occupancy = value
        .extensions
        .and_then(|extensions| extensions.occupancy)
        .map(occupancy_from_raw)
        .unwrap_or_default();
    let progress = value
        .progress_between_stops
        .and_then(|progress| number(progress.percentage))
        .and_then(clamp_progress);

    VehicleActivity {
        location,
        line_name: journey.published_line_name.and_then(Text::into_string),
        origin: journey.origin_name.and_then(Text::into_string),
        destination: journey.destination_name.and_then(Text::into_string),
        occupancy,
        progress,
        previous_calls: journey
            .previous_calls
            .and_then(|raw| raw.previous_call)
            .map(calls)
            .unwrap_or_default(),
        monitored_call: journey.monitored_call.map(call_from_raw),
        onward_calls: journey
            .onward_calls
            .and_then(|raw| raw.onward_call)
            .map(calls)
            .unwrap_or_default(),
    }
}

fn occupancy_from_raw(value: RawOccupancy) -> Occupancy {
    Occupancy {
        percentage: number(value.percentage),
        passengers: count(value.passengers),
        capacity: count(value.capacity),
        seats: count(value.seats),
    }
}

fn call_from_raw(value: RawCall) -> StopCall {
    StopCall {
        name: value.stop_point_name.and_then(Text::into_string),
        aimed_arrival: value.aimed_arrival_time.and_then(Text::into_string),
    }
}

fn calls(raw: OneOrMany<RawCall>) -> Vec<StopCall> {
    raw.into_vec().into_iter().map(call_from_raw).collect()
}

fn number(text: Option<Text>) -> Option<f64> {
    text.and_then(Text::into_string)?
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

fn count(text: Option<Text>) -> Option<u32> {
    number(text)
        .filter(|value| *value >= 0.0)
        .map(|value| value.round() as u32)
}

/// Clamps a progress percentage into 0..=100.
pub fn clamp_progress(value: f64) -> Option<f64> {
    if !value.is_finite() {
        warn!("Ignoring non-numeric progress {value}");
        return None;
    }
    if !(0.0..=100.0).contains(&value) {
        warn!("Progress {value} is outside 0..=100, clamping");
    }
    Some(value.clamp(0.0, 100.0))
}
