use busmap::{
    prelude::*,
    session::StopPopup,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StopDto {
    pub id: String,
    pub name: String,
    pub coordinate: Option<Coordinate>,
}

impl StopDto {
    pub fn from(stop: &Stop) -> Self {
        Self {
            id: stop.id.to_string(),
            name: stop.name.to_string(),
            coordinate: stop.coordinate,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartureDto {
    pub trip_id: String,
    pub headsign: String,
    pub arrival_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopPopupDto {
    pub stop: StopDto,
    pub departures: Vec<DepartureDto>,
}

impl StopPopupDto {
    pub fn from(popup: StopPopup) -> Self {
        let stop = StopDto {
            id: popup.id.to_string(),
            name: popup.name.to_string(),
            coordinate: popup.coordinate,
        };
        let departures = popup
            .departures
            .into_iter()
            .map(|departure| DepartureDto {
                trip_id: departure.trip_id.to_string(),
                headsign: departure.headsign.to_string(),
                arrival_time: departure.arrival_time.to_string(),
            })
            .collect();
        Self { stop, departures }
    }
}
