use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GtfsStop {
    pub stop_id: String,
    #[serde(default)]
    pub stop_name: Option<String>,
    #[serde(default)]
    pub stop_lat: Option<String>,
    #[serde(default)]
    pub stop_lon: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GtfsStopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: String,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GtfsTrip {
    pub trip_id: String,
    #[serde(default)]
    pub trip_headsign: Option<String>,
}
