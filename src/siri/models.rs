use serde::Deserialize;

// Raw SIRI-JSON as published by the VDV/SIRI converters. Elements that XML
// allows to repeat arrive either as an object or as an array of objects.

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct SiriDocument {
    pub siri: Siri,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Siri {
    pub service_delivery: ServiceDelivery,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ServiceDelivery {
    #[serde(default)]
    pub vehicle_monitoring_delivery: Option<OneOrMany<VehicleMonitoringDelivery>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct VehicleMonitoringDelivery {
    #[serde(default)]
    pub vehicle_activity: Option<OneOrMany<RawVehicleActivity>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawVehicleActivity {
    pub monitored_vehicle_journey: RawJourney,
    #[serde(default)]
    pub extensions: Option<RawExtensions>,
    #[serde(default)]
    pub progress_between_stops: Option<RawProgress>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawJourney {
    #[serde(default)]
    pub vehicle_location: Option<RawLocation>,
    #[serde(default)]
    pub published_line_name: Option<Text>,
    #[serde(default)]
    pub origin_name: Option<Text>,
    #[serde(default)]
    pub destination_name: Option<Text>,
    #[serde(default)]
    pub previous_calls: Option<RawPreviousCalls>,
    #[serde(default)]
    pub monitored_call: Option<RawCall>,
    #[serde(default)]
    pub onward_calls: Option<RawOnwardCalls>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawLocation {
    #[serde(default)]
    pub latitude: Option<Text>,
    #[serde(default)]
    pub longitude: Option<Text>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawPreviousCalls {
    #[serde(default)]
    pub previous_call: Option<OneOrMany<RawCall>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawOnwardCalls {
    #[serde(default)]
    pub onward_call: Option<OneOrMany<RawCall>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawCall {
    #[serde(default)]
    pub stop_point_name: Option<Text>,
    #[serde(default)]
    pub aimed_arrival_time: Option<Text>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RawExtensions {
    #[serde(rename = "init-o:OccupancyData", default)]
    pub occupancy: Option<RawOccupancy>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RawOccupancy {
    #[serde(rename = "init-o:OccupancyPercentage", default)]
    pub percentage: Option<Text>,
    #[serde(rename = "init-o:PassengersNumber", default)]
    pub passengers: Option<Text>,
    #[serde(rename = "init-o:VehicleCapacity", default)]
    pub capacity: Option<Text>,
    #[serde(rename = "init-o:VehicleSeatsNumber", default)]
    pub seats: Option<Text>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawProgress {
    #[serde(default)]
    pub percentage: Option<Text>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(values) => values,
            OneOrMany::One(value) => vec![value],
        }
    }
}

/// A text node. Converters emit plain strings, bare numbers,
/// `{"value": ..}` objects or lists of localized variants.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum Text {
    Plain(String),
    Number(serde_json::Number),
    Localized { value: String },
    List(Vec<Text>),
}

impl Text {
    pub fn into_string(self) -> Option<String> {
        let value = match self {
            Text::Plain(value) => value,
            Text::Number(number) => number.to_string(),
            Text::Localized { value } => value,
            Text::List(values) => return values.into_iter().find_map(Text::into_string),
        };
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    }
}
