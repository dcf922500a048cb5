/// Names of the tables inside a [`Source`](super::Source).
///
/// A name ending in `.json` is read as a JSON array of row objects,
/// anything else as CSV with a header line.
#[derive(Debug, Clone)]
pub struct Config {
    pub stops_file_name: String,
    pub stop_times_file_name: String,
    pub trips_file_name: String,
    pub vehicles_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stops_file_name: "stops.txt".into(),
            stop_times_file_name: "stop_times.txt".into(),
            trips_file_name: "trips.txt".into(),
            vehicles_file_name: "siri.json".into(),
        }
    }
}

impl Config {
    /// Tables exported as JSON row arrays next to the snapshot.
    pub fn json() -> Self {
        Self {
            stops_file_name: "stops.json".into(),
            stop_times_file_name: "stop_times.json".into(),
            trips_file_name: "trips.json".into(),
            ..Default::default()
        }
    }
}
