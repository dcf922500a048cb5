use std::time::Duration;

use crate::{
    animator::DEFAULT_INTERVAL, geometry::DEFAULT_TIMEOUT, repository::DEFAULT_DEPARTURES,
    shared::Coordinate,
};

#[derive(Debug, Clone)]
pub struct Settings {
    /// Stop markers are listed only at or above this zoom level.
    pub zoom_threshold: f64,
    pub default_center: Coordinate,
    pub default_zoom: f64,
    /// Departures shown in a stop popup.
    pub departures: usize,
    pub tick_interval: Duration,
    pub route_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zoom_threshold: 15.0,
            default_center: Coordinate::new(48.7665, 11.4257),
            default_zoom: 10.0,
            departures: DEFAULT_DEPARTURES,
            tick_interval: DEFAULT_INTERVAL,
            route_timeout: DEFAULT_TIMEOUT,
        }
    }
}
