use geojson::{GeoJson, Geometry, Value};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use tracing::debug;

use crate::{
    geometry::{Error, RouteProvider},
    shared::Coordinate,
};

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub profile: String,
    pub api_key: String,
}

impl OrsConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".into(),
            profile: "driving-car".into(),
            api_key: api_key.into(),
        }
    }
}

/// Directions from an openrouteservice instance.
#[derive(Debug, Clone)]
pub struct OpenRouteService {
    client: reqwest::Client,
    config: OrsConfig,
}

#[derive(Serialize)]
struct DirectionsRequest {
    // [longitude, latitude] pairs
    coordinates: Vec<[f64; 2]>,
}

impl OpenRouteService {
    pub fn new(config: OrsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

impl RouteProvider for OpenRouteService {
    async fn directions(&self, path: &[Coordinate]) -> Result<Vec<Coordinate>, Error> {
        let url = format!(
            "{}/v2/directions/{}/geojson",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile
        );
        let request = DirectionsRequest {
            coordinates: path
                .iter()
                .map(|coordinate| [coordinate.longitude, coordinate.latitude])
                .collect(),
        };
        debug!("Requesting directions for {} points", path.len());
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        parse_directions(&body)
    }
}

/// Reads the route polyline out of a GeoJSON directions answer.
pub fn parse_directions(body: &[u8]) -> Result<Vec<Coordinate>, Error> {
    let geometry = match serde_json::from_slice::<GeoJson>(body)? {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .find_map(|feature| feature.geometry),
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::Geometry(geometry) => Some(geometry),
    };
    let points = geometry.map(line_points).unwrap_or_default();
    if points.is_empty() {
        return Err(Error::NoGeometry);
    }
    Ok(points)
}

fn line_points(geometry: Geometry) -> Vec<Coordinate> {
    let positions = match geometry.value {
        Value::LineString(positions) => positions,
        Value::MultiLineString(lines) => lines.into_iter().flatten().collect(),
        _ => Vec::new(),
    };
    positions
        .into_iter()
        .filter(|position| position.len() >= 2)
        .map(|position| Coordinate::new(position[1], position[0]))
        .collect()
}
