//! Road geometry for a trip: asks a directions service for a drivable
//! polyline through the trip's stops and falls back to the straight
//! stop-to-stop path whenever that fails.

use std::{future::Future, time::Duration};
use thiserror::Error;
use tracing::{debug, warn};

mod ors;
pub use ors::*;

use crate::shared::Coordinate;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum Error {
    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Directions service answered with status {0}")]
    Status(u16),
    #[error("Could not decode directions: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Directions service did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Directions service returned no geometry")]
    NoGeometry,
    #[error("Road routing is disabled")]
    Disabled,
}

/// An external directions service.
pub trait RouteProvider: Send + Sync {
    /// A polyline that drives through `path` in order.
    fn directions(
        &self,
        path: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<Coordinate>, Error>> + Send;
}

/// No provider configured, every request is [`Error::Disabled`].
impl<P: RouteProvider> RouteProvider for Option<P> {
    async fn directions(&self, path: &[Coordinate]) -> Result<Vec<Coordinate>, Error> {
        match self {
            Some(provider) => provider.directions(path).await,
            None => Err(Error::Disabled),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeometryAdapter<P> {
    provider: P,
    timeout: Duration,
}

impl<P: RouteProvider> GeometryAdapter<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The road polyline through `path`.
    /// Fewer than two points is nothing to route and yields an empty polyline.
    pub async fn road_path(&self, path: &[Coordinate]) -> Result<Vec<Coordinate>, Error> {
        if path.len() < 2 {
            return Ok(Vec::new());
        }
        let road = tokio::time::timeout(self.timeout, self.provider.directions(path))
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        if road.is_empty() {
            return Err(Error::NoGeometry);
        }
        Ok(road)
    }

    /// [`GeometryAdapter::road_path`], or `path` itself when there is no road polyline.
    pub async fn road_path_or_fallback(&self, path: &[Coordinate]) -> Vec<Coordinate> {
        match self.road_path(path).await {
            Ok(road) if !road.is_empty() => road,
            Ok(_) => path.to_vec(),
            Err(Error::Disabled) => {
                debug!("Road routing disabled, using stop path");
                path.to_vec()
            }
            Err(err) => {
                warn!("Road geometry unavailable, using stop path: {err}");
                path.to_vec()
            }
        }
    }
}
