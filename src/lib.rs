//! Lookup and animation core of a transit map viewer.
//!
//! Static GTFS tables are indexed into an immutable [`repository::Repository`]
//! snapshot, trips are resolved into drawable paths (road geometry when a
//! directions service answers), and a vehicle marker is animated along the
//! selected path. A [`session::Session`] ties these together for one map view.

pub mod animator;
pub mod geometry;
pub mod gtfs;
pub mod repository;
pub mod session;
pub mod shared;
pub mod siri;

pub mod prelude {
    pub use crate::animator::{Animation, AnimationState, Frame, VehicleAnimator};
    pub use crate::geometry::{GeometryAdapter, OpenRouteService, OrsConfig, RouteProvider};
    pub use crate::gtfs::{Config, DataSource, Source};
    pub use crate::repository::{RankedDeparture, Repository, Stop, StopTime, Trip, TripStop};
    pub use crate::session::{Selection, Session, Settings};
    pub use crate::shared::{Coordinate, Distance, Time};
    pub use crate::siri::{VehicleActivity, VehiclePopup};
}
