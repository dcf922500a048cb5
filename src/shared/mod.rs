pub mod geo;
pub mod time;

pub use geo::*;
pub use time::*;

/// Shown wherever a value is missing from a feed.
pub const NOT_AVAILABLE: &str = "N/A";
