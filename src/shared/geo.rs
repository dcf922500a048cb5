use std::{cmp, fmt::Display};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Distance {
    pub const fn from_meters(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parses a pair of decimal-degree strings as found in stop tables.
    /// Returns None if either side is missing, not a number or out of range.
    pub fn parse(latitude: Option<&str>, longitude: Option<&str>) -> Option<Self> {
        let latitude: f64 = latitude?.trim().parse().ok()?;
        let longitude: f64 = longitude?.trim().parse().ok()?;
        let coordinate = Self::new(latitude, longitude);
        coordinate.is_valid().then_some(coordinate)
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance (haversine).
    pub fn distance(&self, coord: &Self) -> Distance {
        const R: f64 = 6371.0;
        let dist_lat = f64::to_radians(coord.latitude - self.latitude);
        let dist_lon = f64::to_radians(coord.longitude - self.longitude);
        let a = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(self.latitude))
                * f64::cos(f64::to_radians(coord.latitude))
                * f64::sin(dist_lon / 2.0)
                * f64::sin(dist_lon / 2.0);
        let c = 2.0 * f64::atan2(f64::sqrt(a), f64::sqrt(1.0 - a));
        Distance::from_kilometers(R * c)
    }
}

/// Index of the point in `path` closest to `target`.
/// Ties resolve to the earliest point. None for an empty path.
pub fn closest_index(path: &[Coordinate], target: &Coordinate) -> Option<usize> {
    path.iter()
        .enumerate()
        .map(|(i, coordinate)| (i, coordinate.distance(target)))
        .fold(None, |best: Option<(usize, Distance)>, (i, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((i, distance)),
        })
        .map(|(i, _)| i)
}

#[test]
fn distance_test() {
    let coord_a = Coordinate {
        latitude: 48.85800943005911,
        longitude: 2.3514350059357927,
    };

    let coord_b = Coordinate {
        latitude: 51.5052389927712,
        longitude: -0.12495407345099824,
    };
    let d = coord_a.distance(&coord_b);
    assert!((d.as_kilometers() - 343.0).abs() < 5.0);
}

#[test]
fn distance_eq_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(1.0);
    assert_eq!(dist_a, dist_b)
}

#[test]
fn distance_cmp_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(0.5);
    assert!(dist_a > dist_b)
}

#[test]
fn parse_coordinate_test() {
    assert_eq!(
        Coordinate::parse(Some("48.7"), Some(" 11.4 ")),
        Some(Coordinate::new(48.7, 11.4))
    );
    assert_eq!(Coordinate::parse(Some("48.7"), None), None);
    assert_eq!(Coordinate::parse(Some("north"), Some("11.4")), None);
    assert_eq!(Coordinate::parse(Some("148.7"), Some("11.4")), None);
}

#[test]
fn closest_index_test() {
    let path = [
        Coordinate::new(48.70, 11.40),
        Coordinate::new(48.71, 11.41),
        Coordinate::new(48.72, 11.42),
    ];
    let target = Coordinate::new(48.711, 11.409);
    assert_eq!(closest_index(&path, &target), Some(1));
    assert_eq!(closest_index(&[], &target), None);
}
