//! Named places worth protecting, and where they come from

use geo::Point;
use serde::{Deserialize, Serialize};

/// Event location in WGS84
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A named piece of infrastructure the fire may reach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl CriticalPoint {
    #[must_use]
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Position as a lon/lat point (x = lon, y = lat)
    #[must_use]
    pub fn point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Supplier of critical points when a request carries none
///
/// Implementations must be cheap to share across threads; batch analysis calls them
/// from the rayon pool.
pub trait CriticalPointSource: Send + Sync {
    /// Points relevant to an event at `location` (or anywhere, if unknown)
    fn critical_points_near(&self, location: Option<&Location>) -> Vec<CriticalPoint>;
}

/// Fixed list of points, returned regardless of location
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticCriticalPoints {
    points: Vec<CriticalPoint>,
}

impl StaticCriticalPoints {
    #[must_use]
    pub fn new(points: Vec<CriticalPoint>) -> Self {
        Self { points }
    }

    /// Built-in smoke-test list around Brampton, Ontario
    #[must_use]
    pub fn demo() -> Self {
        Self::new(vec![
            CriticalPoint::new("Residential Area A", 43.735, -79.860),
            CriticalPoint::new("Highway 410", 43.740, -79.855),
            CriticalPoint::new("Main Street Commercial", 43.745, -79.850),
        ])
    }

    #[must_use]
    pub fn points(&self) -> &[CriticalPoint] {
        &self.points
    }
}

impl CriticalPointSource for StaticCriticalPoints {
    fn critical_points_near(&self, _location: Option<&Location>) -> Vec<CriticalPoint> {
        self.points.clone()
    }
}
