//! Wind-aware arrival times at critical points
//!
//! The fire is assumed to advance fastest downwind and slowest upwind. For a point at
//! bearing `θ` from the fire centre and a downwind bearing `ω` (wind direction + 180°):
//!
//! ```text
//! Δ      = 180 − | |θ − ω| − 180 |                 (0 … 180°)
//! factor = upwind + (cos Δ + 1) / 2 × (downwind − upwind)
//! t      = distance_to_boundary / (rate × factor)
//! ```
//!
//! With the default 0.5 / 1.5 bounds this is `0.5 + (cos Δ + 1) / 2`: 1.5 downwind,
//! 1.0 crosswind, 0.5 upwind.

use crate::config::ArrivalConfig;
use crate::core_types::{
    CriticalPoint, Degrees, FirePerimeter, Hours, Kilometers, KilometersPerHour, Radians,
};
use crate::geometry::GeometryProvider;
use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Coarse reliability bucket of an arrival estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
        }
    }
}

/// Predicted arrival of the fire front at one critical point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrivalEstimate {
    /// Critical point name
    pub location: String,
    /// Rounded to 1 decimal; infinite when the fire cannot reach the point
    pub hours_until_arrival: Hours,
    pub confidence: ConfidenceTier,
    #[serde(skip_serializing)]
    pub distance_km: Kilometers,
    #[serde(skip_serializing)]
    pub directional_factor: f64,
}

/// Computes and orders arrival estimates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrivalEstimator {
    config: ArrivalConfig,
}

impl ArrivalEstimator {
    #[must_use]
    pub fn new(config: ArrivalConfig) -> Self {
        Self { config }
    }

    /// Rate multiplier for a point at `target_bearing` given the wind's "from" direction
    #[must_use]
    pub fn directional_factor(&self, target_bearing: Degrees, wind_direction: Degrees) -> f64 {
        let downwind = (wind_direction - Degrees::new(180.0)).normalized();
        let diff = (*target_bearing.normalized() - *downwind).abs();
        let angle_diff = Degrees::new(180.0 - (diff - 180.0).abs());
        let alignment = (angle_diff.to_radians().cos() + 1.0) / 2.0;
        self.config.upwind_factor + alignment * (self.config.downwind_factor - self.config.upwind_factor)
    }

    /// Arrival estimates for `points`, most urgent first
    ///
    /// Returns an empty list when there is no perimeter or the spread rate is not
    /// positive. Points the fire cannot reach get infinite hours and sort last.
    pub fn estimate(
        &self,
        geometry: &dyn GeometryProvider,
        perimeter: Option<&FirePerimeter>,
        points: &[CriticalPoint],
        spread_rate: KilometersPerHour,
        wind_direction: Degrees,
    ) -> Vec<ArrivalEstimate> {
        let Some(perimeter) = perimeter else {
            warn!("No fire perimeter, skipping arrival estimates");
            return Vec::new();
        };
        if *spread_rate <= 0.0 {
            warn!("Spread rate {} is not positive, skipping arrival estimates", spread_rate);
            return Vec::new();
        }

        let centre = perimeter.centroid();
        if let Some(c) = centre {
            debug!("Fire centre: ({:.4}, {:.4})", c.x(), c.y());
        }

        let mut estimates = points
            .iter()
            .map(|point| {
                let target = point.point();
                let distance_km = geometry.distance_to_boundary(Some(perimeter), Some(target));
                let directional_factor = centre.map_or(1.0, |c| {
                    self.directional_factor(bearing(c, target), wind_direction)
                });
                let raw_hours = distance_km / (spread_rate * directional_factor);
                let confidence = if *raw_hours < self.config.high_confidence_threshold_hours {
                    ConfidenceTier::High
                } else {
                    ConfidenceTier::Medium
                };
                debug!(
                    "{}: {} ({}, factor {:.2})",
                    point.name, raw_hours, distance_km, directional_factor
                );
                ArrivalEstimate {
                    location: point.name.clone(),
                    hours_until_arrival: raw_hours.rounded(1),
                    confidence,
                    distance_km,
                    directional_factor,
                }
            })
            .collect::<Vec<_>>();

        // Stable, so ties keep input order
        estimates.sort_by_key(|e| e.hours_until_arrival);
        info!("Calculated {} arrival times", estimates.len());
        estimates
    }
}

/// Planar bearing from `from` to `to` in lon/lat degree space, measured
/// counter-clockwise from east
fn bearing(from: Point<f64>, to: Point<f64>) -> Degrees {
    Radians::new((to.y() - from.y()).atan2(to.x() - from.x())).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PlanarGeometry;
    use approx::assert_relative_eq;
    use geo::polygon;

    fn square() -> FirePerimeter {
        FirePerimeter::from_polygon(polygon![
            (x: -79.8, y: 43.7),
            (x: -79.79, y: 43.7),
            (x: -79.79, y: 43.71),
            (x: -79.8, y: 43.71),
        ])
    }

    fn geometry() -> PlanarGeometry {
        PlanarGeometry::new(111.1)
    }

    #[test]
    fn test_directional_factor_extremes() {
        let estimator = ArrivalEstimator::default();
        let wind = Degrees::new(90.0);
        // downwind bearing is 270
        assert_relative_eq!(estimator.directional_factor(Degrees::new(270.0), wind), 1.5, epsilon = 1e-12);
        assert_relative_eq!(estimator.directional_factor(Degrees::new(90.0), wind), 0.5, epsilon = 1e-12);
        assert_relative_eq!(estimator.directional_factor(Degrees::new(0.0), wind), 1.0, epsilon = 1e-12);
        assert_relative_eq!(estimator.directional_factor(Degrees::new(-90.0), wind), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_without_perimeter_or_rate() {
        let estimator = ArrivalEstimator::default();
        let points = vec![CriticalPoint::new("A", 43.72, -79.8)];
        assert!(estimator
            .estimate(&geometry(), None, &points, KilometersPerHour::new(2.0), Degrees::new(0.0))
            .is_empty());
        assert!(estimator
            .estimate(&geometry(), Some(&square()), &points, KilometersPerHour::new(0.0), Degrees::new(0.0))
            .is_empty());
    }

    #[test]
    fn test_sorted_and_tiered() {
        let points = vec![
            CriticalPoint::new("Far", 44.2, -79.795),
            CriticalPoint::new("Inside", 43.705, -79.795),
            CriticalPoint::new("Near", 43.72, -79.795),
        ];
        let estimates = ArrivalEstimator::default().estimate(
            &geometry(),
            Some(&square()),
            &points,
            KilometersPerHour::new(2.5),
            Degrees::new(90.0),
        );
        let names: Vec<&str> = estimates.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(names, vec!["Inside", "Near", "Far"]);
        assert_eq!(*estimates[0].hours_until_arrival, 0.0);
        assert_eq!(estimates[0].confidence, ConfidenceTier::High);
        // ~54 km due north, upwind at 2.5 km/h
        assert_eq!(estimates[2].confidence, ConfidenceTier::Medium);
        for e in &estimates {
            assert!((0.5..=1.5).contains(&e.directional_factor));
        }
    }

    #[test]
    fn test_downwind_bearing_arrives_sooner() {
        // Bearings are atan2 angles from east, so with wind from 90° the downwind
        // bearing of 270° points south.
        let points = vec![
            CriticalPoint::new("North", 43.73, -79.795),
            CriticalPoint::new("South", 43.68, -79.795),
        ];
        let estimates = ArrivalEstimator::default().estimate(
            &geometry(),
            Some(&square()),
            &points,
            KilometersPerHour::new(2.0),
            Degrees::new(90.0),
        );
        assert_eq!(estimates[0].location, "South");
        assert_relative_eq!(estimates[0].directional_factor, 1.5, epsilon = 1e-9);
        assert_relative_eq!(estimates[1].directional_factor, 0.5, epsilon = 1e-9);
        assert_relative_eq!(*estimates[0].distance_km, *estimates[1].distance_km, max_relative = 1e-9);
    }

    #[test]
    fn test_serialized_fields() {
        let points = vec![CriticalPoint::new("Depot", 43.72, -79.795)];
        let estimates = ArrivalEstimator::default().estimate(
            &geometry(),
            Some(&square()),
            &points,
            KilometersPerHour::new(2.0),
            Degrees::new(0.0),
        );
        let json = serde_json::to_value(&estimates).unwrap();
        let entry = json[0].as_object().unwrap();
        assert_eq!(entry.len(), 3);
        assert_eq!(entry["location"], "Depot");
        assert_eq!(entry["confidence"], "high");
    }
}
