//! Geometry provider trait definition
//!
//! All perimeter geometry the engine needs (area, outward buffering, point distance)
//! goes through [`GeometryProvider`]. Buffering and distance work in degree space and
//! leave it through the same km-per-degree constant, so backends only differ in how
//! they measure area.

use crate::config::GeometryBackend;
use crate::core_types::{FirePerimeter, Kilometers, SquareKilometers};
use geo::{Buffer, Closest, ClosestPoint, Point};

/// Backend-agnostic perimeter geometry
pub trait GeometryProvider: Send + Sync {
    /// Which backend this is, for logging
    fn backend(&self) -> GeometryBackend;

    /// Conversion between degrees and kilometres
    fn km_per_degree(&self) -> f64;

    /// Area enclosed by the perimeter, always non-negative
    ///
    /// A missing or empty perimeter has zero area.
    fn area_km2(&self, perimeter: Option<&FirePerimeter>) -> SquareKilometers;

    /// Buffer the perimeter outward by `distance`
    ///
    /// Returns `None` for a missing perimeter and an unchanged copy for a zero distance.
    ///
    /// # Panics
    /// On a negative or non-finite distance. Buffering inward is a caller error.
    #[track_caller]
    fn expand(&self, perimeter: Option<&FirePerimeter>, distance: Kilometers) -> Option<FirePerimeter> {
        assert!(
            distance.is_finite() && *distance >= 0.0,
            "GeometryProvider::expand: distance must be finite and non-negative, got {distance}"
        );
        let perimeter = perimeter?;
        if *distance == 0.0 || perimeter.is_empty() {
            return Some(perimeter.clone());
        }
        let degrees = *distance / self.km_per_degree();
        Some(FirePerimeter::new(perimeter.shape().buffer(degrees)))
    }

    /// Shortest distance from `point` (lon/lat) to the perimeter
    ///
    /// Zero when the point lies inside the fire, infinite when either input is missing
    /// or the point has non-finite coordinates.
    fn distance_to_boundary(
        &self,
        perimeter: Option<&FirePerimeter>,
        point: Option<Point<f64>>,
    ) -> Kilometers {
        let (Some(perimeter), Some(point)) = (perimeter, point) else {
            return Kilometers::INFINITY;
        };
        if !(point.x().is_finite() && point.y().is_finite()) {
            return Kilometers::INFINITY;
        }
        match perimeter.shape().closest_point(&point) {
            Closest::Intersection(_) => Kilometers::ZERO,
            Closest::SinglePoint(nearest) => {
                let degrees = (nearest.x() - point.x()).hypot(nearest.y() - point.y());
                Kilometers::new(degrees * self.km_per_degree())
            }
            Closest::Indeterminate => Kilometers::INFINITY,
        }
    }
}
