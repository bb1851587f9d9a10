//! Flat-earth area backend

use super::GeometryProvider;
use crate::config::GeometryBackend;
use crate::core_types::{FirePerimeter, SquareKilometers};
use geo::Area;

/// Treats lon/lat degrees as a plane: `area_deg² × km_per_degree²`
///
/// Overestimates east-west extent away from the equator. Kept for comparison and for
/// callers that want areas consistent with the degree-space buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarGeometry {
    km_per_degree: f64,
}

impl PlanarGeometry {
    #[must_use]
    pub fn new(km_per_degree: f64) -> Self {
        Self { km_per_degree }
    }
}

impl GeometryProvider for PlanarGeometry {
    fn backend(&self) -> GeometryBackend {
        GeometryBackend::Planar
    }

    fn km_per_degree(&self) -> f64 {
        self.km_per_degree
    }

    fn area_km2(&self, perimeter: Option<&FirePerimeter>) -> SquareKilometers {
        perimeter.map_or(SquareKilometers::ZERO, |p| {
            SquareKilometers::new(p.shape().unsigned_area() * self.km_per_degree.powi(2))
        })
    }
}
