//! Ellipsoidal area backend

use super::GeometryProvider;
use crate::config::GeometryBackend;
use crate::core_types::{FirePerimeter, SquareKilometers};
use geo::GeodesicArea;

const SQUARE_METERS_PER_SQUARE_KM: f64 = 1.0e6;

/// Measures area on the WGS84 ellipsoid (Karney's algorithm via `geo`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicGeometry {
    km_per_degree: f64,
}

impl GeodesicGeometry {
    #[must_use]
    pub fn new(km_per_degree: f64) -> Self {
        Self { km_per_degree }
    }
}

impl GeometryProvider for GeodesicGeometry {
    fn backend(&self) -> GeometryBackend {
        GeometryBackend::Geodesic
    }

    fn km_per_degree(&self) -> f64 {
        self.km_per_degree
    }

    fn area_km2(&self, perimeter: Option<&FirePerimeter>) -> SquareKilometers {
        match perimeter {
            Some(p) if !p.is_empty() => SquareKilometers::new(
                p.shape().geodesic_area_unsigned() / SQUARE_METERS_PER_SQUARE_KM,
            ),
            _ => SquareKilometers::ZERO,
        }
    }
}
