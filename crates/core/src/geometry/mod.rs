//! Perimeter geometry module
//!
//! Area, buffering and distance queries over WGS84 fire perimeters. The core
//! abstraction is the [`GeometryProvider`] trait with two backends:
//!
//! - [`GeodesicGeometry`] (default): areas on the WGS84 ellipsoid
//! - [`PlanarGeometry`]: degree² areas scaled by the km-per-degree constant
//!
//! # Example
//!
//! ```
//! use fire_predict_core::config::GeometryConfig;
//! use fire_predict_core::geometry::create_geometry_provider;
//!
//! let geometry = create_geometry_provider(&GeometryConfig::default());
//! assert_eq!(*geometry.area_km2(None), 0.0);
//! ```

mod geodesic;
mod planar;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

pub use geodesic::GeodesicGeometry;
pub use planar::PlanarGeometry;
pub use r#trait::GeometryProvider;

use crate::config::{GeometryBackend, GeometryConfig};
use tracing::info;

/// Create the geometry backend named in the config
pub fn create_geometry_provider(config: &GeometryConfig) -> Box<dyn GeometryProvider> {
    info!(
        "Using {} geometry backend ({} km/degree)",
        config.backend, config.km_per_degree
    );
    match config.backend {
        GeometryBackend::Geodesic => Box::new(GeodesicGeometry::new(config.km_per_degree)),
        GeometryBackend::Planar => Box::new(PlanarGeometry::new(config.km_per_degree)),
    }
}
