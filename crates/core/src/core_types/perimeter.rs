//! Fire perimeter geometry
//!
//! The current fire boundary arrives as GeoJSON in WGS84 lon/lat and is held as a
//! `geo::MultiPolygon<f64>` so single- and multi-part fires flow through the same
//! geometry code. Projected perimeters serialize back to GeoJSON geometry.

use geo::{Centroid, Coord, LineString, MultiPolygon, Point, Polygon};
use geojson::{GeoJson, Geometry, Value as GeoValue};
use serde::{Serialize, Serializer};
use std::fmt;

/// Minimum number of positions in a ring before it is closed
const MIN_RING_POSITIONS: usize = 3;

/// Reasons a GeoJSON document could not be turned into a [`FirePerimeter`]
#[derive(Debug)]
pub enum PerimeterError {
    /// Not valid JSON / not a GeoJSON object
    Decode(serde_json::Error),
    /// A Feature without geometry
    MissingGeometry,
    /// A FeatureCollection that does not hold exactly one feature
    FeatureCount(usize),
    /// Geometry type other than Polygon or `MultiPolygon`
    UnsupportedGeometry,
    /// A `MultiPolygon` with no parts
    EmptyGeometry,
    /// A position with fewer than two coordinates, or non-finite coordinates
    MalformedPosition { ring: usize, index: usize },
    /// A ring with too few positions to enclose an area
    DegenerateRing { ring: usize, positions: usize },
}

impl fmt::Display for PerimeterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "invalid GeoJSON: {e}"),
            Self::MissingGeometry => write!(f, "feature has no geometry"),
            Self::FeatureCount(n) => {
                write!(f, "expected exactly one feature in collection, found {n}")
            }
            Self::UnsupportedGeometry => write!(f, "expected a Polygon or MultiPolygon geometry"),
            Self::EmptyGeometry => write!(f, "geometry has no polygons"),
            Self::MalformedPosition { ring, index } => {
                write!(f, "malformed position {index} in ring {ring}")
            }
            Self::DegenerateRing { ring, positions } => write!(
                f,
                "ring {ring} has {positions} positions, at least {MIN_RING_POSITIONS} required"
            ),
        }
    }
}

impl std::error::Error for PerimeterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PerimeterError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e)
    }
}

/// Current or projected fire boundary in WGS84 lon/lat
#[derive(Debug, Clone, PartialEq)]
pub struct FirePerimeter {
    shape: MultiPolygon<f64>,
}

impl FirePerimeter {
    /// Wrap an existing multipolygon
    #[must_use]
    pub fn new(shape: MultiPolygon<f64>) -> Self {
        Self { shape }
    }

    /// Single-part perimeter
    #[must_use]
    pub fn from_polygon(polygon: Polygon<f64>) -> Self {
        Self::new(MultiPolygon::new(vec![polygon]))
    }

    /// Underlying geometry
    #[must_use]
    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// Number of polygon parts
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.shape.0.len()
    }

    /// True when there is no ring with any coordinates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shape.0.iter().all(|p| p.exterior().0.is_empty())
    }

    /// Area-weighted centre of the fire, `None` for an empty perimeter
    #[must_use]
    pub fn centroid(&self) -> Option<Point<f64>> {
        self.shape.centroid()
    }

    /// Parse a GeoJSON `Polygon`, `MultiPolygon`, a `Feature` carrying one of those, or
    /// a `FeatureCollection` holding exactly one such feature.
    ///
    /// # Errors
    /// Returns a [`PerimeterError`] describing the first problem found.
    pub fn from_geojson_value(value: &serde_json::Value) -> Result<Self, PerimeterError> {
        let document: GeoJson = serde_json::from_value(value.clone())?;
        let geometry = match document {
            GeoJson::Geometry(geometry) => geometry,
            GeoJson::Feature(feature) => feature.geometry.ok_or(PerimeterError::MissingGeometry)?,
            GeoJson::FeatureCollection(collection) => {
                let count = collection.features.len();
                let mut features = collection.features.into_iter();
                match (features.next(), features.next()) {
                    (Some(feature), None) => {
                        feature.geometry.ok_or(PerimeterError::MissingGeometry)?
                    }
                    _ => return Err(PerimeterError::FeatureCount(count)),
                }
            }
        };
        Self::from_geometry(&geometry)
    }

    /// Parse GeoJSON text, see [`FirePerimeter::from_geojson_value`].
    ///
    /// # Errors
    /// Returns a [`PerimeterError`] if the text is not JSON or not a supported geometry.
    pub fn from_geojson_str(text: &str) -> Result<Self, PerimeterError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_geojson_value(&value)
    }

    fn from_geometry(geometry: &Geometry) -> Result<Self, PerimeterError> {
        match &geometry.value {
            GeoValue::Polygon(rings) => Ok(Self::from_polygon(polygon_from_rings(rings)?)),
            GeoValue::MultiPolygon(parts) if parts.is_empty() => Err(PerimeterError::EmptyGeometry),
            GeoValue::MultiPolygon(parts) => {
                let polygons = parts
                    .iter()
                    .map(|rings| polygon_from_rings(rings))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::new(MultiPolygon::new(polygons)))
            }
            _ => Err(PerimeterError::UnsupportedGeometry),
        }
    }

    /// GeoJSON geometry: `Polygon` for a single part, `MultiPolygon` otherwise
    #[must_use]
    pub fn to_geojson(&self) -> Geometry {
        let value = match self.shape.0.as_slice() {
            [single] => GeoValue::Polygon(polygon_positions(single)),
            parts => GeoValue::MultiPolygon(parts.iter().map(polygon_positions).collect()),
        };
        Geometry::new(value)
    }
}

impl From<Polygon<f64>> for FirePerimeter {
    fn from(polygon: Polygon<f64>) -> Self {
        Self::from_polygon(polygon)
    }
}

impl Serialize for FirePerimeter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_geojson().serialize(serializer)
    }
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>, PerimeterError> {
    let mut parsed = rings
        .iter()
        .enumerate()
        .map(|(ring_idx, ring)| ring_from_positions(ring_idx, ring));

    let exterior = parsed.next().ok_or(PerimeterError::DegenerateRing {
        ring: 0,
        positions: 0,
    })??;
    let interiors = parsed.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn ring_from_positions(ring_idx: usize, ring: &[Vec<f64>]) -> Result<LineString<f64>, PerimeterError> {
    let coords = ring
        .iter()
        .enumerate()
        .map(|(index, position)| match position.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
            _ => Err(PerimeterError::MalformedPosition {
                ring: ring_idx,
                index,
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    // A closed ring repeats its first position; count distinct corners only
    let corners = if coords.len() > 1 && coords.first() == coords.last() {
        coords.len() - 1
    } else {
        coords.len()
    };
    if corners < MIN_RING_POSITIONS {
        return Err(PerimeterError::DegenerateRing {
            ring: ring_idx,
            positions: coords.len(),
        });
    }
    Ok(LineString::new(coords))
}

fn ring_positions(ring: &LineString<f64>) -> Vec<Vec<f64>> {
    ring.coords().map(|c| vec![c.x, c.y]).collect()
}

fn polygon_positions(polygon: &Polygon<f64>) -> Vec<Vec<Vec<f64>>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_positions)
        .collect()
}
