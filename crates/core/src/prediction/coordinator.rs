//! Public entry point: sequences spread rate → timeline → arrivals
//!
//! The coordinator is stateless between calls. It owns the configured stages, a
//! geometry backend and a fallback [`CriticalPointSource`], all shared immutably, so one
//! instance can serve concurrent requests (see [`PredictionCoordinator::analyze_batch`]).

use super::arrival::{ArrivalEstimate, ArrivalEstimator};
use super::timeline::{Forecast, TimelineProjector};
use crate::config::{ConfigError, PredictionConfig};
use crate::core_types::{
    CriticalPoint, CriticalPointSource, FirePerimeter, KilometersPerHour, Location,
    SpreadFactors, WeatherObservation,
};
use crate::geometry::{create_geometry_provider, GeometryProvider, GeodesicGeometry};
use crate::physics::SpreadRateModel;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Kind of emergency being analysed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisasterType {
    Wildfire,
    /// Anything without a spread model yet, kept verbatim
    Other(String),
}

impl DisasterType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wildfire => "wildfire",
            Self::Other(name) => name,
        }
    }
}

impl Default for DisasterType {
    fn default() -> Self {
        Self::Other("unknown".to_string())
    }
}

impl From<&str> for DisasterType {
    fn from(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("wildfire") {
            Self::Wildfire
        } else {
            Self::Other(name.to_string())
        }
    }
}

impl From<String> for DisasterType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<DisasterType> for String {
    fn from(kind: DisasterType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for DisasterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analysis request as received over JSON
///
/// ```
/// use fire_predict_core::AnalysisRequest;
///
/// let request: AnalysisRequest = serde_json::from_str(r#"{
///     "type": "wildfire",
///     "location": {"lat": 43.7, "lon": -79.8},
///     "weather": {"wind": {"speed": 5, "deg": 90}}
/// }"#).unwrap();
/// assert_eq!(request.weather.wind_speed_ms, Some(5.0));
/// assert!(request.fire_perimeter.is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisRequest {
    #[serde(rename = "type", default)]
    pub disaster_type: DisasterType,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub weather: WeatherObservation,
    /// Raw GeoJSON; parsed leniently so a bad perimeter degrades instead of failing
    #[serde(default)]
    pub fire_perimeter: Option<serde_json::Value>,
    #[serde(default)]
    pub critical_points: Option<Vec<CriticalPoint>>,
}

impl AnalysisRequest {
    /// Parse the perimeter, logging and dropping it if it is unusable
    #[must_use]
    pub fn perimeter(&self) -> Option<FirePerimeter> {
        let value = self.fire_perimeter.as_ref()?;
        if value.is_null() || value.as_object().is_some_and(serde_json::Map::is_empty) {
            return None;
        }
        match FirePerimeter::from_geojson_value(value) {
            Ok(perimeter) => {
                debug!("Fire perimeter loaded: {} part(s)", perimeter.part_count());
                Some(perimeter)
            }
            Err(e) => {
                warn!("Failed to parse fire perimeter geometry: {e}");
                None
            }
        }
    }
}

/// Composite wildfire result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FireSpreadAnalysis {
    /// Rounded to 2 decimals
    pub current_spread_rate_kmh: KilometersPerHour,
    pub predictions: Forecast,
    pub critical_arrival_times: Vec<ArrivalEstimate>,
    pub factors: SpreadFactors,
}

/// Stable placeholder for disaster types without a spread model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotImplemented {
    pub status: &'static str,
    pub message: String,
    pub disaster_type: String,
}

impl NotImplemented {
    fn for_type(kind: &str) -> Self {
        let label = match kind.trim() {
            "" => "unknown",
            trimmed => trimmed,
        };
        let mut chars = label.chars();
        let title: String = chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        Self {
            status: "not_implemented",
            message: format!("{title} spread modeling will be added in future iterations"),
            disaster_type: kind.to_string(),
        }
    }
}

/// Result of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictionOutcome {
    Wildfire(FireSpreadAnalysis),
    NotImplemented(NotImplemented),
}

impl PredictionOutcome {
    #[must_use]
    pub fn as_wildfire(&self) -> Option<&FireSpreadAnalysis> {
        match self {
            Self::Wildfire(analysis) => Some(analysis),
            Self::NotImplemented(_) => None,
        }
    }
}

/// Runs the prediction pipeline
pub struct PredictionCoordinator {
    spread: SpreadRateModel,
    timeline: TimelineProjector,
    arrival: ArrivalEstimator,
    geometry: Box<dyn GeometryProvider>,
    critical_points: Box<dyn CriticalPointSource>,
}

impl PredictionCoordinator {
    /// Build every stage from a validated config
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn new(config: &PredictionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            spread: SpreadRateModel::new(config.spread.clone()),
            timeline: TimelineProjector::new(config.timeline.clone()),
            arrival: ArrivalEstimator::new(config.arrival.clone()),
            geometry: create_geometry_provider(&config.geometry),
            critical_points: Box::new(config.critical_points.clone()),
        })
    }

    /// Replace the fallback source of critical points
    #[must_use]
    pub fn with_critical_point_source(mut self, source: Box<dyn CriticalPointSource>) -> Self {
        self.critical_points = source;
        self
    }

    /// Replace the geometry backend
    #[must_use]
    pub fn with_geometry(mut self, geometry: Box<dyn GeometryProvider>) -> Self {
        self.geometry = geometry;
        self
    }

    #[must_use]
    pub fn geometry(&self) -> &dyn GeometryProvider {
        self.geometry.as_ref()
    }

    /// Analyse one event
    ///
    /// Wildfires run spread rate → timeline → arrivals. Any other type returns the
    /// [`NotImplemented`] placeholder. `critical_points` overrides the fallback source
    /// when given, even if empty.
    #[must_use]
    pub fn analyze(
        &self,
        disaster_type: &DisasterType,
        location: Option<&Location>,
        weather: &WeatherObservation,
        perimeter: Option<&FirePerimeter>,
        critical_points: Option<&[CriticalPoint]>,
    ) -> PredictionOutcome {
        match location {
            Some(l) => info!("Analyzing {} at ({}, {})", disaster_type, l.lat, l.lon),
            None => info!("Analyzing {} at unknown location", disaster_type),
        }

        if *disaster_type != DisasterType::Wildfire {
            warn!("{} modeling requested but not implemented", disaster_type);
            return PredictionOutcome::NotImplemented(NotImplemented::for_type(
                disaster_type.as_str(),
            ));
        }

        let perimeter = perimeter.filter(|p| !p.is_empty());
        if perimeter.is_none() {
            info!("No fire perimeter provided, predictions will carry no boundary");
        }

        let (rate, factors) = self.spread.compute(weather);
        let predictions = self.timeline.project(self.geometry(), perimeter, rate);

        let fallback;
        let points: &[CriticalPoint] = if let Some(points) = critical_points {
            points
        } else {
            fallback = self.critical_points.critical_points_near(location);
            debug!("Using {} fallback critical points", fallback.len());
            &fallback
        };

        let critical_arrival_times = self.arrival.estimate(
            self.geometry(),
            perimeter,
            points,
            rate,
            factors.wind_direction_deg,
        );

        info!("Fire spread modeling complete: {} spread rate", rate);
        PredictionOutcome::Wildfire(FireSpreadAnalysis {
            current_spread_rate_kmh: rate.rounded(2),
            predictions,
            critical_arrival_times,
            factors,
        })
    }

    /// Analyse a deserialized request
    #[must_use]
    pub fn analyze_request(&self, request: &AnalysisRequest) -> PredictionOutcome {
        let perimeter = if request.disaster_type == DisasterType::Wildfire {
            request.perimeter()
        } else {
            None
        };
        self.analyze(
            &request.disaster_type,
            request.location.as_ref(),
            &request.weather,
            perimeter.as_ref(),
            request.critical_points.as_deref(),
        )
    }

    /// Analyse independent requests in parallel, preserving input order
    #[must_use]
    pub fn analyze_batch(&self, requests: &[AnalysisRequest]) -> Vec<PredictionOutcome> {
        info!("Analyzing batch of {} requests", requests.len());
        requests
            .par_iter()
            .map(|request| self.analyze_request(request))
            .collect()
    }
}

impl Default for PredictionCoordinator {
    fn default() -> Self {
        let config = PredictionConfig::default();
        Self {
            spread: SpreadRateModel::new(config.spread),
            timeline: TimelineProjector::new(config.timeline),
            arrival: ArrivalEstimator::new(config.arrival),
            geometry: Box::new(GeodesicGeometry::new(config.geometry.km_per_degree)),
            critical_points: Box::new(config.critical_points),
        }
    }
}

impl fmt::Debug for PredictionCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionCoordinator")
            .field("spread", &self.spread)
            .field("timeline", &self.timeline)
            .field("arrival", &self.arrival)
            .field("geometry", &self.geometry.backend())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeometryBackend;
    use crate::core_types::StaticCriticalPoints;
    use serde_json::json;

    fn request(value: serde_json::Value) -> AnalysisRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_disaster_type_parsing() {
        assert_eq!(DisasterType::from("wildfire"), DisasterType::Wildfire);
        assert_eq!(DisasterType::from(" Wildfire "), DisasterType::Wildfire);
        assert_eq!(
            DisasterType::from("flood"),
            DisasterType::Other("flood".to_string())
        );
        assert_eq!(AnalysisRequest::default().disaster_type.as_str(), "unknown");
    }

    #[test]
    fn test_flood_placeholder_is_verbatim() {
        let outcome = PredictionCoordinator::default().analyze_request(&request(json!({"type": "flood"})));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            json!({
                "status": "not_implemented",
                "message": "Flood spread modeling will be added in future iterations",
                "disaster_type": "flood"
            })
        );
    }

    #[test]
    fn test_unparseable_perimeter_degrades() {
        let req = request(json!({
            "type": "wildfire",
            "weather": {},
            "fire_perimeter": {"type": "Point", "coordinates": [0, 0]}
        }));
        assert!(req.perimeter().is_none());
        let outcome = PredictionCoordinator::default().analyze_request(&req);
        let analysis = outcome.as_wildfire().unwrap();
        assert!(analysis.critical_arrival_times.is_empty());
        assert_eq!(*analysis.current_spread_rate_kmh, 3.44);
    }

    #[test]
    fn test_empty_shape_treated_as_missing() {
        let empty = FirePerimeter::new(geo::MultiPolygon::new(Vec::new()));
        let points = vec![CriticalPoint::new("Depot", 43.72, -79.795)];
        let outcome = PredictionCoordinator::default().analyze(
            &DisasterType::Wildfire,
            None,
            &WeatherObservation::empty(),
            Some(&empty),
            Some(&points),
        );
        let analysis = outcome.as_wildfire().unwrap();
        assert!(analysis.predictions.horizons().all(|(_, p)| p.boundary.is_none()));
        assert!(analysis.critical_arrival_times.is_empty());
    }

    #[test]
    fn test_empty_perimeter_object_is_absent() {
        let req = request(json!({"type": "wildfire", "fire_perimeter": {}}));
        assert!(req.perimeter().is_none());
    }

    #[test]
    fn test_request_points_override_fallback() {
        let coordinator = PredictionCoordinator::default()
            .with_critical_point_source(Box::new(StaticCriticalPoints::new(Vec::new())));
        let req = request(json!({
            "type": "wildfire",
            "weather": {"wind": {"speed": 5, "deg": 90}},
            "fire_perimeter": {
                "type": "Polygon",
                "coordinates": [[[-79.8, 43.7], [-79.79, 43.7], [-79.79, 43.71], [-79.8, 43.71], [-79.8, 43.7]]]
            },
            "critical_points": [{"name": "School", "lat": 43.72, "lon": -79.795}]
        }));
        let outcome = coordinator.analyze_request(&req);
        let arrivals = &outcome.as_wildfire().unwrap().critical_arrival_times;
        assert_eq!(arrivals.len(), 1);
        assert_eq!(arrivals[0].location, "School");

        let without_points = AnalysisRequest {
            critical_points: None,
            ..req
        };
        let outcome = coordinator.analyze_request(&without_points);
        assert!(outcome.as_wildfire().unwrap().critical_arrival_times.is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = PredictionConfig::default();
        config.geometry.km_per_degree = 0.0;
        assert!(PredictionCoordinator::new(&config).is_err());

        config.geometry.km_per_degree = 111.1;
        config.geometry.backend = GeometryBackend::Planar;
        let coordinator = PredictionCoordinator::new(&config).unwrap();
        assert_eq!(coordinator.geometry().backend(), GeometryBackend::Planar);
    }

    #[test]
    fn test_batch_preserves_order() {
        let requests = vec![
            request(json!({"type": "flood"})),
            request(json!({"type": "wildfire", "weather": {}})),
            request(json!({"type": "earthquake"})),
        ];
        let outcomes = PredictionCoordinator::default().analyze_batch(&requests);
        assert!(matches!(outcomes[0], PredictionOutcome::NotImplemented(ref p) if p.disaster_type == "flood"));
        assert!(outcomes[1].as_wildfire().is_some());
        assert!(matches!(outcomes[2], PredictionOutcome::NotImplemented(ref p) if p.disaster_type == "earthquake"));
    }
}
