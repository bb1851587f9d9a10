//! Prediction configuration
//!
//! All tunable constants of the engine live in [`PredictionConfig`]. Every section is
//! `#[serde(default)]`, so a JSON config only needs to name the values it overrides:
//!
//! ```
//! use fire_predict_core::PredictionConfig;
//!
//! let config = PredictionConfig::from_json_str(r#"{"timeline": {"horizons_hours": [2, 4]}}"#).unwrap();
//! assert_eq!(config.timeline.horizons_hours, vec![2, 4]);
//! assert!((config.spread.base_rate_kmh - 2.0).abs() < f64::EPSILON);
//! ```

use crate::core_types::StaticCriticalPoints;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Errors raised while loading or validating a [`PredictionConfig`]
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read
    Io(std::io::Error),
    /// Config text is not valid JSON for this schema
    Parse(serde_json::Error),
    /// A value is outside its allowed range
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config: {e}"),
            Self::Parse(e) => write!(f, "failed to parse config: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid config value `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    pub spread: SpreadConfig,
    pub timeline: TimelineConfig,
    pub arrival: ArrivalConfig,
    pub geometry: GeometryConfig,
    /// Fallback list used when a request carries no critical points
    pub critical_points: StaticCriticalPoints,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            spread: SpreadConfig::default(),
            timeline: TimelineConfig::default(),
            arrival: ArrivalConfig::default(),
            geometry: GeometryConfig::default(),
            critical_points: StaticCriticalPoints::demo(),
        }
    }
}

impl PredictionConfig {
    /// Parse and validate a JSON config
    ///
    /// # Errors
    /// [`ConfigError::Parse`] for malformed JSON, [`ConfigError::Invalid`] for values
    /// that fail [`PredictionConfig::validate`].
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`PredictionConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check every value is usable by the engine
    ///
    /// # Errors
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.spread.validate()?;
        self.timeline.validate()?;
        self.arrival.validate()?;
        self.geometry.validate()
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive finite number, got {value}"),
        })
    }
}

/// Spread-rate model constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadConfig {
    /// Rate at neutral conditions (all factors 1.0), km/h
    pub base_rate_kmh: f64,
    /// Wind factor denominator, applied to wind speed in km/h
    pub wind_denominator_kmh: f64,
    /// Temperature at which the temperature factor is 1.0
    pub reference_temperature_c: f64,
    pub temperature_denominator: f64,
    /// Humidity factor at 0 % relative humidity
    pub humidity_base: f64,
    pub humidity_denominator: f64,
    pub wind_factor_floor: f64,
    pub temperature_factor_floor: f64,
    pub humidity_factor_floor: f64,
    pub default_wind_speed_ms: f64,
    pub default_wind_direction_deg: f64,
    pub default_temperature_c: f64,
    pub default_humidity_percent: f64,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            base_rate_kmh: 2.0,
            wind_denominator_kmh: 50.0,
            reference_temperature_c: 20.0,
            temperature_denominator: 40.0,
            humidity_base: 1.5,
            humidity_denominator: 100.0,
            wind_factor_floor: 0.5,
            temperature_factor_floor: 0.5,
            humidity_factor_floor: 0.1,
            default_wind_speed_ms: 10.0,
            default_wind_direction_deg: 0.0,
            default_temperature_c: 20.0,
            default_humidity_percent: 50.0,
        }
    }
}

impl SpreadConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("spread.base_rate_kmh", self.base_rate_kmh)?;
        require_positive("spread.wind_denominator_kmh", self.wind_denominator_kmh)?;
        require_positive("spread.temperature_denominator", self.temperature_denominator)?;
        require_positive("spread.humidity_denominator", self.humidity_denominator)?;
        require_positive("spread.wind_factor_floor", self.wind_factor_floor)?;
        require_positive("spread.temperature_factor_floor", self.temperature_factor_floor)?;
        require_positive("spread.humidity_factor_floor", self.humidity_factor_floor)?;

        if !(self.default_wind_speed_ms.is_finite() && self.default_wind_speed_ms >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "spread.default_wind_speed_ms",
                reason: "must be finite and >= 0".to_string(),
            });
        }
        if !(0.0..360.0).contains(&self.default_wind_direction_deg) {
            return Err(ConfigError::Invalid {
                field: "spread.default_wind_direction_deg",
                reason: "must be in [0, 360)".to_string(),
            });
        }
        if !crate::core_types::Celsius::is_valid(self.default_temperature_c) {
            return Err(ConfigError::Invalid {
                field: "spread.default_temperature_c",
                reason: "must be finite and above absolute zero".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.default_humidity_percent) {
            return Err(ConfigError::Invalid {
                field: "spread.default_humidity_percent",
                reason: "must be in [0, 100]".to_string(),
            });
        }
        Ok(())
    }
}

/// Forecast horizons and confidence decay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Strictly increasing horizons in whole hours
    pub horizons_hours: Vec<u32>,
    pub base_confidence: f64,
    /// Confidence lost per forecast hour
    pub confidence_decay_per_hour: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            horizons_hours: vec![1, 3, 6],
            base_confidence: 0.75,
            confidence_decay_per_hour: 0.05,
        }
    }
}

impl TimelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.horizons_hours.is_empty() {
            return Err(ConfigError::Invalid {
                field: "timeline.horizons_hours",
                reason: "at least one horizon is required".to_string(),
            });
        }
        if self.horizons_hours.first() == Some(&0)
            || self.horizons_hours.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(ConfigError::Invalid {
                field: "timeline.horizons_hours",
                reason: format!(
                    "horizons must be positive and strictly increasing, got {:?}",
                    self.horizons_hours
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.base_confidence) {
            return Err(ConfigError::Invalid {
                field: "timeline.base_confidence",
                reason: "must be in [0, 1]".to_string(),
            });
        }
        require_positive("timeline.confidence_decay_per_hour", self.confidence_decay_per_hour)
    }
}

/// Arrival-time estimator constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalConfig {
    /// Arrivals sooner than this are tagged `high`
    pub high_confidence_threshold_hours: f64,
    /// Directional factor straight downwind
    pub downwind_factor: f64,
    /// Directional factor straight upwind
    pub upwind_factor: f64,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold_hours: 6.0,
            downwind_factor: 1.5,
            upwind_factor: 0.5,
        }
    }
}

impl ArrivalConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive(
            "arrival.high_confidence_threshold_hours",
            self.high_confidence_threshold_hours,
        )?;
        require_positive("arrival.upwind_factor", self.upwind_factor)?;
        require_positive("arrival.downwind_factor", self.downwind_factor)?;
        if self.upwind_factor > self.downwind_factor {
            return Err(ConfigError::Invalid {
                field: "arrival.upwind_factor",
                reason: "must not exceed arrival.downwind_factor".to_string(),
            });
        }
        Ok(())
    }
}

/// Which geometry backend computes areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryBackend {
    /// Areas on the WGS84 ellipsoid
    #[default]
    Geodesic,
    /// Planar degree² areas scaled by `km_per_degree²`
    Planar,
}

impl fmt::Display for GeometryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geodesic => write!(f, "geodesic"),
            Self::Planar => write!(f, "planar"),
        }
    }
}

/// Geometry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub backend: GeometryBackend,
    /// Degree-to-kilometre conversion used for buffers and distances
    pub km_per_degree: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            backend: GeometryBackend::Geodesic,
            km_per_degree: 111.1,
        }
    }
}

impl GeometryConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("geometry.km_per_degree", self.km_per_degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PredictionConfig::default().validate().is_ok());
        assert_eq!(PredictionConfig::default().critical_points.points().len(), 3);
    }

    #[test]
    fn test_partial_override() {
        let config = PredictionConfig::from_json_str(
            r#"{"geometry": {"backend": "planar"}, "critical_points": []}"#,
        )
        .unwrap();
        assert_eq!(config.geometry.backend, GeometryBackend::Planar);
        assert!((config.geometry.km_per_degree - 111.1).abs() < 1e-12);
        assert!(config.critical_points.points().is_empty());
        assert_eq!(config.timeline, TimelineConfig::default());
    }

    #[test]
    fn test_rejects_unordered_horizons() {
        let err = PredictionConfig::from_json_str(r#"{"timeline": {"horizons_hours": [3, 1]}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "timeline.horizons_hours",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_denominator() {
        let err =
            PredictionConfig::from_json_str(r#"{"spread": {"wind_denominator_kmh": 0}}"#).unwrap_err();
        assert!(err.to_string().contains("spread.wind_denominator_kmh"));
    }

    #[test]
    fn test_parse_error_has_source() {
        use std::error::Error;
        let err = PredictionConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_missing_file() {
        let err = PredictionConfig::from_file("/nonexistent/fire-predict.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
