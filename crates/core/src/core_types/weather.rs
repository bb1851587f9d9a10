//! Weather inputs for the spread model
//!
//! A [`WeatherObservation`] is the raw, untrusted reading handed over by the weather
//! client (OpenWeather-style `{"wind": {"speed", "deg"}, "main": {"temp", "humidity"}}`).
//! Every field is optional; the spread model decides what to do with missing or
//! out-of-range values. [`SpreadFactors`] is the validated, unit-converted snapshot the
//! model actually used.

use crate::core_types::units::{Celsius, Degrees, KilometersPerHour, Percent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One point-in-time weather reading, exactly as received
///
/// # Example
/// ```
/// use fire_predict_core::WeatherObservation;
/// use serde_json::json;
///
/// let weather = WeatherObservation::from_json(&json!({
///     "wind": {"speed": 5, "deg": 90},
///     "main": {"temp": 25, "humidity": "n/a"}
/// }));
/// assert_eq!(weather.wind_speed_ms, Some(5.0));
/// assert_eq!(weather.humidity_percent, None); // non-numeric is dropped
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct WeatherObservation {
    /// Wind speed in m/s (`wind.speed`)
    pub wind_speed_ms: Option<f64>,
    /// Meteorological wind direction, degrees the wind blows *from* (`wind.deg`)
    pub wind_direction_deg: Option<f64>,
    /// Air temperature in °C (`main.temp`)
    pub temperature_c: Option<f64>,
    /// Relative humidity in % (`main.humidity`)
    pub humidity_percent: Option<f64>,
}

impl WeatherObservation {
    /// Observation with every field missing
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set wind speed (m/s) and direction (degrees, "from" convention)
    #[must_use]
    pub fn with_wind(mut self, speed_ms: f64, direction_deg: f64) -> Self {
        self.wind_speed_ms = Some(speed_ms);
        self.wind_direction_deg = Some(direction_deg);
        self
    }

    /// Set temperature (°C) and relative humidity (%)
    #[must_use]
    pub fn with_main(mut self, temperature_c: f64, humidity_percent: f64) -> Self {
        self.temperature_c = Some(temperature_c);
        self.humidity_percent = Some(humidity_percent);
        self
    }

    /// Extract the numeric fields from an OpenWeather-style JSON document.
    ///
    /// Never fails: a non-object root or a non-numeric field is logged and treated as
    /// missing.
    #[must_use]
    pub fn from_json(root: &Value) -> Self {
        if !root.is_object() && !root.is_null() {
            warn!("Weather payload is not a JSON object, ignoring it: {root}");
            return Self::default();
        }

        Self {
            wind_speed_ms: numeric_field(root, "wind", "speed"),
            wind_direction_deg: numeric_field(root, "wind", "deg"),
            temperature_c: numeric_field(root, "main", "temp"),
            humidity_percent: numeric_field(root, "main", "humidity"),
        }
    }
}

impl From<Value> for WeatherObservation {
    fn from(value: Value) -> Self {
        Self::from_json(&value)
    }
}

fn numeric_field(root: &Value, section: &str, key: &str) -> Option<f64> {
    let raw = root.get(section)?.get(key)?;
    match raw.as_f64() {
        Some(v) => Some(v),
        None => {
            if !raw.is_null() {
                warn!("Non-numeric weather field {section}.{key}: {raw}, using default");
            }
            None
        }
    }
}

/// Normalized weather inputs actually used by the spread model
///
/// Reused verbatim by the directional arrival estimator and echoed back to callers
/// under `factors`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadFactors {
    /// Effective wind speed, `wind_speed_ms × 3.6`, rounded to 2 decimals
    pub wind_speed_kmh: KilometersPerHour,
    /// Effective wind direction in [0, 360)
    pub wind_direction_deg: Degrees,
    /// Effective temperature
    pub temperature_c: Celsius,
    /// Effective relative humidity in [0, 100]
    pub humidity_percent: Percent,
}

impl std::fmt::Display for SpreadFactors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "wind {} from {}, {}, RH {}",
            self.wind_speed_kmh, self.wind_direction_deg, self.temperature_c, self.humidity_percent
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_full() {
        let weather = WeatherObservation::from_json(&json!({
            "wind": {"speed": 10, "deg": 180},
            "main": {"temp": 30, "humidity": 20}
        }));
        assert_eq!(
            weather,
            WeatherObservation::empty()
                .with_wind(10.0, 180.0)
                .with_main(30.0, 20.0)
        );
    }

    #[test]
    fn test_from_json_empty_object() {
        assert_eq!(
            WeatherObservation::from_json(&json!({})),
            WeatherObservation::empty()
        );
    }

    #[test]
    fn test_from_json_non_numeric_and_non_object() {
        let weather = WeatherObservation::from_json(&json!({
            "wind": {"speed": "fast", "deg": null},
            "main": "hot"
        }));
        assert_eq!(weather, WeatherObservation::empty());

        assert_eq!(
            WeatherObservation::from_json(&json!("sunny")),
            WeatherObservation::empty()
        );
    }

    #[test]
    fn test_deserialize_goes_through_lenient_parser() {
        let weather: WeatherObservation =
            serde_json::from_str(r#"{"wind": {"speed": 2.5}, "main": {"humidity": true}}"#)
                .unwrap();
        assert_eq!(weather.wind_speed_ms, Some(2.5));
        assert_eq!(weather.wind_direction_deg, None);
        assert_eq!(weather.humidity_percent, None);
    }
}
