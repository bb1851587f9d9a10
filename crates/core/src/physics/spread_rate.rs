//! Weather-driven spread rate
//!
//! A deliberately simple multiplicative model: a base rate scaled by independent wind,
//! temperature and humidity factors, each floor-clamped so no single input can stop
//! the fire outright.
//!
//! # Formula
//! ```text
//! wind_kmh     = wind_speed_ms × 3.6
//! wind_factor  = max(0.5, 1 + wind_kmh / 50)
//! temp_factor  = max(0.5, 1 + (T − 20) / 40)
//! hum_factor   = max(0.1, 1.5 − RH / 100)
//! R            = 2.0 × wind_factor × temp_factor × hum_factor      (km/h)
//! ```
//!
//! The wind denominator applies to km/h, not m/s.

use crate::config::SpreadConfig;
use crate::core_types::{
    Celsius, Degrees, KilometersPerHour, MetersPerSecond, Percent, SpreadFactors,
    WeatherObservation,
};
use tracing::{debug, info, warn};

/// Converts a weather observation into a spread rate plus the inputs it used
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpreadRateModel {
    config: SpreadConfig,
}

impl SpreadRateModel {
    #[must_use]
    pub fn new(config: SpreadConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SpreadConfig {
        &self.config
    }

    /// Spread rate (km/h) for `weather`, and the effective factors behind it
    ///
    /// Never fails. Missing fields fall back to the configured defaults; out-of-range
    /// or non-finite fields do too, with a warning. The returned factors hold the
    /// post-default, pre-clamp inputs.
    ///
    /// # Example
    /// ```
    /// use fire_predict_core::{SpreadRateModel, WeatherObservation};
    ///
    /// let (rate, factors) = SpreadRateModel::default().compute(&WeatherObservation::empty());
    /// assert!((*rate - 3.44).abs() < 1e-9);
    /// assert!((*factors.wind_speed_kmh - 36.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn compute(&self, weather: &WeatherObservation) -> (KilometersPerHour, SpreadFactors) {
        let cfg = &self.config;

        let wind_speed = MetersPerSecond::new(effective(
            "wind speed (m/s)",
            weather.wind_speed_ms,
            cfg.default_wind_speed_ms,
            |v| v >= 0.0,
        ));
        let wind_direction = Degrees::new(effective(
            "wind direction (deg)",
            weather.wind_direction_deg,
            cfg.default_wind_direction_deg,
            |v| (0.0..360.0).contains(&v),
        ));
        let temperature = Celsius::new(effective(
            "temperature (°C)",
            weather.temperature_c,
            cfg.default_temperature_c,
            Celsius::is_valid,
        ));
        let humidity = Percent::new(effective(
            "relative humidity (%)",
            weather.humidity_percent,
            cfg.default_humidity_percent,
            |v| (0.0..=100.0).contains(&v),
        ));

        let mut wind_kmh = wind_speed.to_kmh();
        let mut rate = self.rate(wind_kmh, temperature, humidity);
        if !(wind_kmh.is_finite() && rate.is_finite()) {
            warn!(
                "Wind speed {} gives a non-finite spread rate, using default {} m/s",
                wind_speed, cfg.default_wind_speed_ms
            );
            wind_kmh = MetersPerSecond::new(cfg.default_wind_speed_ms).to_kmh();
            rate = self.rate(wind_kmh, temperature, humidity);
        }

        let factors = SpreadFactors {
            wind_speed_kmh: wind_kmh.rounded(2),
            wind_direction_deg: wind_direction,
            temperature_c: temperature,
            humidity_percent: humidity,
        };
        info!("Spread rate {} ({})", rate, factors);

        (rate, factors)
    }

    fn rate(
        &self,
        wind_kmh: KilometersPerHour,
        temperature: Celsius,
        humidity: Percent,
    ) -> KilometersPerHour {
        let cfg = &self.config;
        let wind_factor = (1.0 + *wind_kmh / cfg.wind_denominator_kmh).max(cfg.wind_factor_floor);
        let temp_factor = (1.0
            + (*temperature - cfg.reference_temperature_c) / cfg.temperature_denominator)
            .max(cfg.temperature_factor_floor);
        let humidity_factor = (cfg.humidity_base - *humidity / cfg.humidity_denominator)
            .max(cfg.humidity_factor_floor);

        debug!(
            "Spread factors: wind {:.3}, temperature {:.3}, humidity {:.3}",
            wind_factor, temp_factor, humidity_factor
        );

        KilometersPerHour::new(cfg.base_rate_kmh) * (wind_factor * temp_factor * humidity_factor)
    }
}

/// Pick the observed value if usable, otherwise the default
fn effective(field: &str, observed: Option<f64>, default: f64, in_range: fn(f64) -> bool) -> f64 {
    match observed {
        Some(v) if v.is_finite() && in_range(v) => v,
        Some(v) => {
            warn!("Invalid {field} {v}, using default {default}");
            default
        }
        None => {
            debug!("Missing {field}, using default {default}");
            default
        }
    }
}
