//! Multi-horizon perimeter projection
//!
//! For each horizon `h` the current perimeter is buffered outward by `rate × h` and
//! measured. Confidence decays linearly with the horizon:
//! `max(0, 0.75 − 0.05·h)` → 0.70 / 0.60 / 0.45 at 1 h / 3 h / 6 h.

use crate::config::TimelineConfig;
use crate::core_types::{
    round_to, FirePerimeter, Fraction, Hours, KilometersPerHour, SquareKilometers,
};
use crate::geometry::GeometryProvider;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

/// Projected fire state at one horizon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePrediction {
    /// Expanded perimeter, `null` when there was no perimeter to expand
    pub boundary: Option<FirePerimeter>,
    pub area_km2: SquareKilometers,
    pub confidence: Fraction,
}

/// Predictions keyed by horizon, in increasing horizon order
///
/// Serializes as a JSON object `{"hour_1": .., "hour_3": .., "hour_6": ..}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    entries: Vec<(u32, TimelinePrediction)>,
}

impl Forecast {
    /// Prediction for an exact horizon
    #[must_use]
    pub fn get(&self, hours: u32) -> Option<&TimelinePrediction> {
        self.entries
            .iter()
            .find(|(h, _)| *h == hours)
            .map(|(_, prediction)| prediction)
    }

    pub fn horizons(&self) -> impl Iterator<Item = (u32, &TimelinePrediction)> {
        self.entries.iter().map(|(h, p)| (*h, p))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Forecast {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (hours, prediction) in &self.entries {
            map.serialize_entry(&format!("hour_{hours}"), prediction)?;
        }
        map.end()
    }
}

/// Applies a spread rate across the configured horizons
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineProjector {
    config: TimelineConfig,
}

impl TimelineProjector {
    #[must_use]
    pub fn new(config: TimelineConfig) -> Self {
        Self { config }
    }

    /// Confidence at `hours` ahead, rounded to 2 decimals
    #[must_use]
    pub fn confidence_at(&self, hours: u32) -> Fraction {
        let raw = self.config.base_confidence
            - f64::from(hours) * self.config.confidence_decay_per_hour;
        Fraction::new(round_to(raw.max(0.0), 2).min(1.0))
    }

    /// Project `perimeter` forward at `spread_rate`
    ///
    /// A negative rate is logged and treated as zero. A missing perimeter, or a
    /// spread distance that overflows, yields `boundary: None` and zero area for that
    /// horizon; confidences are filled in regardless.
    pub fn project(
        &self,
        geometry: &dyn GeometryProvider,
        perimeter: Option<&FirePerimeter>,
        spread_rate: KilometersPerHour,
    ) -> Forecast {
        let rate = if *spread_rate < 0.0 {
            warn!("Negative spread rate {}, projecting with zero growth", spread_rate);
            KilometersPerHour::new(0.0)
        } else {
            spread_rate
        };

        if perimeter.is_none() {
            debug!("No fire perimeter, forecast will carry confidence only");
        }

        let entries = self
            .config
            .horizons_hours
            .iter()
            .map(|&h| {
                let distance = rate * Hours::from(h);
                let boundary = if distance.is_finite() {
                    geometry.expand(perimeter, distance)
                } else {
                    warn!("Hour {}: spread distance {} is not finite, skipping expansion", h, distance);
                    None
                };
                let area_km2 = geometry.area_km2(boundary.as_ref());
                let confidence = self.confidence_at(h);
                debug!(
                    "Hour {}: +{} → {}, confidence {}",
                    h, distance, area_km2, confidence
                );
                (
                    h,
                    TimelinePrediction {
                        boundary,
                        area_km2,
                        confidence,
                    },
                )
            })
            .collect::<Vec<_>>();

        info!("Generated {} horizon predictions", entries.len());
        Forecast { entries }
    }
}
