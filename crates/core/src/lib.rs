//! Fire-Spread Prediction Core Library
//!
//! Turns a weather snapshot and a current fire perimeter into:
//! - a spread-rate estimate (km/h) from wind, temperature and humidity
//! - projected perimeters, areas and confidences at fixed horizons (1 h / 3 h / 6 h)
//! - wind-aware arrival times at named critical points, most urgent first
//!
//! The engine performs no I/O and keeps no state between calls. Malformed weather is
//! defaulted with a warning, a missing perimeter degrades to empty geometry, and
//! disaster types without a model get a stable placeholder.
//!
//! # Example
//! ```
//! use fire_predict_core::{AnalysisRequest, PredictionCoordinator};
//!
//! let request: AnalysisRequest = serde_json::from_str(r#"{
//!     "type": "wildfire",
//!     "weather": {"wind": {"speed": 5, "deg": 90}, "main": {"temp": 25, "humidity": 40}},
//!     "fire_perimeter": {"type": "Polygon", "coordinates": [[
//!         [-79.8, 43.7], [-79.79, 43.7], [-79.79, 43.71], [-79.8, 43.71], [-79.8, 43.7]
//!     ]]}
//! }"#).unwrap();
//!
//! let outcome = PredictionCoordinator::default().analyze_request(&request);
//! let analysis = outcome.as_wildfire().unwrap();
//! assert!(*analysis.current_spread_rate_kmh > 2.0);
//! assert_eq!(analysis.predictions.len(), 3);
//! ```

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod geometry;
pub mod physics;
pub mod prediction;

// Re-export core types
pub use core_types::{
    CriticalPoint, CriticalPointSource, FirePerimeter, Location, PerimeterError, SpreadFactors,
    StaticCriticalPoints, WeatherObservation,
};

pub use config::{ConfigError, GeometryBackend, PredictionConfig};
pub use geometry::{create_geometry_provider, GeometryProvider};
pub use physics::SpreadRateModel;
pub use prediction::{
    AnalysisRequest, ArrivalEstimate, ConfidenceTier, DisasterType, FireSpreadAnalysis, Forecast,
    PredictionCoordinator, PredictionOutcome, TimelinePrediction,
};
