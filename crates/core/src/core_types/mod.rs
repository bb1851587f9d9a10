//! Core types and utilities

pub mod critical_point;
pub mod perimeter;
pub mod units;
pub mod weather;

pub use critical_point::{CriticalPoint, CriticalPointSource, Location, StaticCriticalPoints};
pub use perimeter::{FirePerimeter, PerimeterError};
pub use units::*;
pub use weather::{SpreadFactors, WeatherObservation};
