//! Semantic unit types for type-safe physical quantity handling
//!
//! This module provides newtype wrappers for the quantities that flow through the
//! prediction pipeline so that wind speeds in m/s cannot be mixed up with km/h, or
//! buffer distances with arrival times.
//!
//! # Design Philosophy
//! - All quantities use f64: polygon coordinates and geodesic areas are f64 in `geo`
//! - Implements common traits (Add, Sub, Mul, Div, Ord, Display, etc.)
//! - Provides explicit conversion methods between related types
//! - Serde support for serialization (newtypes serialize as the bare number)
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//! - Private inner fields with validated constructors
//!
//! # Usage
//! ```
//! use fire_predict_core::core_types::units::{Hours, Kilometers, KilometersPerHour, MetersPerSecond};
//!
//! let wind = MetersPerSecond::new(10.0);
//! assert!((*wind.to_kmh() - 36.0).abs() < 1e-9);
//!
//! let spread = KilometersPerHour::new(2.5);
//! let distance: Kilometers = spread * Hours::new(3.0);
//! assert!((*distance - 7.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Sub};

/// Round to a fixed number of decimal places. Non-finite values pass through unchanged.
#[inline]
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10_f64.powi(decimals);
    let scaled = value * scale;
    if !scaled.is_finite() {
        // Already coarser than the requested precision
        return value;
    }
    scaled.round() / scale
}

/// A raw number rejected by a validating unit constructor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidQuantity {
    pub unit: &'static str,
    pub value: f64,
}

impl fmt::Display for InvalidQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a valid {} value", self.value, self.unit)
    }
}

impl std::error::Error for InvalidQuantity {}

/// Total ordering, `Deref<Target = f64>` and raw accessors shared by every quantity
macro_rules! scalar_quantity {
    ($($name:ident),+ $(,)?) => {$(
        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl Deref for $name {
            type Target = f64;
            #[inline]
            fn deref(&self) -> &f64 {
                &self.0
            }
        }

        impl From<$name> for f64 {
            fn from(quantity: $name) -> f64 {
                quantity.0
            }
        }

        impl $name {
            /// Raw value in this quantity's unit
            #[inline]
            #[must_use]
            pub fn value(self) -> f64 {
                self.0
            }
        }
    )+};
}

scalar_quantity!(
    Celsius,
    Kilometers,
    SquareKilometers,
    Hours,
    MetersPerSecond,
    KilometersPerHour,
    Fraction,
    Percent,
    Degrees,
    Radians,
);

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-273.15);

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -273.15,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }

    /// Whether `value` is a physically meaningful temperature
    #[inline]
    #[must_use]
    pub fn is_valid(value: f64) -> bool {
        value.is_finite() && value >= *Self::ABSOLUTE_ZERO
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

// ============================================================================
// DISTANCE / AREA
// ============================================================================

/// Distance in kilometers
///
/// `f64::INFINITY` is a valid distance and stands for "unreachable".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64")]
#[repr(transparent)]
pub struct Kilometers(f64);

impl TryFrom<f64> for Kilometers {
    type Error = InvalidQuantity;
    fn try_from(value: f64) -> Result<Self, InvalidQuantity> {
        if value >= 0.0 {
            Ok(Kilometers(value))
        } else {
            Err(InvalidQuantity {
                unit: "distance (km)",
                value,
            })
        }
    }
}

impl Kilometers {
    /// Zero distance
    pub const ZERO: Kilometers = Kilometers(0.0);

    /// Unreachable / unknown distance
    pub const INFINITY: Kilometers = Kilometers(f64::INFINITY);

    /// Create a new Kilometers value. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Kilometers::new: negative distance is invalid");
        Kilometers(value)
    }
}

impl Add for Kilometers {
    type Output = Kilometers;
    fn add(self, rhs: Kilometers) -> Kilometers {
        Kilometers(self.0 + rhs.0)
    }
}

impl Mul<f64> for Kilometers {
    type Output = Kilometers;
    fn mul(self, rhs: f64) -> Kilometers {
        Kilometers(self.0 * rhs)
    }
}

// Cross-type operation: kilometers / km/h = hours
impl Div<KilometersPerHour> for Kilometers {
    type Output = Hours;
    fn div(self, rhs: KilometersPerHour) -> Hours {
        if rhs.0 > 0.0 {
            Hours(self.0 / rhs.0)
        } else {
            Hours::INFINITY
        }
    }
}

impl fmt::Display for Kilometers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km", self.0)
    }
}

/// Area in square kilometers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SquareKilometers(f64);

impl SquareKilometers {
    /// Zero area
    pub const ZERO: SquareKilometers = SquareKilometers(0.0);

    /// Create a new area. Negative input (e.g. from a clockwise ring) is folded to its magnitude.
    #[inline]
    #[must_use]
    pub fn new(value: f64) -> Self {
        SquareKilometers(value.abs())
    }
}

impl fmt::Display for SquareKilometers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km²", self.0)
    }
}

// ============================================================================
// TIME
// ============================================================================

/// Duration in hours
///
/// `f64::INFINITY` is a valid duration and stands for "never".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64")]
#[repr(transparent)]
pub struct Hours(f64);

impl TryFrom<f64> for Hours {
    type Error = InvalidQuantity;
    fn try_from(value: f64) -> Result<Self, InvalidQuantity> {
        if value >= 0.0 {
            Ok(Hours(value))
        } else {
            Err(InvalidQuantity {
                unit: "duration (h)",
                value,
            })
        }
    }
}

impl Hours {
    /// Never
    pub const INFINITY: Hours = Hours(f64::INFINITY);

    /// Create a new Hours value. Asserts value >= 0.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(value >= 0.0, "Hours::new: negative duration is invalid");
        Hours(value)
    }

    /// Round to `decimals` places, keeping infinity as-is
    #[inline]
    #[must_use]
    pub fn rounded(self, decimals: i32) -> Hours {
        Hours(round_to(self.0, decimals))
    }
}

impl From<u32> for Hours {
    fn from(v: u32) -> Self {
        Hours(f64::from(v))
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} h", self.0)
    }
}

// ============================================================================
// VELOCITY
// ============================================================================

/// Velocity in meters per second
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MetersPerSecond(f64);

impl MetersPerSecond {
    /// Create a new velocity
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        MetersPerSecond(value)
    }

    /// Convert to km/h
    #[inline]
    #[must_use]
    pub fn to_kmh(self) -> KilometersPerHour {
        KilometersPerHour(self.0 * 3.6)
    }
}

impl From<MetersPerSecond> for KilometersPerHour {
    fn from(v: MetersPerSecond) -> KilometersPerHour {
        v.to_kmh()
    }
}

impl fmt::Display for MetersPerSecond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} m/s", self.0)
    }
}

/// Velocity in kilometers per hour
///
/// Unvalidated: a negative spread rate is representable so that consumers can log and
/// clamp it themselves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KilometersPerHour(f64);

impl KilometersPerHour {
    /// Create a new `KilometersPerHour` value.
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        KilometersPerHour(value)
    }

    /// Convert to m/s
    #[inline]
    #[must_use]
    pub fn to_mps(self) -> MetersPerSecond {
        MetersPerSecond::new(self.0 / 3.6)
    }

    /// Round to `decimals` places
    #[inline]
    #[must_use]
    pub fn rounded(self, decimals: i32) -> KilometersPerHour {
        KilometersPerHour(round_to(self.0, decimals))
    }
}

impl Mul<f64> for KilometersPerHour {
    type Output = KilometersPerHour;
    fn mul(self, rhs: f64) -> KilometersPerHour {
        KilometersPerHour(self.0 * rhs)
    }
}

// Cross-type operation: km/h × hours = kilometers
impl Mul<Hours> for KilometersPerHour {
    type Output = Kilometers;
    #[track_caller]
    fn mul(self, rhs: Hours) -> Kilometers {
        Kilometers::new(self.0 * rhs.0)
    }
}

impl fmt::Display for KilometersPerHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} km/h", self.0)
    }
}

// ============================================================================
// RATIOS
// ============================================================================

/// A fraction in [0, 1], used for prediction confidence
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64")]
#[repr(transparent)]
pub struct Fraction(f64);

impl TryFrom<f64> for Fraction {
    type Error = InvalidQuantity;
    fn try_from(value: f64) -> Result<Self, InvalidQuantity> {
        if (0.0..=1.0).contains(&value) {
            Ok(Fraction(value))
        } else {
            Err(InvalidQuantity {
                unit: "fraction",
                value,
            })
        }
    }
}

impl Fraction {
    /// Zero fraction
    pub const ZERO: Fraction = Fraction(0.0);

    /// Create a new fraction. Asserts value is within [0, 1].
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn new(value: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&value),
            "Fraction::new: value not in [0, 1]"
        );
        Fraction(value)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A percentage (0-100 for relative humidity, but not enforced here)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Percent(f64);

impl Percent {
    /// Create a new percentage
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Percent(value)
    }
}

impl Sub for Percent {
    type Output = Percent;
    fn sub(self, rhs: Percent) -> Percent {
        Percent(self.0 - rhs.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

// ============================================================================
// ANGLES
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Degrees(f64);

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Wrap into the compass range [0, 360)
    #[inline]
    #[must_use]
    pub fn normalized(self) -> Degrees {
        let wrapped = self.0.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        Degrees(if wrapped >= 360.0 { 0.0 } else { wrapped })
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> Radians {
        Radians(self.0.to_radians())
    }
}

impl Sub for Degrees {
    type Output = Degrees;
    fn sub(self, rhs: Degrees) -> Degrees {
        Degrees(self.0 - rhs.0)
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Radians(f64);

impl Radians {
    /// Create a new angle in radians
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Radians(value)
    }

    /// Convert to degrees
    #[inline]
    #[must_use]
    pub fn to_degrees(self) -> Degrees {
        Degrees(self.0.to_degrees())
    }

    /// Compute cosine
    #[inline]
    #[must_use]
    pub fn cos(self) -> f64 {
        self.0.cos()
    }
}

impl fmt::Display for Radians {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}
