//! Unit types for physical quantities.
//!
//! Provides type-safe representations of travel lengths, travel rates and
//! durations to prevent unit confusion at compile time.

use serde::Deserialize;

/// Linear travel of the actuator, in the rig's length unit (inches).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Length(pub f64);

impl Length {
    /// Create a new Length value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// A length can be travelled if it is finite and not negative.
    #[inline]
    pub fn is_travelable(self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

/// Empirical actuator travel rate in length units per second.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct TravelRate(pub f64);

impl TravelRate {
    /// Create a new TravelRate value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Time needed to travel `length` at this rate.
    ///
    /// Fractional milliseconds are truncated. Results beyond `u32::MAX` saturate.
    #[inline]
    pub fn duration_for(self, length: Length) -> Milliseconds {
        Milliseconds(((length.0 / self.0) * 1000.0) as u32)
    }
}

/// Duration in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Milliseconds(pub u32);

impl Milliseconds {
    /// Create a new Milliseconds value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Length.
    fn length(self) -> Length;
    /// Convert to TravelRate.
    fn per_sec(self) -> TravelRate;
}

impl UnitExt for f64 {
    #[inline]
    fn length(self) -> Length {
        Length(self)
    }

    #[inline]
    fn per_sec(self) -> TravelRate {
        TravelRate(self)
    }
}
