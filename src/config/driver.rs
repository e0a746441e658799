//! Driver configuration - root configuration structure.
//!
//! Every field defaults to the rig's calibrated constants, so an empty TOML
//! document (or `DriverConfig::default()`) reproduces the stock actuator.

use serde::Deserialize;

use crate::error::{ConfigError, Error, Result};
use crate::motor::SpeedTier;

use super::units::TravelRate;

/// Base top-count loaded into the period register (Default tier).
pub const DEFAULT_TOP_COUNT: u8 = 124;
/// Offset applied for the Max tier (shorter period, higher frequency).
pub const MAX_SPEED_OFFSET: i16 = -42;
/// Offset applied for the Min tier (longer period, lower frequency).
pub const MIN_SPEED_OFFSET: i16 = 120;
/// Settle delay after starting or stopping pulses.
pub const START_STOP_DELAY_MS: u32 = 20;
/// Measured actuator travel, in inches per second.
pub const TRAVEL_RATE: f64 = 0.52;
/// Compare value for the step output duty cycle.
pub const DUTY_COMPARE: u8 = 50;
/// Timer input clock.
pub const CPU_HZ: u32 = 16_000_000;
/// Timer clock divisor used for both ramp stages.
pub const PRESCALER: u16 = 64;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Pin identifiers for the step and direction lines.
    pub pins: PinAssignment,

    /// Timer clock and period registers.
    pub timer: TimerConfig,

    /// Speed tier offsets.
    pub speed: SpeedOffsets,

    /// Settle delay, travel calibration and direction polarity.
    pub motion: MotionConfig,
}

impl DriverConfig {
    /// Resolve the top-count of every speed tier.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::TopCountOutOfRange` if a tier does not fit the
    /// 8-bit period register.
    pub fn top_counts(&self) -> Result<TopCounts> {
        let base = self.timer.base_top_count;
        let resolve = |offset: i16| {
            self.timer
                .top_count(offset)
                .ok_or(Error::Config(ConfigError::TopCountOutOfRange { base, offset }))
        };

        Ok(TopCounts {
            min: resolve(self.speed.min)?,
            default: base,
            max: resolve(self.speed.max)?,
        })
    }
}

/// Pin identifiers, fixed for the lifetime of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    /// Step line, driven by the timer's PWM output.
    pub pulse: u8,
    /// Direction line, driven by plain digital writes.
    pub direction: u8,
}

impl PinAssignment {
    /// Create a new pin assignment.
    pub const fn new(pulse: u8, direction: u8) -> Self {
        Self { pulse, direction }
    }
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self::new(3, 4)
    }
}

/// Timer clock and period register configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Timer input clock in Hz.
    pub cpu_hz: u32,

    /// Clock divisor (1, 8, 32, 64, 128, 256, 1024).
    pub prescaler: u16,

    /// Period register value for the Default tier.
    pub base_top_count: u8,

    /// Compare register value setting the step pulse width.
    pub duty_compare: u8,
}

impl TimerConfig {
    /// Period register value for `base_top_count + offset`, if it fits 8 bits.
    pub fn top_count(&self, offset: i16) -> Option<u8> {
        u8::try_from(i16::from(self.base_top_count) + offset).ok()
    }

    /// Step frequency produced by a given top-count in top-count driven mode.
    ///
    /// `f = cpu_hz / (prescaler * (top + 1))`
    pub fn frequency_hz(&self, top: u8) -> f32 {
        self.cpu_hz as f32 / (f32::from(self.prescaler) * (f32::from(top) + 1.0))
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            cpu_hz: CPU_HZ,
            prescaler: PRESCALER,
            base_top_count: DEFAULT_TOP_COUNT,
            duty_compare: DUTY_COMPARE,
        }
    }
}

/// Signed top-count offsets for the non-default speed tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpeedOffsets {
    /// Offset for the Max tier (negative: shorter period).
    #[serde(rename = "max_offset")]
    pub max: i16,

    /// Offset for the Min tier (positive: longer period).
    #[serde(rename = "min_offset")]
    pub min: i16,
}

impl SpeedOffsets {
    /// Raw offset for a tier. The Default tier is always 0.
    #[inline]
    pub fn offset(&self, tier: SpeedTier) -> i16 {
        match tier {
            SpeedTier::Min => self.min,
            SpeedTier::Default => 0,
            SpeedTier::Max => self.max,
        }
    }
}

impl Default for SpeedOffsets {
    fn default() -> Self {
        Self {
            max: MAX_SPEED_OFFSET,
            min: MIN_SPEED_OFFSET,
        }
    }
}

/// Motion timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Settle delay after starting or stopping pulse generation.
    pub start_stop_delay_ms: u32,

    /// Travel rate used to turn a distance into a burst duration.
    ///
    /// A single rate is used for every speed tier.
    pub travel_rate: TravelRate,

    /// Swap the direction line levels (low = clockwise).
    pub invert_direction: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            start_stop_delay_ms: START_STOP_DELAY_MS,
            travel_rate: TravelRate(TRAVEL_RATE),
            invert_direction: false,
        }
    }
}

/// Resolved period register value per speed tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TopCounts {
    /// Min tier top-count.
    pub min: u8,
    /// Default tier top-count.
    pub default: u8,
    /// Max tier top-count.
    pub max: u8,
}

impl TopCounts {
    /// Top-count for a tier.
    #[inline]
    pub fn for_tier(&self, tier: SpeedTier) -> u8 {
        match tier {
            SpeedTier::Min => self.min,
            SpeedTier::Default => self.default,
            SpeedTier::Max => self.max,
        }
    }
}
