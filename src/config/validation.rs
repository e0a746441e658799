//! Configuration validation.

use crate::error::{ConfigError, Error, Result};

use super::driver::{MotionConfig, TimerConfig};
use super::DriverConfig;

/// Clock divisors available on the step timer.
const VALID_PRESCALERS: [u16; 7] = [1, 8, 32, 64, 128, 256, 1024];

/// Validate a driver configuration.
///
/// Checks:
/// - Timer clock is non-zero and the prescaler is supported
/// - Every speed tier resolves to a top-count that fits the 8-bit register
/// - The duty compare value lies below every tier's top-count, so each tier
///   still produces a pulse
/// - Travel rate is finite and positive
pub fn validate_config(config: &DriverConfig) -> Result<()> {
    validate_timer(&config.timer)?;

    // Tier offsets against the base top-count
    let counts = config.top_counts()?;

    // Compare match must happen inside the shortest period
    let shortest = counts.min.min(counts.default).min(counts.max);
    if config.timer.duty_compare >= shortest {
        return Err(Error::Config(ConfigError::DutyCompareOutOfRange {
            duty: config.timer.duty_compare,
            top: shortest,
        }));
    }

    validate_motion(&config.motion)?;

    Ok(())
}

fn validate_timer(timer: &TimerConfig) -> Result<()> {
    if timer.cpu_hz == 0 {
        return Err(Error::Config(ConfigError::InvalidClock(timer.cpu_hz)));
    }

    if !VALID_PRESCALERS.contains(&timer.prescaler) {
        return Err(Error::Config(ConfigError::InvalidPrescaler(timer.prescaler)));
    }

    Ok(())
}

fn validate_motion(motion: &MotionConfig) -> Result<()> {
    let rate = motion.travel_rate.0;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(Error::Config(ConfigError::InvalidTravelRate(rate)));
    }

    Ok(())
}
