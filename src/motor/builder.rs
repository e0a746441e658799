//! Builder pattern for StepperDriver.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::TravelRate;
use crate::config::{DriverConfig, PinAssignment};
use crate::error::{ConfigError, Error, Result};
use crate::timer::PwmTimer;

use super::driver::StepperDriver;

/// Builder for creating StepperDriver instances.
///
/// Starts from the rig defaults; individual setters override them.
pub struct StepperDriverBuilder<TIMER, DIR, DELAY>
where
    TIMER: PwmTimer,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    timer: Option<TIMER>,
    dir_pin: Option<DIR>,
    delay: Option<DELAY>,
    config: DriverConfig,
}

impl<TIMER, DIR, DELAY> Default for StepperDriverBuilder<TIMER, DIR, DELAY>
where
    TIMER: PwmTimer,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<TIMER, DIR, DELAY> StepperDriverBuilder<TIMER, DIR, DELAY>
where
    TIMER: PwmTimer,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            timer: None,
            dir_pin: None,
            delay: None,
            config: DriverConfig::default(),
        }
    }

    /// Set the step timer.
    pub fn timer(mut self, timer: TIMER) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Set the DIR pin.
    pub fn direction_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: DELAY) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Record the step and direction pin identifiers.
    pub fn pins(mut self, pulse: u8, direction: u8) -> Self {
        self.config.pins = PinAssignment::new(pulse, direction);
        self
    }

    /// Set the Default tier top-count.
    pub fn base_top_count(mut self, top: u8) -> Self {
        self.config.timer.base_top_count = top;
        self
    }

    /// Set the Max and Min tier offsets.
    pub fn speed_offsets(mut self, max: i16, min: i16) -> Self {
        self.config.speed.max = max;
        self.config.speed.min = min;
        self
    }

    /// Set the settle delay after starting or stopping pulses.
    pub fn start_stop_delay_ms(mut self, ms: u32) -> Self {
        self.config.motion.start_stop_delay_ms = ms;
        self
    }

    /// Set the travel rate used by timed moves.
    pub fn travel_rate(mut self, rate: TravelRate) -> Self {
        self.config.motion.travel_rate = rate;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.config.motion.invert_direction = invert;
        self
    }

    /// Configure from a DriverConfig, replacing every setting made so far.
    pub fn from_config(mut self, config: &DriverConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Build the StepperDriver.
    ///
    /// # Errors
    ///
    /// Returns an error if a hardware component is missing, the configuration
    /// is invalid, or the timer rejects the initial top-count.
    pub fn build(self) -> Result<StepperDriver<TIMER, DIR, DELAY>> {
        let timer = self
            .timer
            .ok_or(Error::Config(ConfigError::MissingComponent("timer")))?;

        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingComponent("direction_pin")))?;

        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingComponent("delay")))?;

        StepperDriver::new(timer, dir_pin, delay, self.config)
    }
}
