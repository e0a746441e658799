//! Stepper motor driver.
//!
//! Generic over a PWM step timer and embedded-hal 1.0 direction pin and delay.
//!
//! Pulse generation is switched on in two stages (slow start, then target
//! frequency) and every start or stop is followed by a settle delay. The
//! direction line is only written while pulses are off.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Length, Milliseconds};
use crate::config::{DriverConfig, PinAssignment, TopCounts};
use crate::error::{MotionError, MotorError, Result};
use crate::timer::PwmTimer;

use super::builder::StepperDriverBuilder;
use super::state::{Direction, MotorState, SpeedTier};

/// Stepper motor driver for a single PWM-driven step line.
///
/// Generic over:
/// - `TIMER`: step pulse generator (must implement [`PwmTimer`])
/// - `DIR`: DIR pin type (must implement `OutputPin`)
/// - `DELAY`: Delay provider (must implement `DelayNs`)
///
/// All operations block for their settle or motion delays.
pub struct StepperDriver<TIMER, DIR, DELAY>
where
    TIMER: PwmTimer,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Step pulse generator.
    timer: TIMER,

    /// DIR pin (high = CW, low = CCW, or inverted).
    dir_pin: DIR,

    /// Delay provider for settle delays and timed moves.
    delay: DELAY,

    /// Validated configuration.
    config: DriverConfig,

    /// Top-count per speed tier, resolved once from the configuration.
    top_counts: TopCounts,

    /// Direction, enable flag and speed tier.
    state: MotorState,
}

impl<TIMER, DIR, DELAY> StepperDriver<TIMER, DIR, DELAY>
where
    TIMER: PwmTimer,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a builder.
    pub fn builder() -> StepperDriverBuilder<TIMER, DIR, DELAY> {
        StepperDriverBuilder::new()
    }

    /// Initialize the driver.
    ///
    /// Validates `config`, loads the base top-count into the timer and starts
    /// disabled, clockwise, at the Default tier. The direction line is left at
    /// its power-on level until a direction is set.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid, or
    /// `MotorError::TimerError` if the timer rejects the top-count.
    pub fn new(mut timer: TIMER, dir_pin: DIR, delay: DELAY, config: DriverConfig) -> Result<Self> {
        crate::config::validate_config(&config)?;
        let top_counts = config.top_counts()?;

        timer
            .load_top_count(top_counts.default)
            .map_err(|_| MotorError::TimerError)?;

        info!(
            "stepper initialized: pulse pin {}, direction pin {}, top-count {}",
            config.pins.pulse,
            config.pins.direction,
            top_counts.default
        );

        Ok(Self {
            timer,
            dir_pin,
            delay,
            config,
            top_counts,
            state: MotorState::default(),
        })
    }

    /// Whether pulse generation is active.
    #[inline]
    pub fn status(&self) -> bool {
        self.state.enabled
    }

    /// Snapshot of the driver state.
    #[inline]
    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Start pulse generation.
    ///
    /// Runs the slow-start stage for the settle delay, then switches to the
    /// current tier's frequency. Calling this while already enabled repeats
    /// the whole sequence.
    ///
    /// # Errors
    ///
    /// Returns `MotorError::TimerError` if either stage is rejected. Output is
    /// stopped again before returning, and the motor stays disabled.
    pub fn enable(&mut self) -> Result<()> {
        self.timer
            .set_free_running_low_frequency()
            .map_err(|_| MotorError::TimerError)?;

        self.settle();

        let top = self.top_count();
        if self.timer.set_target_frequency(top).is_err() {
            // Slow-start pulses are live; do not leave them running behind a
            // disabled status.
            let _ = self.timer.stop_output();
            warn!("stepper enable failed at top-count {}", top);
            return Err(MotorError::TimerError.into());
        }

        self.state.enabled = true;
        debug!("stepper enabled at top-count {}", top);
        Ok(())
    }

    /// Stop pulse generation and wait for the motor to settle.
    ///
    /// Safe to call when already disabled.
    pub fn disable(&mut self) -> Result<()> {
        self.timer.stop_output().map_err(|_| MotorError::TimerError)?;

        self.settle();

        self.state.enabled = false;
        debug!("stepper disabled");
        Ok(())
    }

    /// Disable the motor, then drive the direction line for clockwise rotation.
    pub fn set_clockwise(&mut self) -> Result<()> {
        self.set_direction(Direction::Clockwise)
    }

    /// Disable the motor, then drive the direction line for counter-clockwise rotation.
    pub fn set_counter_clockwise(&mut self) -> Result<()> {
        self.set_direction(Direction::CounterClockwise)
    }

    /// Disable the motor, then drive the direction line for `direction`.
    ///
    /// The motor is left disabled; call [`enable`](Self::enable) to resume.
    pub fn set_direction(&mut self, direction: Direction) -> Result<()> {
        // Never reverse an energized winding sequence.
        self.disable()?;

        if direction.line_high(self.config.motion.invert_direction) {
            self.dir_pin.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.state.direction = direction;
        debug!("stepper direction {}", direction);
        Ok(())
    }

    /// Whether the commanded direction is clockwise.
    #[inline]
    pub fn is_clockwise(&self) -> bool {
        self.state.direction == Direction::Clockwise
    }

    /// Commanded direction.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    /// Select the Max tier and reload the period register.
    pub fn set_max_speed(&mut self) -> Result<()> {
        self.set_speed_tier(SpeedTier::Max)
    }

    /// Select the Min tier and reload the period register.
    pub fn set_min_speed(&mut self) -> Result<()> {
        self.set_speed_tier(SpeedTier::Min)
    }

    /// Select the Default tier and reload the period register.
    pub fn set_default_speed(&mut self) -> Result<()> {
        self.set_speed_tier(SpeedTier::Default)
    }

    /// Select a speed tier.
    ///
    /// Only the period register is reloaded, so this is safe while running and
    /// takes effect from the next PWM period.
    pub fn set_speed_tier(&mut self, tier: SpeedTier) -> Result<()> {
        let top = self.top_counts.for_tier(tier);
        self.timer
            .load_top_count(top)
            .map_err(|_| MotorError::TimerError)?;

        self.state.speed_tier = tier;

        debug!("stepper speed tier {}, top-count {}", tier, top);
        Ok(())
    }

    /// Selected speed tier.
    #[inline]
    pub fn speed_tier(&self) -> SpeedTier {
        self.state.speed_tier
    }

    /// Raw top-count offset of the selected tier (0 for Default).
    #[inline]
    pub fn speed_offset(&self) -> i16 {
        self.config.speed.offset(self.state.speed_tier)
    }

    /// Period register value for the selected tier.
    #[inline]
    pub fn top_count(&self) -> u8 {
        self.top_counts.for_tier(self.state.speed_tier)
    }

    /// Step frequency of the selected tier once the ramp has completed.
    pub fn output_frequency_hz(&self) -> f32 {
        self.config.timer.frequency_hz(self.top_count())
    }

    /// Burst duration needed to travel `length`.
    ///
    /// A single travel rate is used whatever the speed tier.
    #[inline]
    pub fn move_duration(&self, length: Length) -> Milliseconds {
        self.config.motion.travel_rate.duration_for(length)
    }

    /// Travel `length` by running pulses for a fixed time, then stop.
    ///
    /// Blocks for the ramp, the burst and the stop settle delay. The motor is
    /// disabled on return.
    ///
    /// # Errors
    ///
    /// Returns `MotionError::InvalidDistance` without touching the hardware if
    /// `length` is negative or not finite.
    pub fn move_distance(&mut self, length: Length) -> Result<()> {
        if !length.is_travelable() {
            warn!("rejected move of {}", length.0);
            return Err(MotionError::InvalidDistance(length.0).into());
        }

        let duration = self.move_duration(length);
        info!("moving {} for {} ms", length.0, duration.0);

        self.enable()?;
        self.delay.delay_ms(duration.0);
        self.disable()
    }

    /// Pin identifiers.
    #[inline]
    pub fn pins(&self) -> PinAssignment {
        self.config.pins
    }

    /// Get the driver configuration.
    #[inline]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Get the step timer.
    #[inline]
    pub fn timer(&self) -> &TIMER {
        &self.timer
    }

    /// Release the timer, direction pin and delay.
    ///
    /// The timer is handed back in whatever mode it was left in.
    pub fn release(self) -> (TIMER, DIR, DELAY) {
        (self.timer, self.dir_pin, self.delay)
    }

    fn settle(&mut self) {
        self.delay.delay_ms(self.config.motion.start_stop_delay_ms);
    }
}
