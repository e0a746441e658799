//! PWM timer capability for the step line.
//!
//! The driver never touches timer registers directly. It asks a [`PwmTimer`]
//! to move between three waveform modes and to reload the period register.
//! [`atmega::Timer2`] implements it on top of the ATmega328P Timer2 registers
//! and [`sim::SimulatedTimer`] records the requested modes for host testing.

pub mod atmega;
pub mod sim;

/// Waveform mode of the step timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerMode {
    /// Output disconnected, no pulses.
    #[default]
    Stopped,
    /// Reduced-frequency stage; the period register does not set the period.
    FreeRunning,
    /// Operating frequency; the period is set by the top-count register.
    Target,
}

/// Hardware timer able to generate the step pulse train.
pub trait PwmTimer {
    /// Error type returned by the timer.
    type Error: core::fmt::Debug;

    /// Reload the top-count (period) register without changing waveform mode.
    ///
    /// Safe while pulses are running: the next period uses the new value.
    fn load_top_count(&mut self, top: u8) -> Result<(), Self::Error>;

    /// Start pulses at a reduced frequency so the rotor can build momentum.
    fn set_free_running_low_frequency(&mut self) -> Result<(), Self::Error>;

    /// Switch to top-count driven PWM with period `top`.
    fn set_target_frequency(&mut self, top: u8) -> Result<(), Self::Error>;

    /// Switch to a waveform mode with no output on the step pin.
    fn stop_output(&mut self) -> Result<(), Self::Error>;
}

impl<T: PwmTimer + ?Sized> PwmTimer for &mut T {
    type Error = T::Error;

    #[inline]
    fn load_top_count(&mut self, top: u8) -> Result<(), Self::Error> {
        T::load_top_count(self, top)
    }

    #[inline]
    fn set_free_running_low_frequency(&mut self) -> Result<(), Self::Error> {
        T::set_free_running_low_frequency(self)
    }

    #[inline]
    fn set_target_frequency(&mut self, top: u8) -> Result<(), Self::Error> {
        T::set_target_frequency(self, top)
    }

    #[inline]
    fn stop_output(&mut self) -> Result<(), Self::Error> {
        T::stop_output(self)
    }
}
