//! Simulated step timer for host-side testing.

use core::convert::Infallible;

use heapless::Deque;

use super::{PwmTimer, TimerMode};

/// Number of events kept by [`SimulatedTimer`]. Older events are dropped.
pub const EVENT_CAPACITY: usize = 32;

/// A single request received by the simulated timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerEvent {
    /// Top-count register reloaded.
    TopCount(u8),
    /// Slow-start stage entered.
    FreeRunning,
    /// Top-count driven PWM entered with the given period.
    Target(u8),
    /// Output stopped.
    Stopped,
}

/// Timer that records mode changes instead of generating pulses.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTimer {
    mode: TimerMode,
    top_count: u8,
    events: Deque<TimerEvent, EVENT_CAPACITY>,
}

impl SimulatedTimer {
    /// Create a stopped timer with a zero top-count register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current waveform mode.
    #[inline]
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Current top-count register value.
    #[inline]
    pub fn top_count(&self) -> u8 {
        self.top_count
    }

    /// Whether pulses are reaching the step pin.
    #[inline]
    pub fn is_output_active(&self) -> bool {
        self.mode != TimerMode::Stopped
    }

    /// Recorded events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &TimerEvent> {
        self.events.iter()
    }

    /// Forget recorded events.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn record(&mut self, event: TimerEvent) {
        if self.events.is_full() {
            self.events.pop_front();
        }
        // Cannot fail: a slot was freed above.
        let _ = self.events.push_back(event);
    }
}

impl PwmTimer for SimulatedTimer {
    type Error = Infallible;

    fn load_top_count(&mut self, top: u8) -> Result<(), Infallible> {
        self.top_count = top;
        self.record(TimerEvent::TopCount(top));
        Ok(())
    }

    fn set_free_running_low_frequency(&mut self) -> Result<(), Infallible> {
        self.mode = TimerMode::FreeRunning;
        self.record(TimerEvent::FreeRunning);
        Ok(())
    }

    fn set_target_frequency(&mut self, top: u8) -> Result<(), Infallible> {
        self.top_count = top;
        self.mode = TimerMode::Target;
        self.record(TimerEvent::Target(top));
        Ok(())
    }

    fn stop_output(&mut self) -> Result<(), Infallible> {
        self.mode = TimerMode::Stopped;
        self.record(TimerEvent::Stopped);
        Ok(())
    }
}
