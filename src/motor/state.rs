//! Motor state tracked by the driver.

/// Rotation sense of the motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (direction line high unless inverted).
    #[default]
    Clockwise,
    /// Counter-clockwise (direction line low unless inverted).
    CounterClockwise,
}

impl Direction {
    /// The opposite rotation sense.
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Level of the direction line for this sense.
    #[inline]
    pub fn line_high(self, inverted: bool) -> bool {
        match self {
            Direction::Clockwise => !inverted,
            Direction::CounterClockwise => inverted,
        }
    }
}

/// Discrete step frequency selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpeedTier {
    /// Longest period, lowest step frequency.
    Min,
    /// Base top-count, no offset.
    #[default]
    Default,
    /// Shortest period, highest step frequency.
    Max,
}

/// Runtime state of the driver.
///
/// `enabled` is only true between `enable()` and `disable()`, and
/// `direction` only changes while `enabled` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorState {
    /// Commanded rotation sense.
    pub direction: Direction,
    /// Whether pulse generation is active.
    pub enabled: bool,
    /// Selected speed tier.
    pub speed_tier: SpeedTier,
}

impl MotorState {
    /// State name for display/debugging.
    pub fn name(&self) -> &'static str {
        if self.enabled {
            "Enabled"
        } else {
            "Disabled"
        }
    }
}
