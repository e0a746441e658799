//! Configuration module for tensile-stepper.
//!
//! Provides the driver configuration, loaded from TOML files (with `std`
//! feature) or built in code from the rig defaults.

mod driver;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use driver::{
    DriverConfig, MotionConfig, PinAssignment, SpeedOffsets, TimerConfig, TopCounts, CPU_HZ,
    DEFAULT_TOP_COUNT, DUTY_COMPARE, MAX_SPEED_OFFSET, MIN_SPEED_OFFSET, PRESCALER,
    START_STOP_DELAY_MS, TRAVEL_RATE,
};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Length, Milliseconds, TravelRate};
