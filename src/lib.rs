//! # tensile-stepper
//!
//! PWM-timer stepper motor driver for the linear actuator of a tensile-testing rig,
//! with embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Hardware PWM stepping**: the step line is driven by a timer peripheral, not bit-banged
//! - **Anti-stall ramp**: start and stop go through a slow-start stage and a settle delay
//! - **Speed tiers**: Min / Default / Max frequency offsets applied to the timer top-count
//! - **Timed moves**: linear distance converted into a PWM burst of fixed duration
//! - **embedded-hal 1.0**: `OutputPin` for DIR, `DelayNs` for every blocking wait
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tensile_stepper::{DriverConfig, Length, StepperDriver};
//! use tensile_stepper::timer::atmega::Timer2;
//!
//! let config = DriverConfig::default();
//! let mut motor = StepperDriver::builder()
//!     .from_config(&config)
//!     // Register setup follows the same clock as the reported frequency
//!     .timer(Timer2::from_config(regs, &config.timer)?)
//!     .direction_pin(dir_pin)
//!     .delay(delay)
//!     .build()?;
//!
//! motor.set_clockwise()?;
//! motor.set_max_speed()?;
//! motor.move_distance(Length(1.04))?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod motor;
pub mod timer;

// Re-exports for ergonomic API
pub use config::{validate_config, DriverConfig, PinAssignment, TopCounts};
pub use error::{Error, Result};
pub use motor::{Direction, MotorState, SpeedTier, StepperDriver, StepperDriverBuilder};
pub use timer::{PwmTimer, TimerMode};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Length, Milliseconds, TravelRate};
