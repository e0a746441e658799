//! Motor module for tensile-stepper.
//!
//! Provides the PWM stepper driver, its builder and the state it tracks.

mod builder;
mod driver;
pub mod state;

pub use builder::StepperDriverBuilder;
pub use driver::StepperDriver;
pub use state::{Direction, MotorState, SpeedTier};
