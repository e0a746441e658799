//! Error types for tensile-stepper.
//!
//! Provides unified error handling across configuration, driver hardware access,
//! and motion requests.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all tensile-stepper operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing, validation or driver assembly error
    Config(ConfigError),
    /// Motor hardware error
    Motor(MotorError),
    /// Motion request error
    Motion(MotionError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// A speed tier resolves to a top-count outside the 8-bit timer register
    TopCountOutOfRange {
        /// Base top-count
        base: u8,
        /// Offset of the offending tier
        offset: i16,
    },
    /// PWM compare value does not fall inside every tier's period
    DutyCompareOutOfRange {
        /// Configured compare value
        duty: u8,
        /// Smallest top-count across the speed tiers
        top: u8,
    },
    /// Prescaler is not one of the divisors the timer supports
    InvalidPrescaler(u16),
    /// Timer input clock must be > 0
    InvalidClock(u32),
    /// Travel rate must be finite and > 0
    InvalidTravelRate(f64),
    /// Driver was built without a required component
    MissingComponent(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motor hardware errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Direction pin operation failed
    PinError,
    /// PWM timer operation failed
    TimerError,
}

/// Motion request errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Requested travel is negative or not a finite number
    InvalidDistance(f64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::TopCountOutOfRange { base, offset } => write!(
                f,
                "Top-count {} + {} does not fit the 8-bit timer register (0-255)",
                base, offset
            ),
            ConfigError::DutyCompareOutOfRange { duty, top } => write!(
                f,
                "Duty compare {} must be below the smallest tier top-count {}",
                duty, top
            ),
            ConfigError::InvalidPrescaler(v) => write!(
                f,
                "Invalid prescaler: {}. Valid values: 1, 8, 32, 64, 128, 256, 1024",
                v
            ),
            ConfigError::InvalidClock(v) => write!(f, "Invalid timer clock: {} Hz. Must be > 0", v),
            ConfigError::InvalidTravelRate(v) => {
                write!(f, "Invalid travel rate: {}. Must be finite and > 0", v)
            }
            ConfigError::MissingComponent(name) => write!(f, "{} is required", name),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::TimerError => write!(f, "PWM timer operation failed"),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::InvalidDistance(d) => {
                write!(f, "Invalid distance {}: must be finite and >= 0", d)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
