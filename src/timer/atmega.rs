//! ATmega328P Timer2 backend.
//!
//! Fast PWM on Timer2 with the step line on OC2B. Register access goes through
//! [`Timer2Registers`] so the same sequencing runs on a PAC register block or
//! on a fake in tests.

use core::convert::Infallible;

use crate::config::TimerConfig;
use crate::error::{ConfigError, Error, Result};

use super::PwmTimer;

// TCCR2A bits
/// Compare Match Output A, bit 1.
pub const COM2A1: u8 = 1 << 7;
/// Compare Match Output A, bit 0.
pub const COM2A0: u8 = 1 << 6;
/// Compare Match Output B, bit 1.
pub const COM2B1: u8 = 1 << 5;
/// Compare Match Output B, bit 0.
pub const COM2B0: u8 = 1 << 4;
/// Waveform Generation Mode, bit 1.
pub const WGM21: u8 = 1 << 1;
/// Waveform Generation Mode, bit 0.
pub const WGM20: u8 = 1 << 0;

// TCCR2B bits
/// Waveform Generation Mode, bit 2.
pub const WGM22: u8 = 1 << 3;
/// Clock Select, bit 2.
pub const CS22: u8 = 1 << 2;
/// Clock Select, bit 1.
pub const CS21: u8 = 1 << 1;
/// Clock Select, bit 0.
pub const CS20: u8 = 1 << 0;

/// Write access to the Timer2 registers used by the step timer.
pub trait Timer2Registers {
    /// Write Timer/Counter Control Register A.
    fn write_tccr2a(&mut self, value: u8);
    /// Write Timer/Counter Control Register B.
    fn write_tccr2b(&mut self, value: u8);
    /// Write Output Compare Register A (top-count).
    fn write_ocr2a(&mut self, value: u8);
    /// Write Output Compare Register B (step duty compare).
    fn write_ocr2b(&mut self, value: u8);
}

/// Clock-select bits for a Timer2 prescaler.
///
/// Timer2 has its own divisor table, which includes /32 and /128.
pub fn clock_select(prescaler: u16) -> Option<u8> {
    let bits = match prescaler {
        1 => CS20,
        8 => CS21,
        32 => CS21 | CS20,
        64 => CS22,
        128 => CS22 | CS20,
        256 => CS22 | CS21,
        1024 => CS22 | CS21 | CS20,
        _ => return None,
    };
    Some(bits)
}

/// Step timer on ATmega328P Timer2.
pub struct Timer2<R: Timer2Registers> {
    regs: R,
    clock_select: u8,
}

impl<R: Timer2Registers> Timer2<R> {
    /// Take over Timer2 with the rig defaults (/64, duty compare 50).
    ///
    /// Only matches a driver running on `TimerConfig::default()`. With any other
    /// prescaler or duty compare, use [`Timer2::from_config`] so the registers
    /// agree with the frequency the driver reports.
    pub fn new(regs: R) -> Self {
        Self::with_clock(regs, CS22, crate::config::DUTY_COMPARE)
    }

    /// Take over Timer2 using the prescaler and duty compare from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPrescaler` if Timer2 has no such divisor.
    pub fn from_config(regs: R, config: &TimerConfig) -> Result<Self> {
        let cs = clock_select(config.prescaler)
            .ok_or(Error::Config(ConfigError::InvalidPrescaler(config.prescaler)))?;
        Ok(Self::with_clock(regs, cs, config.duty_compare))
    }

    fn with_clock(mut regs: R, clock_select: u8, duty_compare: u8) -> Self {
        regs.write_ocr2b(duty_compare);
        Self { regs, clock_select }
    }

    /// Give back the register block.
    pub fn free(self) -> R {
        self.regs
    }
}

impl<R: Timer2Registers> PwmTimer for Timer2<R> {
    type Error = Infallible;

    fn load_top_count(&mut self, top: u8) -> core::result::Result<(), Infallible> {
        self.regs.write_ocr2a(top);
        Ok(())
    }

    fn set_free_running_low_frequency(&mut self) -> core::result::Result<(), Infallible> {
        // Fast PWM, TOP = 0xFF
        self.regs.write_tccr2a(COM2A1 | WGM21 | WGM20);
        self.regs.write_tccr2b(self.clock_select);
        Ok(())
    }

    fn set_target_frequency(&mut self, top: u8) -> core::result::Result<(), Infallible> {
        self.regs.write_ocr2a(top);
        // Fast PWM, TOP = OCR2A, step pulses on OC2B
        self.regs.write_tccr2a(COM2A0 | COM2B1 | WGM21 | WGM20);
        self.regs.write_tccr2b(WGM22 | self.clock_select);
        Ok(())
    }

    fn stop_output(&mut self) -> core::result::Result<(), Infallible> {
        // Phase-correct PWM with both compare outputs disconnected
        self.regs.write_tccr2a(WGM20);
        Ok(())
    }
}
