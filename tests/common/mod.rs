//! Shared test doubles that record every hardware interaction in one log,
//! so the relative order of timer, delay and direction-line calls can be checked.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use tensile_stepper::{DriverConfig, PwmTimer, StepperDriver};

/// One recorded hardware interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    TopCount(u8),
    FreeRunning,
    Target(u8),
    Stop,
    DelayMs(u32),
    DelayNs(u32),
    DirHigh,
    DirLow,
}

pub type Log = Rc<RefCell<Vec<Op>>>;

pub struct LoggedTimer(pub Log);

impl PwmTimer for LoggedTimer {
    type Error = Infallible;

    fn load_top_count(&mut self, top: u8) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Op::TopCount(top));
        Ok(())
    }

    fn set_free_running_low_frequency(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Op::FreeRunning);
        Ok(())
    }

    fn set_target_frequency(&mut self, top: u8) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Op::Target(top));
        Ok(())
    }

    fn stop_output(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Op::Stop);
        Ok(())
    }
}

/// Virtual clock: records requested waits instead of sleeping.
pub struct LoggedDelay(pub Log);

impl DelayNs for LoggedDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(Op::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(Op::DelayMs(ms));
    }
}

pub struct LoggedPin(pub Log);

impl ErrorType for LoggedPin {
    type Error = Infallible;
}

impl OutputPin for LoggedPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Op::DirLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().push(Op::DirHigh);
        Ok(())
    }
}

pub type LoggedDriver = StepperDriver<LoggedTimer, LoggedPin, LoggedDelay>;

/// Driver whose timer, direction line and delay all write to the returned log.
pub fn logged_driver(config: DriverConfig) -> (LoggedDriver, Log) {
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let driver = StepperDriver::new(
        LoggedTimer(log.clone()),
        LoggedPin(log.clone()),
        LoggedDelay(log.clone()),
        config,
    )
    .expect("default config is valid");
    (driver, log)
}

/// Take and clear everything recorded so far.
pub fn drain(log: &Log) -> Vec<Op> {
    log.borrow_mut().drain(..).collect()
}

/// Sum of all millisecond waits in `ops`.
pub fn total_delay_ms(ops: &[Op]) -> u64 {
    ops.iter()
        .map(|op| match op {
            Op::DelayMs(ms) => u64::from(*ms),
            _ => 0,
        })
        .sum()
}
