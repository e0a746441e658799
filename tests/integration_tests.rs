//! Integration tests for tensile-stepper.
//!
//! These tests drive the public API against recording doubles and check the
//! exact hardware sequence as well as the observable driver state.

mod common;

use std::cell::Cell;
use std::convert::Infallible;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};

use tensile_stepper::config::{MAX_SPEED_OFFSET, MIN_SPEED_OFFSET};
use tensile_stepper::error::{ConfigError, MotorError};
use tensile_stepper::timer::atmega::{Timer2, Timer2Registers};
use tensile_stepper::timer::sim::SimulatedTimer;
use tensile_stepper::{
    Direction, DriverConfig, Error, Length, PwmTimer, SpeedTier, StepperDriver, TimerMode,
};

use common::{drain, logged_driver, total_delay_ms, Op};

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn initialize_loads_base_top_count_only() {
    let (motor, log) = logged_driver(DriverConfig::default());

    // No direction write and no waveform change at start-up
    assert_eq!(drain(&log), vec![Op::TopCount(124)]);
    assert!(!motor.status());
    assert!(motor.is_clockwise());
    assert_eq!(motor.speed_offset(), 0);
    assert_eq!(motor.speed_tier(), SpeedTier::Default);
}

#[test]
fn initialize_through_builder_with_pins() {
    let motor = StepperDriver::builder()
        .pins(3, 4)
        .timer(SimulatedTimer::new())
        .direction_pin(PinMock::new(&[]))
        .delay(NoopDelay::new())
        .build()
        .expect("builder with all components");

    assert_eq!(motor.pins().pulse, 3);
    assert_eq!(motor.pins().direction, 4);
    assert_eq!(motor.timer().top_count(), 124);

    let (_, mut pin, _) = motor.release();
    pin.done();
}

#[test]
fn builder_without_direction_pin_is_a_config_error() {
    let result = StepperDriver::<SimulatedTimer, PinMock, NoopDelay>::builder()
        .timer(SimulatedTimer::new())
        .delay(NoopDelay::new())
        .build();

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MissingComponent("direction_pin")))
    ));
}

// =============================================================================
// Enable / disable sequencing
// =============================================================================

#[test]
fn enable_ramps_through_slow_start() {
    let (mut motor, log) = logged_driver(DriverConfig::default());
    drain(&log);

    motor.enable().unwrap();

    assert_eq!(
        drain(&log),
        vec![Op::FreeRunning, Op::DelayMs(20), Op::Target(124)]
    );
    assert!(motor.status());
}

#[test]
fn enable_twice_repeats_the_sequence() {
    let (mut motor, log) = logged_driver(DriverConfig::default());
    motor.enable().unwrap();
    drain(&log);

    motor.enable().unwrap();

    assert_eq!(
        drain(&log),
        vec![Op::FreeRunning, Op::DelayMs(20), Op::Target(124)]
    );
    assert!(motor.status());
}

#[test]
fn disable_stops_then_settles() {
    let (mut motor, log) = logged_driver(DriverConfig::default());
    motor.enable().unwrap();
    drain(&log);

    motor.disable().unwrap();

    assert_eq!(drain(&log), vec![Op::Stop, Op::DelayMs(20)]);
    assert!(!motor.status());
}

#[test]
fn disable_twice_is_safe() {
    let (mut motor, _log) = logged_driver(DriverConfig::default());
    motor.enable().unwrap();

    motor.disable().unwrap();
    assert!(!motor.status());

    motor.disable().unwrap();
    assert!(!motor.status());
}

#[test]
fn settle_delay_follows_config() {
    let mut config = DriverConfig::default();
    config.motion.start_stop_delay_ms = 35;
    let (mut motor, log) = logged_driver(config);
    drain(&log);

    motor.enable().unwrap();
    motor.disable().unwrap();

    assert_eq!(total_delay_ms(&drain(&log)), 70);
}

// =============================================================================
// Direction
// =============================================================================

#[test]
fn direction_change_while_enabled_stops_first() {
    let (mut motor, log) = logged_driver(DriverConfig::default());
    motor.enable().unwrap();
    drain(&log);

    motor.set_counter_clockwise().unwrap();

    assert_eq!(drain(&log), vec![Op::Stop, Op::DelayMs(20), Op::DirLow]);
    assert!(!motor.status());
    assert!(!motor.is_clockwise());
    assert_eq!(motor.direction(), Direction::CounterClockwise);
}

#[test]
fn direction_change_while_disabled_still_disables() {
    let (mut motor, log) = logged_driver(DriverConfig::default());
    drain(&log);

    motor.set_clockwise().unwrap();

    assert_eq!(drain(&log), vec![Op::Stop, Op::DelayMs(20), Op::DirHigh]);
    assert!(!motor.status());
    assert!(motor.is_clockwise());
}

#[test]
fn direction_line_levels() {
    let expectations = [
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::High),
    ];
    let mut motor = StepperDriver::new(
        SimulatedTimer::new(),
        PinMock::new(&expectations),
        NoopDelay::new(),
        DriverConfig::default(),
    )
    .unwrap();

    motor.set_counter_clockwise().unwrap();
    motor.set_clockwise().unwrap();
    // Re-asserted even when unchanged
    motor.set_clockwise().unwrap();

    let (_, mut pin, _) = motor.release();
    pin.done();
}

struct BrokenPin;

impl ErrorType for BrokenPin {
    type Error = ErrorKind;
}

impl OutputPin for BrokenPin {
    fn set_low(&mut self) -> Result<(), ErrorKind> {
        Err(ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), ErrorKind> {
        Err(ErrorKind::Other)
    }
}

#[test]
fn direction_pin_failure_is_reported_after_disable() {
    let mut motor = StepperDriver::new(
        SimulatedTimer::new(),
        BrokenPin,
        NoopDelay::new(),
        DriverConfig::default(),
    )
    .unwrap();
    motor.enable().unwrap();

    let result = motor.set_counter_clockwise();

    assert_eq!(result, Err(Error::Motor(MotorError::PinError)));
    // Pulses were already stopped and the direction was not recorded
    assert!(!motor.status());
    assert!(motor.is_clockwise());
    assert_eq!(motor.timer().mode(), TimerMode::Stopped);
}

// =============================================================================
// Speed tiers
// =============================================================================

#[test]
fn speed_tiers_report_raw_offsets() {
    let (mut motor, _log) = logged_driver(DriverConfig::default());

    motor.set_max_speed().unwrap();
    assert_eq!(motor.speed_offset(), MAX_SPEED_OFFSET);

    motor.set_min_speed().unwrap();
    assert_eq!(motor.speed_offset(), MIN_SPEED_OFFSET);

    motor.set_default_speed().unwrap();
    assert_eq!(motor.speed_offset(), 0);
}

#[test]
fn speed_change_reloads_period_only() {
    let (mut motor, log) = logged_driver(DriverConfig::default());
    motor.enable().unwrap();
    drain(&log);

    motor.set_max_speed().unwrap();
    motor.set_min_speed().unwrap();

    // No waveform mode change and no settle delay
    assert_eq!(drain(&log), vec![Op::TopCount(82), Op::TopCount(244)]);
    assert!(motor.status());
}

#[test]
fn next_enable_uses_selected_tier() {
    let (mut motor, log) = logged_driver(DriverConfig::default());
    motor.set_min_speed().unwrap();
    drain(&log);

    motor.enable().unwrap();

    assert_eq!(
        drain(&log),
        vec![Op::FreeRunning, Op::DelayMs(20), Op::Target(244)]
    );
}

// =============================================================================
// Timed moves
// =============================================================================

#[test]
fn tensile_pull_scenario() {
    let mut config = DriverConfig::default();
    config.pins.pulse = 3;
    config.pins.direction = 4;
    let (mut motor, log) = logged_driver(config);

    motor.set_clockwise().unwrap();
    motor.set_max_speed().unwrap();
    motor.move_distance(Length(1.04)).unwrap();

    assert_eq!(
        drain(&log),
        vec![
            Op::TopCount(124),
            // set_clockwise
            Op::Stop,
            Op::DelayMs(20),
            Op::DirHigh,
            // set_max_speed
            Op::TopCount(82),
            // move_distance: 1.04 / 0.52 s
            Op::FreeRunning,
            Op::DelayMs(20),
            Op::Target(82),
            Op::DelayMs(2000),
            Op::Stop,
            Op::DelayMs(20),
        ]
    );
    assert!(!motor.status());
    assert!(motor.is_clockwise());
}

#[test]
fn move_of_zero_still_pulses_through_ramp() {
    let (mut motor, log) = logged_driver(DriverConfig::default());
    drain(&log);

    motor.move_distance(Length(0.0)).unwrap();

    assert_eq!(
        drain(&log),
        vec![
            Op::FreeRunning,
            Op::DelayMs(20),
            Op::Target(124),
            Op::DelayMs(0),
            Op::Stop,
            Op::DelayMs(20),
        ]
    );
    assert!(!motor.status());
}

#[test]
fn move_duration_uses_single_rate_for_all_tiers() {
    let (mut motor, log) = logged_driver(DriverConfig::default());

    for tier in [SpeedTier::Min, SpeedTier::Default, SpeedTier::Max] {
        motor.set_speed_tier(tier).unwrap();
        drain(&log);

        motor.move_distance(Length(0.26)).unwrap();

        let ops = drain(&log);
        assert!(ops.contains(&Op::DelayMs(500)), "{:?}: {:?}", tier, ops);
    }
}

#[test]
fn invalid_distances_leave_hardware_untouched() {
    let (mut motor, log) = logged_driver(DriverConfig::default());
    drain(&log);

    for d in [-0.5, f64::NAN, f64::NEG_INFINITY, f64::INFINITY] {
        let result = motor.move_distance(Length(d));
        assert!(matches!(result, Err(Error::Motion(_))), "{}", d);
    }

    assert!(drain(&log).is_empty());
    assert!(!motor.status());
}

#[test]
fn move_from_enabled_ends_disabled() {
    let (mut motor, _log) = logged_driver(DriverConfig::default());
    motor.enable().unwrap();

    motor.move_distance(Length(0.1)).unwrap();

    assert!(!motor.status());
}

// =============================================================================
// Timer failures
// =============================================================================

#[derive(Debug)]
struct TimerFault;

#[derive(Default)]
struct FaultyTimer {
    fail_on_target: bool,
    fail_on_reload: Cell<bool>,
    mode: TimerMode,
    top_count: u8,
}

impl PwmTimer for FaultyTimer {
    type Error = TimerFault;

    fn load_top_count(&mut self, top: u8) -> Result<(), TimerFault> {
        if self.fail_on_reload.get() {
            return Err(TimerFault);
        }
        self.top_count = top;
        Ok(())
    }

    fn set_free_running_low_frequency(&mut self) -> Result<(), TimerFault> {
        self.mode = TimerMode::FreeRunning;
        Ok(())
    }

    fn set_target_frequency(&mut self, top: u8) -> Result<(), TimerFault> {
        if self.fail_on_target {
            return Err(TimerFault);
        }
        self.top_count = top;
        self.mode = TimerMode::Target;
        Ok(())
    }

    fn stop_output(&mut self) -> Result<(), TimerFault> {
        self.mode = TimerMode::Stopped;
        Ok(())
    }
}

#[test]
fn timer_failure_during_enable_stops_slow_start() {
    let mut motor = StepperDriver::new(
        FaultyTimer {
            fail_on_target: true,
            ..FaultyTimer::default()
        },
        PinMock::new(&[]),
        NoopDelay::new(),
        DriverConfig::default(),
    )
    .unwrap();

    assert_eq!(motor.enable(), Err(Error::Motor(MotorError::TimerError)));
    assert!(!motor.status());
    // No pulses left running behind a disabled status
    assert_eq!(motor.timer().mode, TimerMode::Stopped);

    let (_, mut pin, _) = motor.release();
    pin.done();
}

#[test]
fn failed_tier_reload_keeps_previous_tier() {
    let mut motor = StepperDriver::new(
        FaultyTimer::default(),
        PinMock::new(&[]),
        NoopDelay::new(),
        DriverConfig::default(),
    )
    .unwrap();
    motor.set_min_speed().unwrap();
    motor.timer().fail_on_reload.set(true);

    assert_eq!(
        motor.set_max_speed(),
        Err(Error::Motor(MotorError::TimerError))
    );
    // The reported tier still matches the period loaded in the timer
    assert_eq!(motor.speed_tier(), SpeedTier::Min);
    assert_eq!(motor.speed_offset(), MIN_SPEED_OFFSET);
    assert_eq!(motor.timer().top_count, motor.top_count());

    let (_, mut pin, _) = motor.release();
    pin.done();
}

// =============================================================================
// ATmega Timer2 backend under the driver
// =============================================================================

#[derive(Default)]
struct Registers {
    tccr2a: u8,
    tccr2b: u8,
    ocr2a: u8,
    ocr2b: u8,
}

impl Timer2Registers for Registers {
    fn write_tccr2a(&mut self, value: u8) {
        self.tccr2a = value;
    }
    fn write_tccr2b(&mut self, value: u8) {
        self.tccr2b = value;
    }
    fn write_ocr2a(&mut self, value: u8) {
        self.ocr2a = value;
    }
    fn write_ocr2b(&mut self, value: u8) {
        self.ocr2b = value;
    }
}

struct NullPin;

impl ErrorType for NullPin {
    type Error = Infallible;
}

impl OutputPin for NullPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

#[test]
fn timer2_registers_follow_driver_state() {
    let config = DriverConfig::default();
    let timer = Timer2::from_config(Registers::default(), &config.timer).unwrap();
    let mut motor = StepperDriver::new(timer, NullPin, NoopDelay::new(), config).unwrap();

    motor.set_max_speed().unwrap();
    motor.enable().unwrap();

    let (timer, pin, delay) = motor.release();
    let regs = timer.free();
    assert_eq!(regs.ocr2a, 82);
    assert_eq!(regs.ocr2b, 50);
    assert_eq!(regs.tccr2a, 0x63);
    assert_eq!(regs.tccr2b, 0x0C);

    let mut motor = StepperDriver::new(
        Timer2::new(regs),
        pin,
        delay,
        DriverConfig::default(),
    )
    .unwrap();
    motor.disable().unwrap();

    let regs = motor.release().0.free();
    assert_eq!(regs.tccr2a, 0x01);
    // Re-initialization reloads the base period
    assert_eq!(regs.ocr2a, 124);
}

#[test]
fn timer2_from_config_matches_reported_frequency() {
    let mut config = DriverConfig::default();
    config.timer.prescaler = 1024;
    config.timer.duty_compare = 30;
    let timer = Timer2::from_config(Registers::default(), &config.timer).unwrap();
    let mut motor = StepperDriver::new(timer, NullPin, NoopDelay::new(), config).unwrap();

    motor.enable().unwrap();

    // 16 MHz / (1024 * 125)
    assert!((motor.output_frequency_hz() - 125.0).abs() < 0.01);
    let regs = motor.release().0.free();
    assert_eq!(regs.ocr2b, 30);
    // WGM22 with CS22 | CS21 | CS20
    assert_eq!(regs.tccr2b, 0x0F);
}

// =============================================================================
// Configuration file
// =============================================================================

#[test]
fn driver_from_config_file() {
    let path = std::env::temp_dir().join("tensile_stepper_driver_from_config_file.toml");
    std::fs::write(
        &path,
        r#"
[pins]
pulse = 11
direction = 12

[speed]
max_offset = -30

[motion]
start_stop_delay_ms = 10
travel_rate = 1.0
invert_direction = true
"#,
    )
    .unwrap();

    let config = tensile_stepper::load_config(&path).expect("config should load");
    std::fs::remove_file(&path).ok();

    let (mut motor, log) = logged_driver(config);
    drain(&log);

    motor.set_clockwise().unwrap();
    motor.set_max_speed().unwrap();
    motor.move_distance(Length(0.5)).unwrap();

    assert_eq!(motor.pins().pulse, 11);
    assert_eq!(
        drain(&log),
        vec![
            Op::Stop,
            Op::DelayMs(10),
            // Inverted polarity
            Op::DirLow,
            Op::TopCount(94),
            Op::FreeRunning,
            Op::DelayMs(10),
            Op::Target(94),
            Op::DelayMs(500),
            Op::Stop,
            Op::DelayMs(10),
        ]
    );
}
