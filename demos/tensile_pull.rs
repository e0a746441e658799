//! Tensile pull example.
//!
//! Loads the rig configuration, pulls the crosshead 1.04 in at the Max tier,
//! then returns it at the Min tier.
//!
//! This example uses a simulated timer, so no hardware is needed.

use tensile_stepper::timer::sim::SimulatedTimer;
use tensile_stepper::{parse_config, Length, StepperDriver};

/// Delay provider backed by the host clock.
struct HostDelay;

impl embedded_hal::delay::DelayNs for HostDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}

/// Direction line that prints its level.
struct ConsolePin;

impl embedded_hal::digital::ErrorType for ConsolePin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for ConsolePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        println!("  DIR <- low");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        println!("  DIR <- high");
        Ok(())
    }
}

fn main() -> Result<(), tensile_stepper::Error> {
    println!("=== Tensile Pull Example ===\n");

    let config = parse_config(include_str!("tensile_rig.toml"))?;

    let mut motor = StepperDriver::builder()
        .from_config(&config)
        .timer(SimulatedTimer::new())
        .direction_pin(ConsolePin)
        .delay(HostDelay)
        .build()?;

    println!(
        "Pins: pulse {}, direction {}",
        motor.pins().pulse,
        motor.pins().direction
    );
    println!("State: {}\n", motor.state().name());

    let pull = Length(1.04);

    println!("Pull:");
    motor.set_clockwise()?;
    motor.set_max_speed()?;
    println!(
        "  {:.0} Hz for {} ms",
        motor.output_frequency_hz(),
        motor.move_duration(pull).0
    );
    motor.move_distance(pull)?;
    println!("  enabled after move: {}\n", motor.status());

    println!("Return:");
    motor.set_counter_clockwise()?;
    motor.set_min_speed()?;
    println!(
        "  {:.0} Hz for {} ms (same rate constant for every tier)",
        motor.output_frequency_hz(),
        motor.move_duration(pull).0
    );
    motor.move_distance(pull)?;

    println!("\nTimer events:");
    for event in motor.timer().events() {
        println!("  {:?}", event);
    }

    Ok(())
}
