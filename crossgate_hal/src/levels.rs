//! Electrical level bindings.
//!
//! The only module that knows which raw level means "on" for each
//! output. The bell and the crossing lights are switched through
//! active-low relay inputs; the motor relays and the status LED are
//! active-high; the track sensor reads high when occupied (wiring
//! dependent, fixed at compile time).

use crossgate_common::hal::GateDriver;
use crossgate_common::io::{InputId, OutputId};
use crossgate_common::state::ArmDirection;

/// Raw level that rings the warning bell (active-low relay).
pub const BELL_ON: bool = false;
pub const BELL_OFF: bool = true;

/// Raw level that lights a crossing light (active-low relay).
pub const LIGHT_ON: bool = false;
pub const LIGHT_OFF: bool = true;

/// Raw level selecting upward arm travel.
pub const DIRECTION_UP: bool = true;
pub const DIRECTION_DOWN: bool = false;

/// Raw level energizing the arm motor.
pub const MOTOR_ON: bool = true;
pub const MOTOR_OFF: bool = false;

/// Raw level lighting the status LED.
pub const STATUS_LED_ON: bool = true;
pub const STATUS_LED_OFF: bool = false;

/// Raw sensor level meaning "track occupied".
pub const SENSOR_OCCUPIED_LEVEL: bool = true;

/// Inactive (safe) raw level for an output.
///
/// A driver's `shutdown()` parks every output here; the motor direction
/// relay idles pointing down.
pub const fn inactive_level(output: OutputId) -> bool {
    match output {
        OutputId::BellControl => BELL_OFF,
        OutputId::LightsLeft | OutputId::LightsRight => LIGHT_OFF,
        OutputId::MotorDirection => DIRECTION_DOWN,
        OutputId::MotorPower => MOTOR_OFF,
        OutputId::StatusLed => STATUS_LED_OFF,
    }
}

/// Symbolic setters over a raw driver.
///
/// Blanket-implemented for every `GateDriver`, so the control unit
/// never handles raw levels directly.
pub trait GateIoExt: GateDriver {
    fn set_bell(&mut self, on: bool) {
        self.write(OutputId::BellControl, if on { BELL_ON } else { BELL_OFF });
    }

    /// Force both crossing lights dark. Used after the blinkers stop;
    /// whichever half-phase they were left in, the lights must end off.
    fn set_lights_off(&mut self) {
        self.write(OutputId::LightsLeft, LIGHT_OFF);
        self.write(OutputId::LightsRight, LIGHT_OFF);
    }

    fn set_motor_direction(&mut self, direction: ArmDirection) {
        let level = match direction {
            ArmDirection::Up => DIRECTION_UP,
            ArmDirection::Down => DIRECTION_DOWN,
        };
        self.write(OutputId::MotorDirection, level);
    }

    fn set_motor_power(&mut self, on: bool) {
        self.write(OutputId::MotorPower, if on { MOTOR_ON } else { MOTOR_OFF });
    }

    fn set_status_led(&mut self, on: bool) {
        self.write(
            OutputId::StatusLed,
            if on { STATUS_LED_ON } else { STATUS_LED_OFF },
        );
    }

    /// Symbolic occupancy reading, polarity applied.
    fn track_occupied(&mut self) -> bool {
        self.read(InputId::TrackSensor) == SENSOR_OCCUPIED_LEVEL
    }
}

impl<D: GateDriver + ?Sized> GateIoExt for D {}
