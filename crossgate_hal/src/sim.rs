//! Simulation driver.
//!
//! Latches the last written level per output and exposes a scriptable
//! sensor level. Stands in for the GPIO backend in the development
//! binary and drives all scenario tests.

use crate::levels;
use crossgate_common::hal::{GateDriver, HalError};
use crossgate_common::io::{InputId, OutputId, OUTPUT_COUNT};
use tracing::debug;

/// In-memory gate hardware.
#[derive(Debug, Clone)]
pub struct SimDriver {
    outputs: [bool; OUTPUT_COUNT],
    sensor_level: bool,
}

impl SimDriver {
    pub fn new() -> Self {
        let mut outputs = [false; OUTPUT_COUNT];
        for id in OutputId::ALL {
            outputs[id.index()] = levels::inactive_level(id);
        }
        Self {
            outputs,
            sensor_level: !levels::SENSOR_OCCUPIED_LEVEL,
        }
    }

    /// Script the raw track-sensor level.
    pub fn set_sensor_level(&mut self, level: bool) {
        self.sensor_level = level;
    }

    /// Script track occupancy symbolically.
    pub fn set_track_occupied(&mut self, occupied: bool) {
        self.sensor_level = if occupied {
            levels::SENSOR_OCCUPIED_LEVEL
        } else {
            !levels::SENSOR_OCCUPIED_LEVEL
        };
    }

    /// Last raw level written to an output.
    pub fn level(&self, output: OutputId) -> bool {
        self.outputs[output.index()]
    }

    // ── Symbolic queries for assertions ──

    pub fn bell_on(&self) -> bool {
        self.level(OutputId::BellControl) == levels::BELL_ON
    }

    pub fn light_on(&self, output: OutputId) -> bool {
        debug_assert!(matches!(
            output,
            OutputId::LightsLeft | OutputId::LightsRight
        ));
        self.level(output) == levels::LIGHT_ON
    }

    pub fn motor_on(&self) -> bool {
        self.level(OutputId::MotorPower) == levels::MOTOR_ON
    }

    pub fn direction_up(&self) -> bool {
        self.level(OutputId::MotorDirection) == levels::DIRECTION_UP
    }

    pub fn status_led_on(&self) -> bool {
        self.level(OutputId::StatusLed) == levels::STATUS_LED_ON
    }
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl GateDriver for SimDriver {
    fn name(&self) -> &'static str {
        "sim"
    }

    fn init(&mut self) -> Result<(), HalError> {
        debug!("sim driver ready");
        Ok(())
    }

    fn write(&mut self, output: OutputId, level: bool) {
        self.outputs[output.index()] = level;
    }

    fn read(&mut self, input: InputId) -> bool {
        match input {
            InputId::TrackSensor => self.sensor_level,
        }
    }

    fn shutdown(&mut self) -> Result<(), HalError> {
        for id in OutputId::ALL {
            self.outputs[id.index()] = levels::inactive_level(id);
        }
        Ok(())
    }
}
