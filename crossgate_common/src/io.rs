//! Logical I/O points.
//!
//! Outputs and inputs are addressed by function, not by pin number.
//! The binding of a function to an electrical level lives in
//! `crossgate_hal`; pin numbering is a concern of the physical driver.

use core::fmt;

/// Actuator output points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OutputId {
    /// Warning bell relay.
    BellControl = 0,
    /// Left crossing light.
    LightsLeft = 1,
    /// Right crossing light.
    LightsRight = 2,
    /// Arm motor direction relay.
    MotorDirection = 3,
    /// Arm motor power relay.
    MotorPower = 4,
    /// Track-sensor status LED.
    StatusLed = 5,
}

/// Number of actuator outputs.
pub const OUTPUT_COUNT: usize = 6;

impl OutputId {
    /// All outputs, in table order.
    pub const ALL: [Self; OUTPUT_COUNT] = [
        Self::BellControl,
        Self::LightsLeft,
        Self::LightsRight,
        Self::MotorDirection,
        Self::MotorPower,
        Self::StatusLed,
    ];

    /// Stable index for per-output tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BellControl => write!(f, "BellControl"),
            Self::LightsLeft => write!(f, "LightsLeft"),
            Self::LightsRight => write!(f, "LightsRight"),
            Self::MotorDirection => write!(f, "MotorDirection"),
            Self::MotorPower => write!(f, "MotorPower"),
            Self::StatusLed => write!(f, "StatusLed"),
        }
    }
}

/// Sensor input points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InputId {
    /// Track-occupancy sensor.
    TrackSensor = 0,
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TrackSensor => write!(f, "TrackSensor"),
        }
    }
}
