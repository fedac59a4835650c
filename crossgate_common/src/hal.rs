//! Hardware driver trait and error type.
//!
//! The controller talks to hardware through `GateDriver`, enabling
//! pluggable backends (the simulation driver for development and tests,
//! a GPIO driver on the real installation). Drivers deal in raw
//! electrical levels; the symbolic encoding lives in `crossgate_hal`.

use crate::io::{InputId, OutputId};
use thiserror::Error;

/// Error type for driver operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Driver initialization failed
    #[error("initialization failed: {0}")]
    InitFailed(String),

    /// Hardware access error
    #[error("hardware access error: {0}")]
    Io(String),

    /// Graceful shutdown failed
    #[error("shutdown failed: {0}")]
    ShutdownFailed(String),
}

/// Interface for gate hardware backends.
///
/// # Lifecycle
///
/// 1. `init()` - called once before the control loop starts
/// 2. `write()` / `read()` - called from within the loop every cycle
/// 3. `shutdown()` - called when the controller stops; must leave every
///    output at its inactive level
///
/// In-loop pin access is infallible: backends surface failures at
/// `init()` / `shutdown()`, never mid-cycle.
pub trait GateDriver: Send {
    /// Driver identifier (e.g. "sim", "gpio").
    fn name(&self) -> &'static str;

    /// Prepare the hardware.
    fn init(&mut self) -> Result<(), HalError>;

    /// Drive an output to a raw electrical level.
    fn write(&mut self, output: OutputId, level: bool);

    /// Read the raw electrical level of an input.
    fn read(&mut self, input: InputId) -> bool;

    /// Park the hardware in a safe state and release it.
    fn shutdown(&mut self) -> Result<(), HalError>;
}
