//! Control-unit error type.
//!
//! Anything that surfaces here aborts the control loop; the binary logs
//! it and parks the hardware in its safe state.

use crossgate_common::hal::HalError;
use crossgate_hal::blink::BlinkError;
use thiserror::Error;

/// Errors that abort the control loop.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Blink scheduler ran out of slots — initialization cannot proceed.
    #[error("blink scheduler: {0}")]
    Blink(#[from] BlinkError),

    /// Driver lifecycle failure.
    #[error("hal: {0}")]
    Hal(#[from] HalError),

    /// RT setup system call failed.
    #[error("rt setup: {0}")]
    RtSetup(String),
}
