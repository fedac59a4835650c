//! # Crossgate Control Unit
//!
//! The closed-loop plant of the crossing gate: debounced track sensing,
//! the motor duty-cycle governor, the composite gate state machine, and
//! the deterministic cycle runner that drives them all on a single
//! cooperative loop.

pub mod cycle;
pub mod debounce;
pub mod duty;
pub mod error;
pub mod gate;
