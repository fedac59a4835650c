//! Crossgate HAL
//!
//! Everything that touches a raw pin level lives here: the millisecond
//! clock abstraction, the symbolic-to-electrical level bindings, the
//! warning-light blink scheduler, and the simulation driver used by the
//! development binary and the scenario tests.

pub mod blink;
pub mod clock;
pub mod levels;
pub mod sim;

pub use blink::{BlinkError, BlinkId, BlinkScheduler};
pub use clock::{Clock, MonotonicClock, SimClock};
pub use sim::SimDriver;
