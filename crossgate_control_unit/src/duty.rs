//! Motor duty-cycle governor.
//!
//! Accumulates effective motor-on time and drains it at one tenth of
//! idle wall time, modeling a 10% duty limit without a thermal sensor:
//! a ten-second run is paid back by a hundred seconds of idle. A
//! lowering cycle consults the governor before energizing the motor;
//! raising paths do not — the gate must come up.

use crossgate_common::consts::{DUTY_DECAY_DENOM, DUTY_DECAY_NUMER, DUTY_LIMIT_MS};
use tracing::info;

/// Drain ticks between cooling announcements.
const COOLING_LOG_INTERVAL: u64 = 5;

/// Duty-cycle accumulator and verdict.
#[derive(Debug, Clone)]
pub struct DutyGovernor {
    /// Effective motor-on milliseconds after decay.
    accumulator_ms: u64,
    motor_running: bool,
    prev_tick_ms: u64,
    /// Start of the current burst; valid while `motor_running`.
    burst_start_ms: u64,
    /// Sub-denominator idle remainder, so fast ticks still drain.
    decay_carry: u64,
    drain_ticks: u64,
}

impl DutyGovernor {
    pub const fn new(now_ms: u64) -> Self {
        Self {
            accumulator_ms: 0,
            motor_running: false,
            prev_tick_ms: now_ms,
            burst_start_ms: 0,
            decay_carry: 0,
            drain_ticks: 0,
        }
    }

    #[inline]
    pub const fn accumulator_ms(&self) -> u64 {
        self.accumulator_ms
    }

    #[inline]
    pub const fn motor_running(&self) -> bool {
        self.motor_running
    }

    /// Whether a lowering cycle may energize the motor.
    #[inline]
    pub const fn may_energize(&self) -> bool {
        self.accumulator_ms < DUTY_LIMIT_MS
    }

    /// Record the start of a motor-on burst.
    pub fn note_motor_on(&mut self, now_ms: u64) {
        self.motor_running = true;
        self.burst_start_ms = now_ms;
    }

    /// Record the end of a burst. `credited` is false when the burst
    /// never actually energized the motor; nothing accumulates then,
    /// and nothing accumulates if no burst was running.
    pub fn note_motor_off(&mut self, now_ms: u64, credited: bool) {
        if self.motor_running && credited {
            self.accumulator_ms += now_ms.wrapping_sub(self.burst_start_ms);
        }
        self.motor_running = false;
    }

    /// Force the accumulator to zero. Reserved for the raise-preemption
    /// path, where grade-crossing safety outranks motor protection.
    pub fn reset_accumulator(&mut self) {
        self.accumulator_ms = 0;
        self.decay_carry = 0;
    }

    /// Idle decay. Called unconditionally every loop iteration; drains
    /// nothing while a burst is running.
    pub fn tick(&mut self, now_ms: u64) {
        let dt = now_ms.wrapping_sub(self.prev_tick_ms);
        self.prev_tick_ms = now_ms;

        if self.motor_running || self.accumulator_ms == 0 {
            return;
        }

        self.decay_carry += dt * DUTY_DECAY_NUMER;
        let drained = self.decay_carry / DUTY_DECAY_DENOM;
        self.decay_carry %= DUTY_DECAY_DENOM;

        if drained > 0 {
            self.accumulator_ms = self.accumulator_ms.saturating_sub(drained);
            if self.drain_ticks % COOLING_LOG_INTERVAL == 0 {
                info!("Motor Cooling Down, Remaining: {} ms", self.accumulator_ms);
            }
            self.drain_ticks += 1;
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
