//! Gate state machine.
//!
//! One owned aggregate holds every field the submachines touch; each
//! phase is a step method and every actuator write and console line is
//! a phase-entry effect, so nothing prints twice. The submachine steps
//! live in sibling modules ([`init`], [`lower`], [`raise`]); the
//! DownHold phase and the occupancy preemption policy live here.
//!
//! Dispatch convention: delay phases are pure waits; the phase that
//! precedes a wait performs the entry actions as it hands over. Action
//! phases are dispatched exactly once and advance immediately.

mod init;
mod lower;
mod raise;

use crossgate_common::consts::{BLINK_PERIOD_MS, DOWN_HOLD_MAX_MS, DUTY_LIMIT_MS,
    MOTOR_RUN_ABORT_RAISE_MS};
use crossgate_common::hal::GateDriver;
use crossgate_common::io::OutputId;
use crossgate_common::state::{GatePosition, LowerPhase, MovementState, RaisePhase,
    SensorReading, TrackState};
use crossgate_hal::blink::{BlinkId, BlinkScheduler};
use crossgate_hal::levels::{GateIoExt, LIGHT_OFF, LIGHT_ON};
use tracing::info;

use crate::duty::DutyGovernor;
use crate::error::ControlError;

/// Ticks between "time remaining" lines while the gate is held down.
const HOLD_LOG_INTERVAL: u64 = 5;

/// Everything the gate state machine owns.
///
/// Phase waits are anchored timestamps compared against `now` on later
/// ticks; a phase change overwrites the anchor, which is all the
/// cancellation this machine needs.
#[derive(Debug)]
pub struct GateController {
    movement: MovementState,
    position: GatePosition,
    track: TrackState,
    /// Anchor of the currently-delaying phase.
    phase_anchor: u64,
    /// Motor window chosen at `Lower(MotorOn)` entry.
    lower_run_ms: u64,
    /// Motor window for the raise leg; the abort path preloads it.
    raise_run_ms: u64,
    /// Wall-clock base of the hold-down timer.
    hold_anchor: u64,
    duty_exceeded: bool,
    blinkers: Option<(BlinkId, BlinkId)>,
    hold_ticks: u64,
}

impl GateController {
    pub fn new() -> Self {
        Self {
            movement: MovementState::BOOT,
            position: GatePosition::Up,
            track: TrackState::Initializing,
            phase_anchor: 0,
            lower_run_ms: 0,
            raise_run_ms: 0,
            hold_anchor: 0,
            duty_exceeded: false,
            blinkers: None,
            hold_ticks: 0,
        }
    }

    #[inline]
    pub const fn movement(&self) -> MovementState {
        self.movement
    }

    #[inline]
    pub const fn position(&self) -> GatePosition {
        self.position
    }

    #[inline]
    pub const fn track(&self) -> TrackState {
        self.track
    }

    #[inline]
    pub const fn duty_exceeded(&self) -> bool {
        self.duty_exceeded
    }

    #[inline]
    pub const fn blinkers_live(&self) -> bool {
        self.blinkers.is_some()
    }

    // ─── Occupancy / Preemption Policy ──────────────────────────────

    /// Applied every tick, after the debouncer and before the phase
    /// step.
    ///
    /// A reported occupancy always refreshes the hold anchor. If the
    /// machine believed the track vacant and the arm is in its rising
    /// motor window, the raise is halted on the spot and a fresh
    /// lowering cycle begins — sacrificing duty protection for
    /// grade-crossing safety.
    pub fn apply_occupancy(
        &mut self,
        reading: SensorReading,
        now: u64,
        driver: &mut dyn GateDriver,
        blink: &mut BlinkScheduler,
        duty: &mut DutyGovernor,
    ) {
        if !reading.is_occupied() {
            return;
        }

        self.hold_anchor = now;

        if self.track != TrackState::Vacant {
            return;
        }
        self.track = TrackState::Occupied;

        if self.position == GatePosition::Down && self.movement.is_raising() {
            if duty.accumulator_ms() > DUTY_LIMIT_MS && !self.duty_exceeded {
                duty.reset_accumulator();
                info!("RESET -- Motor Running Accumulator");
            }
            // Halt the arm mid-travel, then start over from the top.
            // GatePosition goes optimistically Up: the arm is somewhere
            // mid-travel, and the fresh lowering cycle drives it down
            // regardless.
            self.enter_raise_motor_off(now, driver, blink, duty);
            self.position = GatePosition::Up;
            self.movement = MovementState::Lower(LowerPhase::LightsAndBells);
            self.phase_anchor = 0;
            self.lower_run_ms = 0;
            self.raise_run_ms = 0;
            self.hold_anchor = now;
        }
    }

    // ─── Dispatch ───────────────────────────────────────────────────

    /// Run the current phase's step. At most one phase transition per
    /// call.
    pub fn step(
        &mut self,
        now: u64,
        driver: &mut dyn GateDriver,
        blink: &mut BlinkScheduler,
        duty: &mut DutyGovernor,
    ) -> Result<(), ControlError> {
        match self.movement {
            MovementState::Init(phase) => self.step_init(phase, now, driver, blink, duty),
            MovementState::Lower(phase) => self.step_lower(phase, now, driver, blink, duty),
            MovementState::DownHold => {
                self.step_down_hold(now);
                Ok(())
            }
            MovementState::Raise(phase) => {
                self.step_raise(phase, now, driver, blink, duty);
                Ok(())
            }
            MovementState::UpIdle => {
                self.step_up_idle();
                Ok(())
            }
        }
    }

    fn step_up_idle(&mut self) {
        if self.track == TrackState::Occupied && self.position == GatePosition::Up {
            self.movement = MovementState::Lower(LowerPhase::LightsAndBells);
        }
    }

    fn step_down_hold(&mut self, now: u64) {
        if self.duty_exceeded {
            // The arm never moved. Keep the warning indicators up for a
            // while so the display still tells its story, then tear
            // down without a powered raise.
            self.track = TrackState::Vacant;
            self.raise_run_ms = MOTOR_RUN_ABORT_RAISE_MS;
            self.phase_anchor = now;
            self.hold_ticks = 0;
            self.movement = MovementState::Raise(RaisePhase::MotorOnDelay);
            return;
        }

        let elapsed = now.wrapping_sub(self.hold_anchor);
        if elapsed >= DOWN_HOLD_MAX_MS {
            self.track = TrackState::Vacant;
            self.hold_ticks = 0;
            self.movement = MovementState::Raise(RaisePhase::Debounce);
            return;
        }

        if self.hold_ticks % HOLD_LOG_INTERVAL == 0 {
            info!(
                "Time Remaining Before Gate Lift: {} ms",
                DOWN_HOLD_MAX_MS - elapsed
            );
        }
        self.hold_ticks += 1;
    }

    // ─── Blinker Pair ───────────────────────────────────────────────

    /// Start the two warning lights in anti-phase. The pair is atomic:
    /// if the second slot cannot be allocated the first is stopped
    /// before the error propagates.
    fn start_blinkers(
        &mut self,
        now: u64,
        driver: &mut dyn GateDriver,
        blink: &mut BlinkScheduler,
    ) -> Result<(), ControlError> {
        if self.blinkers.is_some() {
            return Ok(());
        }

        let right = blink.start(
            driver,
            OutputId::LightsRight,
            BLINK_PERIOD_MS,
            LIGHT_OFF,
            None,
            now,
        )?;
        let left = match blink.start(
            driver,
            OutputId::LightsLeft,
            BLINK_PERIOD_MS,
            LIGHT_ON,
            None,
            now,
        ) {
            Ok(id) => id,
            Err(e) => {
                blink.stop(right);
                return Err(e.into());
            }
        };

        self.blinkers = Some((left, right));
        Ok(())
    }

    /// Stop the blinker pair and force both lights dark.
    fn stop_blinkers(&mut self, driver: &mut dyn GateDriver, blink: &mut BlinkScheduler) {
        if let Some((left, right)) = self.blinkers.take() {
            blink.stop(left);
            blink.stop(right);
        }
        driver.set_lights_off();
    }
}

impl Default for GateController {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
