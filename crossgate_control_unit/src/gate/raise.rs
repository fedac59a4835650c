//! Raising sequence.
//!
//! Entered from a DownHold exit, or short-circuited into `MotorOnDelay`
//! by the duty-abort path. The governor is deliberately not consulted
//! here: once the hold is over the gate must come up.

use crossgate_common::consts::{DIR_DELAY_MS, MOTOR_RUN_NOMINAL_MS};
use crossgate_common::hal::GateDriver;
use crossgate_common::state::{ArmDirection, GatePosition, MovementState, RaisePhase};
use crossgate_hal::blink::BlinkScheduler;
use crossgate_hal::levels::GateIoExt;
use tracing::info;

use super::GateController;
use crate::duty::DutyGovernor;

impl GateController {
    pub(super) fn step_raise(
        &mut self,
        phase: RaisePhase,
        now: u64,
        driver: &mut dyn GateDriver,
        blink: &mut BlinkScheduler,
        duty: &mut DutyGovernor,
    ) {
        match phase {
            // One-tick no-op kept for symmetry with the old two-reading
            // sensor confirmation.
            RaisePhase::Debounce => {
                info!("Track is Vacant");
                self.movement = MovementState::Raise(RaisePhase::MotorDirection);
            }

            RaisePhase::MotorDirection => {
                driver.set_motor_direction(ArmDirection::Up);
                info!("Motor Direction: Up");
                self.phase_anchor = now;
                self.movement = MovementState::Raise(RaisePhase::MotorDirectionDelay);
            }

            RaisePhase::MotorDirectionDelay => {
                if now.wrapping_sub(self.phase_anchor) >= DIR_DELAY_MS {
                    self.movement = MovementState::Raise(RaisePhase::MotorOn);
                }
            }

            RaisePhase::MotorOn => {
                driver.set_motor_direction(ArmDirection::Up);
                driver.set_motor_power(true);
                duty.note_motor_on(now);
                info!("Motor: On");
                self.raise_run_ms = MOTOR_RUN_NOMINAL_MS;
                self.phase_anchor = now;
                self.movement = MovementState::Raise(RaisePhase::MotorOnDelay);
            }

            RaisePhase::MotorOnDelay => {
                if now.wrapping_sub(self.phase_anchor) >= self.raise_run_ms {
                    self.movement = MovementState::Raise(RaisePhase::MotorOff);
                }
            }

            RaisePhase::MotorOff => {
                self.enter_raise_motor_off(now, driver, blink, duty);
                self.movement = MovementState::UpIdle;
            }
        }
    }

    /// Terminal raise actions. Also invoked directly by the preemption
    /// policy to halt a rising arm mid-travel.
    ///
    /// Always clears the per-cycle duty flag; the teardown itself only
    /// runs when the gate has actually been down this cycle.
    pub(super) fn enter_raise_motor_off(
        &mut self,
        now: u64,
        driver: &mut dyn GateDriver,
        blink: &mut BlinkScheduler,
        duty: &mut DutyGovernor,
    ) {
        if self.position == GatePosition::Down {
            self.stop_blinkers(driver, blink);
            driver.set_bell(false);
            driver.set_motor_direction(ArmDirection::Down);
            driver.set_motor_power(false);
            info!("Motor: Off");
            info!("Bell/Lights: Off");
            info!("Gate is Up");

            if !self.duty_exceeded {
                duty.note_motor_off(now, true);
                info!("Total Motor Run Time: {} ms", duty.accumulator_ms());
            }
        }

        self.position = GatePosition::Up;
        self.duty_exceeded = false;
    }
}
