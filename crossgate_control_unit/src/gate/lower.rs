//! Lowering sequence.
//!
//! Indicators lead the motor by the bell-lead window so bystanders get
//! their warning before the arm moves. The governor is consulted once,
//! at `MotorOn` entry; a veto runs the same phase sequence with the
//! motor dark and an abbreviated window.

use crossgate_common::consts::{BELL_LEAD_MS, MOTOR_RUN_ABBREV_MS, MOTOR_RUN_NOMINAL_MS};
use crossgate_common::hal::GateDriver;
use crossgate_common::state::{ArmDirection, GatePosition, LowerPhase, MovementState};
use crossgate_hal::blink::BlinkScheduler;
use crossgate_hal::levels::GateIoExt;
use tracing::info;

use super::GateController;
use crate::duty::DutyGovernor;
use crate::error::ControlError;

impl GateController {
    pub(super) fn step_lower(
        &mut self,
        phase: LowerPhase,
        now: u64,
        driver: &mut dyn GateDriver,
        blink: &mut BlinkScheduler,
        duty: &mut DutyGovernor,
    ) -> Result<(), ControlError> {
        match phase {
            LowerPhase::LightsAndBells => {
                // Blinkers may already be live when a preempted cycle
                // re-enters here.
                self.start_blinkers(now, driver, blink)?;
                driver.set_bell(true);
                info!("Lights & Bells: On");
                // Preposition the direction relay now; power comes
                // after the bell lead.
                driver.set_motor_direction(ArmDirection::Down);
                info!("Motor Direction: Down");
                self.phase_anchor = now;
                self.movement = MovementState::Lower(LowerPhase::LightsAndBellsDelay);
            }

            LowerPhase::LightsAndBellsDelay => {
                if now.wrapping_sub(self.phase_anchor) >= BELL_LEAD_MS {
                    self.movement = MovementState::Lower(LowerPhase::MotorOn);
                }
            }

            LowerPhase::MotorOn => {
                if duty.may_energize() {
                    driver.set_motor_direction(ArmDirection::Down);
                    driver.set_motor_power(true);
                    duty.note_motor_on(now);
                    self.duty_exceeded = false;
                    self.lower_run_ms = MOTOR_RUN_NOMINAL_MS;
                    info!("Motor: On");
                } else {
                    if !self.duty_exceeded {
                        info!(
                            "Motor Max Duty Cycle, Ignoring Motor On Cmd: {}",
                            duty.accumulator_ms()
                        );
                    }
                    self.duty_exceeded = true;
                    self.lower_run_ms = MOTOR_RUN_ABBREV_MS;
                }
                self.phase_anchor = now;
                self.movement = MovementState::Lower(LowerPhase::MotorOnDelay);
            }

            LowerPhase::MotorOnDelay => {
                if now.wrapping_sub(self.phase_anchor) >= self.lower_run_ms {
                    self.movement = MovementState::Lower(LowerPhase::MotorOff);
                }
            }

            LowerPhase::MotorOff => {
                driver.set_motor_power(false);
                driver.set_motor_direction(ArmDirection::Down);
                duty.note_motor_off(now, !self.duty_exceeded);
                self.position = GatePosition::Down;
                self.hold_anchor = now;
                self.hold_ticks = 0;
                info!("Motor: Off");
                info!("Gate is Down");
                self.movement = MovementState::DownHold;
            }
        }
        Ok(())
    }
}
