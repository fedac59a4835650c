//! Boot-time raise.
//!
//! Power-up leaves the arm wherever the last shutdown dropped it, so
//! every boot drives a full raise before the controller trusts
//! `GatePosition`. The indicators run through the whole sequence, same
//! as any other arm movement.

use crossgate_common::consts::{DIR_DELAY_MS, INIT_RAISE_MS};
use crossgate_common::hal::GateDriver;
use crossgate_common::state::{ArmDirection, GatePosition, InitPhase, MovementState, TrackState};
use crossgate_hal::blink::BlinkScheduler;
use crossgate_hal::levels::GateIoExt;
use tracing::info;

use super::GateController;
use crate::duty::DutyGovernor;
use crate::error::ControlError;

impl GateController {
    pub(super) fn step_init(
        &mut self,
        phase: InitPhase,
        now: u64,
        driver: &mut dyn GateDriver,
        blink: &mut BlinkScheduler,
        duty: &mut DutyGovernor,
    ) -> Result<(), ControlError> {
        match phase {
            InitPhase::LightsBellsDirection => {
                self.start_blinkers(now, driver, blink)?;
                driver.set_bell(true);
                // Direction first; power only after the relay settles.
                driver.set_motor_direction(ArmDirection::Up);
                self.phase_anchor = now;
                self.movement = MovementState::Init(InitPhase::MotorDirectionDelay);
            }

            InitPhase::MotorDirectionDelay => {
                if now.wrapping_sub(self.phase_anchor) >= DIR_DELAY_MS {
                    // The boot raise has no separate on-delay phase:
                    // power the motor as the delay hands over and let
                    // MotorOn hold the window.
                    driver.set_motor_power(true);
                    duty.note_motor_on(now);
                    self.phase_anchor = now;
                    self.movement = MovementState::Init(InitPhase::MotorOn);
                }
            }

            InitPhase::MotorOn => {
                if now.wrapping_sub(self.phase_anchor) >= INIT_RAISE_MS {
                    self.movement = MovementState::Init(InitPhase::MotorOff);
                }
            }

            InitPhase::MotorOff => {
                self.stop_blinkers(driver, blink);
                driver.set_bell(false);
                driver.set_motor_direction(ArmDirection::Down);
                driver.set_motor_power(false);
                duty.note_motor_off(now, true);
                self.position = GatePosition::Up;
                self.track = TrackState::Vacant;
                info!("Gate Is Up");
                self.movement = MovementState::UpIdle;
            }
        }
        Ok(())
    }
}
