//! Shared scenario harness.
//!
//! A cycle runner on the simulation clock and driver, stepped in 5 ms
//! ticks. Every tick re-checks the machine-wide invariants: motor power
//! only inside a motor window, blinkers live exactly over the lit
//! window, the duty accumulator never shrinking while a burst runs, and
//! the duty flag scoped to an active cycle.

use crossgate_common::consts::CYCLE_TIME_MS;
use crossgate_common::state::{GatePosition, InitPhase, LowerPhase, MovementState, TrackState};
use crossgate_control_unit::cycle::CycleRunner;
use crossgate_hal::{SimClock, SimDriver};

pub struct TestBench {
    pub runner: CycleRunner<SimClock, SimDriver>,
    last_acc: u64,
}

impl TestBench {
    pub fn new() -> Self {
        Self {
            runner: CycleRunner::new(SimClock::new(), SimDriver::new()).expect("runner init"),
            last_acc: 0,
        }
    }

    pub fn now(&self) -> u64 {
        use crossgate_hal::Clock;
        self.runner.clock().now_ms()
    }

    /// Advance one cycle and re-check the invariants.
    pub fn tick(&mut self) {
        self.runner.clock().advance(CYCLE_TIME_MS);
        self.runner.cycle_body().expect("cycle body");
        self.assert_invariants();
        self.last_acc = self.runner.duty().accumulator_ms();
    }

    /// Run until the given absolute sim time.
    pub fn run_until(&mut self, t_ms: u64) {
        while self.now() < t_ms {
            self.tick();
        }
    }

    /// Script track occupancy.
    pub fn occupy(&mut self, occupied: bool) {
        self.runner.driver_mut().set_track_occupied(occupied);
    }

    // ── Shorthand queries ──

    pub fn movement(&self) -> MovementState {
        self.runner.gate().movement()
    }

    pub fn position(&self) -> GatePosition {
        self.runner.gate().position()
    }

    pub fn track(&self) -> TrackState {
        self.runner.gate().track()
    }

    pub fn motor_on(&self) -> bool {
        self.runner.driver().motor_on()
    }

    pub fn bell_on(&self) -> bool {
        self.runner.driver().bell_on()
    }

    pub fn acc(&self) -> u64 {
        self.runner.duty().accumulator_ms()
    }

    /// Machine-wide invariants that must hold after every tick.
    fn assert_invariants(&self) {
        let m = self.movement();

        // Motor power implies a motor-window phase.
        if self.runner.driver().motor_on() {
            assert!(m.motor_window(), "motor powered outside window: {m:?}");
        }

        // Blinkers live exactly over the lit window. Entry-action
        // phases are exempt in the forward direction for the single
        // tick before their dispatch starts the pair.
        let blinkers = self.runner.gate().blinkers_live();
        if blinkers {
            assert!(m.is_lit(), "blinkers live outside lit window: {m:?}");
        }
        let pending_entry = matches!(
            m,
            MovementState::Lower(LowerPhase::LightsAndBells)
                | MovementState::Init(InitPhase::LightsBellsDirection)
        );
        if m.is_lit() && !pending_entry {
            assert!(blinkers, "lit window without blinkers: {m:?}");
        }

        // The accumulator never shrinks while a burst is running.
        if self.runner.duty().motor_running() {
            assert!(
                self.runner.duty().accumulator_ms() >= self.last_acc,
                "accumulator shrank during a burst"
            );
        }

        // The duty flag only lives inside an active cycle.
        if self.runner.gate().duty_exceeded() {
            assert!(
                !matches!(m, MovementState::UpIdle | MovementState::Init(_)),
                "duty flag set outside a cycle: {m:?}"
            );
        }
    }
}
