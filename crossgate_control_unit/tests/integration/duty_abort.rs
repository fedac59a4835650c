//! Duty-limit abort: with the governor saturated, a lowering cycle runs
//! with the motor dark, the hold collapses into the abbreviated
//! indicator-only teardown, and nothing is credited.

use crossgate_common::state::{GatePosition, MovementState, RaisePhase};

use super::harness::TestBench;

#[test]
fn saturated_governor_runs_the_abort_cycle() {
    let mut bench = TestBench::new();
    bench.run_until(11_100);

    // Saturate the governor with a synthetic burst.
    bench.runner.duty_mut().note_motor_on(0);
    bench.runner.duty_mut().note_motor_off(81_000, true);
    assert!(!bench.runner.duty().may_energize());

    // A short train pulse starts a lowering cycle.
    bench.occupy(true);
    bench.run_until(12_200);
    bench.occupy(false);
    bench.run_until(12_300);
    assert!(matches!(bench.movement(), MovementState::Lower(_)));
    assert!(bench.bell_on());

    // The governor vetoes the motor at the end of the warning lead.
    bench.run_until(14_700);
    assert!(!bench.motor_on());
    assert!(bench.runner.gate().duty_exceeded());
    let acc_at_veto = bench.acc();

    // The abbreviated window runs out; the hold observes the flag
    // immediately and schedules the indicator-only teardown.
    bench.run_until(21_700);
    assert_eq!(
        bench.movement(),
        MovementState::Raise(RaisePhase::MotorOnDelay)
    );
    assert!(bench.bell_on(), "indicators persist through the abort");
    assert!(bench.runner.gate().blinkers_live());
    assert!(!bench.motor_on());

    // Twenty seconds of display, then everything quiets down. The
    // motor never ran.
    bench.run_until(41_620);
    assert!(!bench.motor_on());
    bench.run_until(41_700);
    assert_eq!(bench.movement(), MovementState::UpIdle);
    assert_eq!(bench.position(), GatePosition::Up);
    assert!(!bench.bell_on());
    assert!(!bench.runner.gate().blinkers_live());
    assert!(!bench.runner.gate().duty_exceeded());

    // No credit for the burst that never ran; only idle decay moved
    // the accumulator.
    assert!(bench.acc() <= acc_at_veto);
    assert!(bench.acc() >= acc_at_veto - 3_000);
}
