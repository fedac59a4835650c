//! A single occupancy pulse drives exactly one full
//! down–hold–up cycle and returns the system to UpIdle.

use crossgate_common::state::{GatePosition, MovementState, TrackState};

use super::harness::TestBench;

#[test]
fn single_train_full_cycle() {
    let mut bench = TestBench::new();
    bench.run_until(11_100);
    assert_eq!(bench.movement(), MovementState::UpIdle);

    // Train shows up at t = 20 s.
    bench.run_until(20_000);
    bench.occupy(true);

    // Nothing moves until the debounce window commits.
    bench.run_until(20_500);
    assert_eq!(bench.movement(), MovementState::UpIdle);
    bench.run_until(20_510);
    assert!(matches!(bench.movement(), MovementState::Lower(_)));
    assert_eq!(bench.track(), TrackState::Occupied);
    assert!(bench.runner.driver().status_led_on());
    assert!(bench.bell_on());
    assert!(!bench.runner.driver().direction_up());

    // The warning lead runs before the motor engages.
    bench.run_until(23_505);
    assert!(!bench.motor_on());
    bench.run_until(23_515);
    assert!(bench.motor_on());

    // The train clears the island while the arm is still lowering; the
    // machine keeps its own occupancy belief until the hold ends.
    bench.run_until(30_000);
    bench.occupy(false);
    bench.run_until(31_000);
    assert!(!bench.runner.driver().status_led_on());
    assert_eq!(bench.track(), TrackState::Occupied);

    // The nominal run parks the arm down.
    bench.run_until(36_510);
    assert!(bench.motor_on());
    bench.run_until(36_520);
    assert!(!bench.motor_on());
    assert_eq!(bench.position(), GatePosition::Down);
    assert_eq!(bench.movement(), MovementState::DownHold);
    assert!(bench.bell_on(), "indicators stay up through the hold");

    // Twenty seconds of hold, then the raise begins.
    bench.run_until(56_515);
    assert_eq!(bench.movement(), MovementState::DownHold);
    bench.run_until(56_530);
    assert!(matches!(bench.movement(), MovementState::Raise(_)));
    assert!(bench.runner.driver().direction_up());

    // Direction settle, then power.
    bench.run_until(57_530);
    assert!(!bench.motor_on());
    bench.run_until(57_540);
    assert!(bench.motor_on());

    // The raise run completes and everything quiets down.
    bench.run_until(70_530);
    assert!(bench.motor_on());
    bench.run_until(70_545);
    assert!(!bench.motor_on());
    assert!(!bench.bell_on());
    assert!(!bench.runner.gate().blinkers_live());
    assert_eq!(bench.position(), GatePosition::Up);
    assert_eq!(bench.movement(), MovementState::UpIdle);

    // And stays quiet.
    bench.run_until(75_000);
    assert_eq!(bench.movement(), MovementState::UpIdle);
}
