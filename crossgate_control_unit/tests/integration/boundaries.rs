//! Boundary behaviors around the debounce window and the hold deadline.

use crossgate_common::state::{MovementState, TrackState};

use super::harness::TestBench;

#[test]
fn sub_debounce_pulse_changes_nothing() {
    let mut bench = TestBench::new();
    bench.run_until(11_100);

    bench.run_until(20_000);
    bench.occupy(true);
    bench.run_until(20_400); // 400 ms < the 500 ms window
    bench.occupy(false);

    bench.run_until(25_000);
    assert_eq!(bench.movement(), MovementState::UpIdle);
    assert_eq!(bench.track(), TrackState::Vacant);
    assert!(!bench.runner.driver().status_led_on());
    assert!(!bench.bell_on());
}

#[test]
fn reassertion_just_before_the_deadline_extends_the_hold() {
    let mut bench = TestBench::new();
    bench.run_until(11_100);

    // Gate parked down at ~36.5 s; unrefreshed, the hold would end at
    // ~56.5 s.
    bench.run_until(20_000);
    bench.occupy(true);
    bench.run_until(21_000);
    bench.occupy(false);
    bench.run_until(37_000);
    assert_eq!(bench.movement(), MovementState::DownHold);

    // Occupancy re-commits with about a second to spare.
    bench.run_until(55_000);
    bench.occupy(true);
    bench.run_until(56_000);
    bench.occupy(false);

    // The original deadline passes with the gate still down.
    bench.run_until(56_600);
    assert_eq!(bench.movement(), MovementState::DownHold);
    bench.run_until(76_400);
    assert_eq!(bench.movement(), MovementState::DownHold);

    // The extended deadline fires a full period after the last
    // refreshed report (~56.5 s).
    bench.run_until(76_505);
    assert!(matches!(bench.movement(), MovementState::Raise(_)));
}
