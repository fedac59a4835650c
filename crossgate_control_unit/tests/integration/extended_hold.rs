//! Extended hold: trains pulsing over the sensor keep refreshing the
//! hold anchor; the raise begins only a full hold period after the
//! last pulse.

use crossgate_common::state::{GatePosition, MovementState};

use super::harness::TestBench;

#[test]
fn repeated_pulses_extend_the_hold() {
    let mut bench = TestBench::new();
    bench.run_until(11_100);

    // One train gets the gate down (parked at ~36.5 s).
    bench.run_until(20_000);
    bench.occupy(true);
    bench.run_until(21_000);
    bench.occupy(false);
    bench.run_until(37_000);
    assert_eq!(bench.movement(), MovementState::DownHold);
    assert_eq!(bench.position(), GatePosition::Down);

    // One-second pulses every ten seconds for a minute.
    for k in 0..6u64 {
        let t = 40_000 + k * 10_000;
        bench.run_until(t);
        bench.occupy(true);
        bench.run_until(t + 1_000);
        bench.occupy(false);
        assert_eq!(
            bench.movement(),
            MovementState::DownHold,
            "gate must stay down through pulse {k}"
        );
    }

    // Last pulse ends at 91 s (debounced report clears at ~91.5 s); the
    // gate holds a full period beyond it.
    bench.run_until(110_000);
    assert_eq!(bench.movement(), MovementState::DownHold);

    bench.run_until(111_495);
    assert_eq!(bench.movement(), MovementState::DownHold);
    bench.run_until(111_505);
    assert!(matches!(bench.movement(), MovementState::Raise(_)));
}
