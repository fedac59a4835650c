//! Boot-and-settle: with the sensor held vacant forever, the system
//! raises the gate once and parks in UpIdle with the accumulator
//! decaying to zero.

use crossgate_common::state::{GatePosition, MovementState};

use super::harness::TestBench;

#[test]
fn boot_and_settle() {
    let mut bench = TestBench::new();

    // First dispatch: indicators up, direction relay up, motor idle.
    bench.tick();
    assert!(bench.bell_on());
    assert!(bench.runner.gate().blinkers_live());
    assert!(bench.runner.driver().direction_up());
    assert!(!bench.motor_on());

    // The direction relay settles for a full second before power.
    bench.run_until(1_000);
    assert!(!bench.motor_on());
    bench.run_until(1_010);
    assert!(bench.motor_on());

    // The raise window runs its ten seconds.
    bench.run_until(11_000);
    assert!(bench.motor_on());
    bench.run_until(11_015);
    assert!(!bench.motor_on());
    assert!(!bench.bell_on());
    assert!(!bench.runner.gate().blinkers_live());
    assert_eq!(bench.position(), GatePosition::Up);
    assert_eq!(bench.movement(), MovementState::UpIdle);

    // The boot burst is on the books: one tick of dispatch latency on
    // top of the ten-second window.
    assert_eq!(bench.acc(), 10_005);

    // Idle forever: still UpIdle, accumulator fully decayed.
    bench.run_until(115_000);
    assert_eq!(bench.movement(), MovementState::UpIdle);
    assert_eq!(bench.acc(), 0);
}

#[test]
fn anti_phase_lights_during_boot() {
    let mut bench = TestBench::new();
    bench.tick();

    // Sampled across several blink periods, the two lights never agree.
    use crossgate_common::io::OutputId;
    for _ in 0..8 {
        bench.run_until(bench.now() + 250);
        assert_ne!(
            bench.runner.driver().light_on(OutputId::LightsLeft),
            bench.runner.driver().light_on(OutputId::LightsRight),
        );
    }
}
