//! Deterministic control cycle: sample → policy → govern → step → blink.
//!
//! Every iteration reads the raw sensor, runs the debouncer, applies
//! the occupancy preemption policy, drains the duty governor, dispatches
//! the current movement phase (at most one transition), and services
//! the blink scheduler. Nothing blocks; every wait is an anchored
//! timestamp compared on later ticks.
//!
//! The default build paces with `std::thread::sleep`. The `rt` feature
//! (production) paces with `clock_nanosleep(TIMER_ABSTIME)` on
//! CLOCK_MONOTONIC after locking memory, prefaulting the stack, and
//! switching to SCHED_FIFO. Overruns are counted and logged, never
//! fatal — the crossing keeps operating on a late cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossgate_common::consts::CYCLE_TIME_MS;
use crossgate_common::hal::GateDriver;
use crossgate_common::state::SensorReading;
use crossgate_hal::blink::BlinkScheduler;
use crossgate_hal::clock::Clock;
use crossgate_hal::levels::GateIoExt;
use tracing::info;

use crate::debounce::{SensorDebouncer, SensorEdge};
use crate::duty::DutyGovernor;
use crate::error::ControlError;
use crate::gate::GateController;

/// SCHED_FIFO priority for the `rt` loop.
#[cfg(feature = "rt")]
const RT_PRIORITY: i32 = 80;

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-cycle timing statistics. Updated every cycle with no
/// allocation.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Number of overruns detected.
    pub overruns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
        }
    }

    /// Record a cycle duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: i64) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        if duration_ns < self.min_cycle_ns {
            self.min_cycle_ns = duration_ns;
        }
        if duration_ns > self.max_cycle_ns {
            self.max_cycle_ns = duration_ns;
        }
        self.sum_cycle_ns += duration_ns;
    }

    /// Average cycle time [ns] (0 before the first cycle).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Owns the clock, the driver, and every control-plant component, and
/// drives them through the per-tick sequence.
pub struct CycleRunner<C: Clock, D: GateDriver> {
    clock: C,
    driver: D,
    blink: BlinkScheduler,
    debouncer: SensorDebouncer,
    duty: DutyGovernor,
    gate: GateController,
    stats: CycleStats,
    running: Arc<AtomicBool>,
}

impl<C: Clock, D: GateDriver> CycleRunner<C, D> {
    /// Initialize the driver and pre-build all runtime state.
    pub fn new(clock: C, mut driver: D) -> Result<Self, ControlError> {
        driver.init()?;
        let now = clock.now_ms();
        Ok(Self {
            clock,
            driver,
            blink: BlinkScheduler::new(),
            debouncer: SensorDebouncer::new(),
            duty: DutyGovernor::new(now),
            gate: GateController::new(),
            stats: CycleStats::new(),
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Flag the loop polls; clear it (e.g. from a signal handler) to
    /// stop the run.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[inline]
    pub fn gate(&self) -> &GateController {
        &self.gate
    }

    #[inline]
    pub fn duty(&self) -> &DutyGovernor {
        &self.duty
    }

    #[inline]
    pub fn duty_mut(&mut self) -> &mut DutyGovernor {
        &mut self.duty
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// One loop iteration.
    pub fn cycle_body(&mut self) -> Result<(), ControlError> {
        let now = self.clock.now_ms();

        // ═══ SAMPLE ═══
        let raw = if self.driver.track_occupied() {
            SensorReading::Occupied
        } else {
            SensorReading::Vacant
        };
        if let Some(edge) = self.debouncer.sample(raw, now) {
            match edge {
                SensorEdge::Detected => {
                    self.driver.set_status_led(true);
                    info!("Track Sensor: Detected");
                }
                SensorEdge::Cleared => {
                    self.driver.set_status_led(false);
                    info!("Track Sensor: Cleared");
                }
            }
        }

        // ═══ POLICY ═══
        self.gate.apply_occupancy(
            self.debouncer.stable(),
            now,
            &mut self.driver,
            &mut self.blink,
            &mut self.duty,
        );

        // ═══ GOVERN ═══
        self.duty.tick(now);

        // ═══ STEP ═══
        self.gate
            .step(now, &mut self.driver, &mut self.blink, &mut self.duty)?;

        // ═══ BLINK ═══
        self.blink.service(&mut self.driver, now);

        Ok(())
    }

    /// Enter the paced loop. Returns when the running flag clears or a
    /// cycle fails.
    pub fn run(&mut self) -> Result<(), ControlError> {
        #[cfg(feature = "rt")]
        {
            rt_setup(RT_PRIORITY)?;
            self.run_rt_loop()
        }

        #[cfg(not(feature = "rt"))]
        {
            self.run_sim_loop()
        }
    }

    /// Park the hardware in its safe state.
    pub fn shutdown(&mut self) -> Result<(), ControlError> {
        self.driver.shutdown()?;
        Ok(())
    }

    /// Paced loop using `std::thread::sleep`.
    #[cfg(not(feature = "rt"))]
    fn run_sim_loop(&mut self) -> Result<(), ControlError> {
        use std::time::{Duration, Instant};

        let cycle_duration = Duration::from_millis(CYCLE_TIME_MS);

        while self.running.load(Ordering::SeqCst) {
            let cycle_start = Instant::now();

            self.cycle_body()?;

            let elapsed = cycle_start.elapsed();
            self.stats.record(elapsed.as_nanos() as i64);
            if elapsed > cycle_duration {
                self.stats.overruns += 1;
            }

            if let Some(remaining) = cycle_duration.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        }
        Ok(())
    }

    /// Drift-free loop on `clock_nanosleep(TIMER_ABSTIME)`.
    #[cfg(feature = "rt")]
    fn run_rt_loop(&mut self) -> Result<(), ControlError> {
        use nix::time::{ClockId, ClockNanosleepFlags, clock_gettime, clock_nanosleep};
        use tracing::warn;

        let clock_id = ClockId::CLOCK_MONOTONIC;
        let cycle_ns = (CYCLE_TIME_MS * 1_000_000) as i64;
        let mut next_wake = clock_gettime(clock_id)
            .map_err(|e| ControlError::RtSetup(format!("clock_gettime: {e}")))?;

        while self.running.load(Ordering::SeqCst) {
            next_wake = timespec_add_ns(next_wake, cycle_ns);

            let cycle_start = clock_gettime(clock_id)
                .map_err(|e| ControlError::RtSetup(format!("clock_gettime: {e}")))?;

            self.cycle_body()?;

            let cycle_end = clock_gettime(clock_id)
                .map_err(|e| ControlError::RtSetup(format!("clock_gettime: {e}")))?;
            let duration_ns = timespec_diff_ns(&cycle_end, &cycle_start);

            self.stats.record(duration_ns);
            if duration_ns > cycle_ns {
                self.stats.overruns += 1;
                warn!("cycle overrun: {duration_ns} ns > {cycle_ns} ns budget");
            }

            let _ = clock_nanosleep(clock_id, ClockNanosleepFlags::TIMER_ABSTIME, &next_wake);
        }
        Ok(())
    }
}

// ─── RT Setup ───────────────────────────────────────────────────────

/// Lock all current and future memory pages. No-op without `rt`.
#[cfg(feature = "rt")]
fn rt_mlockall() -> Result<(), ControlError> {
    use nix::sys::mman::{MlockallFlags, mlockall};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| ControlError::RtSetup(format!("mlockall failed: {e}")))?;
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_mlockall() -> Result<(), ControlError> {
    Ok(()) // No-op in simulation mode
}

/// Prefault stack pages so the paced loop never page-faults.
fn prefault_stack() {
    let mut buf = [0u8; 64 * 1024];
    for byte in buf.iter_mut() {
        unsafe { core::ptr::write_volatile(byte, 0xFF) };
    }
    core::hint::black_box(&buf);
}

/// Switch to SCHED_FIFO at the given priority. No-op without `rt`.
#[cfg(feature = "rt")]
fn rt_set_scheduler(priority: i32) -> Result<(), ControlError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(ControlError::RtSetup(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn rt_set_scheduler(_priority: i32) -> Result<(), ControlError> {
    Ok(()) // No-op in simulation mode
}

/// Full RT setup sequence; must run before the paced loop. Every step
/// is a no-op when the `rt` feature is disabled.
pub fn rt_setup(priority: i32) -> Result<(), ControlError> {
    rt_mlockall()?;
    prefault_stack();
    rt_set_scheduler(priority)?;
    Ok(())
}

// ─── Time Helpers ───────────────────────────────────────────────────

/// Add nanoseconds to a TimeSpec.
#[cfg(feature = "rt")]
fn timespec_add_ns(ts: nix::sys::time::TimeSpec, ns: i64) -> nix::sys::time::TimeSpec {
    use nix::sys::time::TimeSpec;
    let mut secs = ts.tv_sec();
    let mut nanos = ts.tv_nsec() + ns;
    while nanos >= 1_000_000_000 {
        secs += 1;
        nanos -= 1_000_000_000;
    }
    while nanos < 0 {
        secs -= 1;
        nanos += 1_000_000_000;
    }
    TimeSpec::new(secs, nanos)
}

/// Compute the difference (a - b) in nanoseconds.
#[cfg(feature = "rt")]
fn timespec_diff_ns(a: &nix::sys::time::TimeSpec, b: &nix::sys::time::TimeSpec) -> i64 {
    (a.tv_sec() - b.tv_sec()) * 1_000_000_000 + (a.tv_nsec() - b.tv_nsec())
}

// ─── Tests ──────────────────────────────────────────────────────────
