//! # Crossgate Control Unit Binary
//!
//! Wires the simulation driver to the cycle runner and runs the
//! controller until a shutdown signal arrives. The museum installation
//! swaps the GPIO backend in at this seam; everything else is
//! compile-time.

use std::sync::atomic::Ordering;

use crossgate_control_unit::cycle::CycleRunner;
use crossgate_hal::{MonotonicClock, SimDriver};
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        // Use tracing for errors so formatting matches INFO logs.
        error!("controller failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    info!(
        "Crossgate Control Unit v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let mut runner = CycleRunner::new(MonotonicClock::new(), SimDriver::new())?;

    // Stop cleanly on ctrl-c; the loop drains within one cycle.
    let running = runner.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    let result = runner.run();

    // Park the outputs whether the loop ended cleanly or not.
    runner.shutdown()?;

    result?;
    info!("Controller shutdown complete");
    Ok(())
}

/// Plain line-oriented console output; RUST_LOG overrides the level.
fn setup_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
