//! Warning-light blink scheduler.
//!
//! A polled oscillator service: each slot drives one output to an
//! initial level and toggles it at a fixed period until stopped. The
//! slot table is preallocated; exhaustion is an error the caller treats
//! as fatal during initialization.
//!
//! Starting two slots in the same tick with the same period and
//! opposite initial levels yields anti-phase alternation — this is how
//! the two crossing lights flash.

use crossgate_common::consts::MAX_BLINK_SLOTS;
use crossgate_common::hal::GateDriver;
use crossgate_common::io::OutputId;
use heapless::Vec;
use thiserror::Error;
use tracing::warn;

/// Handle to a blink slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkId(usize);

/// Blink scheduler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlinkError {
    /// All oscillator slots are in use.
    #[error("no free blink slot for output {0}")]
    NoFreeSlot(OutputId),
}

#[derive(Debug, Clone, Copy)]
struct BlinkSlot {
    output: OutputId,
    period_ms: u64,
    level: bool,
    next_toggle_ms: u64,
    /// Remaining toggles; `None` runs until stopped.
    remaining: Option<u32>,
    active: bool,
}

/// Modular deadline test; valid while deltas stay far below half the
/// clock span.
#[inline]
const fn due(now_ms: u64, deadline_ms: u64) -> bool {
    now_ms.wrapping_sub(deadline_ms) < u64::MAX / 2
}

/// Polled blink scheduler with a fixed slot table.
#[derive(Debug, Default)]
pub struct BlinkScheduler {
    slots: Vec<BlinkSlot, MAX_BLINK_SLOTS>,
}

impl BlinkScheduler {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Start a blinker: the output is driven to `initial_level` now and
    /// toggled every `period_ms` thereafter.
    ///
    /// `repeat` counts toggles; `None` runs until [`stop`](Self::stop).
    pub fn start(
        &mut self,
        driver: &mut dyn GateDriver,
        output: OutputId,
        period_ms: u64,
        initial_level: bool,
        repeat: Option<u32>,
        now_ms: u64,
    ) -> Result<BlinkId, BlinkError> {
        debug_assert!(period_ms > 0);
        let slot = BlinkSlot {
            output,
            period_ms,
            level: initial_level,
            next_toggle_ms: now_ms.wrapping_add(period_ms),
            remaining: repeat,
            active: !matches!(repeat, Some(0)),
        };

        // Reuse a stopped slot before growing the table.
        let idx = match self.slots.iter().position(|s| !s.active) {
            Some(i) => {
                self.slots[i] = slot;
                i
            }
            None => {
                let i = self.slots.len();
                if self.slots.push(slot).is_err() {
                    warn!("blink slots exhausted, output {output}");
                    return Err(BlinkError::NoFreeSlot(output));
                }
                i
            }
        };

        driver.write(output, initial_level);
        Ok(BlinkId(idx))
    }

    /// Stop a blinker. Idempotent: stopping an already-stopped handle
    /// is a no-op. The output is left at its last driven level.
    pub fn stop(&mut self, id: BlinkId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.active = false;
        }
    }

    /// Number of live slots.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    /// Apply every toggle due at `now_ms`. Catches up if the loop
    /// stalled past more than one toggle boundary.
    pub fn service(&mut self, driver: &mut dyn GateDriver, now_ms: u64) {
        for slot in self.slots.iter_mut() {
            while slot.active && due(now_ms, slot.next_toggle_ms) {
                slot.level = !slot.level;
                driver.write(slot.output, slot.level);
                slot.next_toggle_ms = slot.next_toggle_ms.wrapping_add(slot.period_ms);
                if let Some(n) = slot.remaining.as_mut() {
                    *n -= 1;
                    if *n == 0 {
                        slot.active = false;
                    }
                }
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
