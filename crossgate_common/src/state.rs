//! State machine vocabulary for the gate controller.
//!
//! The movement state is a closed sum of per-submachine sums (Init,
//! Lower, Raise) composed into one outer enum, plus the standalone
//! DownHold and UpIdle phases. Exactly one phase is current at any
//! time; illegal combinations are unrepresentable.

/// End-of-travel position the controller believes the arm is in.
///
/// Mutated only by the state machine at motor-off transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatePosition {
    /// Arm raised, road open.
    Up,
    /// Arm lowered, road blocked.
    Down,
}

impl Default for GatePosition {
    fn default() -> Self {
        Self::Up
    }
}

/// Track occupancy as the state machine tracks it.
///
/// Derived from the debounced sensor plus startup logic; distinct from
/// the instantaneous debouncer report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackState {
    /// Boot-time raise still in progress.
    Initializing,
    /// A train is on the island circuit.
    Occupied,
    /// No train present.
    Vacant,
}

impl Default for TrackState {
    fn default() -> Self {
        Self::Initializing
    }
}

/// Debounced sensor output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorReading {
    Occupied,
    Vacant,
}

impl SensorReading {
    #[inline]
    pub const fn is_occupied(self) -> bool {
        matches!(self, Self::Occupied)
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self::Vacant
    }
}

/// Commanded arm motor direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmDirection {
    Up,
    Down,
}

// ─── Submachine Phases ──────────────────────────────────────────────

/// Boot-time raise phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitPhase {
    /// Bell on, blinkers started, direction relay up.
    LightsBellsDirection,
    /// Direction relay settling before power.
    MotorDirectionDelay,
    /// Motor powered, arm rising.
    MotorOn,
    /// Teardown: indicators off, motor parked, gate reported up.
    MotorOff,
}

/// Gate-lowering phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LowerPhase {
    /// Indicators on, direction relay down.
    LightsAndBells,
    /// Warning lead before the motor engages.
    LightsAndBellsDelay,
    /// Governor consulted; motor powered or vetoed.
    MotorOn,
    /// Motor window running (nominal or abbreviated).
    MotorOnDelay,
    /// Motor parked, gate reported down.
    MotorOff,
}

/// Gate-raising phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RaisePhase {
    /// One-tick no-op retained for symmetry with the sensor debounce.
    Debounce,
    /// Direction relay up.
    MotorDirection,
    /// Direction relay settling before power.
    MotorDirectionDelay,
    /// Motor powered, arm rising.
    MotorOn,
    /// Motor window running.
    MotorOnDelay,
    /// Teardown: indicators off, motor parked, gate reported up.
    MotorOff,
}

// ─── Composite Movement State ───────────────────────────────────────

/// The state machine's fine-grained phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementState {
    /// Boot-time raise.
    Init(InitPhase),
    /// Lowering sequence.
    Lower(LowerPhase),
    /// Gate parked down, waiting out the hold period.
    DownHold,
    /// Raising sequence.
    Raise(RaisePhase),
    /// Gate parked up, waiting for the next occupancy edge.
    UpIdle,
}

impl MovementState {
    /// Phase current at power-up.
    pub const BOOT: Self = Self::Init(InitPhase::LightsBellsDirection);

    /// Phases during which the warning lights and bell are up.
    ///
    /// The motor-off phases count as lit: they tear the indicators down
    /// as they exit.
    #[inline]
    pub const fn is_lit(&self) -> bool {
        !matches!(self, Self::UpIdle)
    }

    /// Phases during which motor power may be asserted.
    ///
    /// Includes the motor-off phases, which cut power as they exit.
    /// The converse does not hold: a governor veto leaves the motor
    /// unpowered through the whole lowering window.
    #[inline]
    pub const fn motor_window(&self) -> bool {
        matches!(
            self,
            Self::Init(InitPhase::MotorOn | InitPhase::MotorOff)
                | Self::Lower(
                    LowerPhase::MotorOn | LowerPhase::MotorOnDelay | LowerPhase::MotorOff
                )
                | Self::Raise(
                    RaisePhase::MotorOn | RaisePhase::MotorOnDelay | RaisePhase::MotorOff
                )
        )
    }

    /// Whether the arm is in its rising motor window (preemption target).
    #[inline]
    pub const fn is_raising(&self) -> bool {
        matches!(self, Self::Raise(RaisePhase::MotorOnDelay))
    }
}

impl Default for MovementState {
    fn default() -> Self {
        Self::BOOT
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
