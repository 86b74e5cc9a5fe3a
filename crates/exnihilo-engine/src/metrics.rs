//! Per-cycle bookkeeping for the simulation engine.

use exnihilo_core::id::CycleId;

use crate::timebase::Hold;

/// What one update cycle did.
///
/// The engine populates these fields after each cycle; consumers
/// (sessions, tests, telemetry) read them from the returned result.
#[derive(Clone, Debug, Default)]
pub struct CycleMetrics {
    /// The cycle this record describes.
    pub cycle: CycleId,
    /// Intents applied at the top of the cycle.
    pub intents_applied: u32,
    /// Snapshot loads that failed (empty slot) during this cycle.
    pub failed_snapshot_loads: u32,
    /// The signed model dt integrated, or zero if the cycle held.
    pub model_dt: f32,
    /// Why the physics step was skipped, if it was.
    pub held: Option<Hold>,
    /// Body count after the cycle.
    pub bodies: usize,
    /// Collision contacts observed by the step.
    pub contacts: usize,
    /// Bodies removed this cycle because their lifetime expired.
    pub expired_removed: usize,
}
