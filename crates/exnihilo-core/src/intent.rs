//! The intent vocabulary: every mutation the input task may request.
//!
//! Intents travel from the input task to the updater over a bounded
//! channel and are applied between update cycles, never during one.
//! Each variant is a complete, self-contained mutation — there is no
//! partially-applied state for the updater to observe.

use crate::id::SnapshotSlot;

/// One of the four world-axis thrust directions.
///
/// Thrust is world-axis-aligned, not body-relative: bodies carry no
/// orientation in this model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThrustDir {
    /// −Y (screen up).
    Up,
    /// +Y (screen down).
    Down,
    /// −X.
    Left,
    /// +X.
    Right,
}

/// A mutation request from the input task.
///
/// Thrust intents are idempotent: `ThrustStart` sets an absolute level,
/// so keyboard auto-repeat cannot double-apply force.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
    /// Engage the player's thruster in one direction at the configured force.
    ThrustStart(ThrustDir),
    /// Cut the player's thruster in one direction. No-op if already stopped.
    ThrustStop(ThrustDir),
    /// Replace the time scale with an absolute value.
    SetTimeScale(f32),
    /// Multiply the time scale by a factor (e.g. 2.0 or 0.5).
    ScaleTime(f32),
    /// Flip the direction of simulated time.
    ToggleReversed,
    /// Pause or resume the physics.
    TogglePause,
    /// Single-step N frames forward (N > 0) or backward (N < 0),
    /// pausing while the frames drain and then returning to the prior
    /// paused/running state.
    StepFrames(i32),
    /// Toggle fixed-Δt mode (deterministic playback, decoupled from the
    /// measured frame delay).
    ToggleFixedDt,
    /// Replace the fixed-Δt value (seconds).
    SetFixedDt(f32),
    /// Toggle between pairwise gravity and reference-body-only gravity.
    ToggleInteractAll,
    /// Add a delta to the global friction coefficient.
    AdjustFriction(f32),
    /// Spawn N random bodies around the reference body.
    SpawnBodies(u32),
    /// Remove up to N non-reference bodies, newest first.
    RemoveBodies(u32),
    /// Deep-copy the world and time state into a slot.
    SaveSnapshot(SnapshotSlot),
    /// Restore the world and time state from a slot, if one was saved.
    LoadSnapshot(SnapshotSlot),
    /// Request cooperative termination of both tasks.
    Terminate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_are_copy_and_comparable() {
        let a = Intent::ThrustStart(ThrustDir::Up);
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, Intent::ThrustStop(ThrustDir::Up));
    }

    #[test]
    fn snapshot_intents_carry_validated_slots() {
        let slot = SnapshotSlot::new(2).unwrap();
        let save = Intent::SaveSnapshot(slot);
        match save {
            Intent::SaveSnapshot(s) => assert_eq!(s.get(), 2),
            _ => panic!("expected SaveSnapshot"),
        }
    }
}
