//! Numbered in-memory snapshots of the full simulation state.
//!
//! A snapshot is a deep copy: saving clones the world and the restorable
//! timebase shape; loading clones them back. Saving into an occupied
//! slot overwrites it silently. Loading an empty slot fails with
//! [`SnapshotError::NotFound`] and leaves the live state untouched.

use indexmap::IndexMap;

use exnihilo_core::error::SnapshotError;
use exnihilo_core::id::SnapshotSlot;
use exnihilo_world::World;

use crate::timebase::TimebaseShape;

/// One saved simulation state.
#[derive(Clone, Debug)]
pub struct WorldSnapshot {
    /// The full world, bodies and parameters included.
    pub world: World,
    /// The restorable timebase controls in effect at capture.
    pub timebase: TimebaseShape,
}

/// The slot-keyed snapshot store.
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore {
    slots: IndexMap<SnapshotSlot, WorldSnapshot>,
}

impl SnapshotStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a snapshot into `slot`, overwriting any previous occupant.
    pub fn save(&mut self, slot: SnapshotSlot, snapshot: WorldSnapshot) {
        self.slots.insert(slot, snapshot);
    }

    /// The snapshot in `slot`, if one was ever saved.
    pub fn load(&self, slot: SnapshotSlot) -> Result<&WorldSnapshot, SnapshotError> {
        self.slots.get(&slot).ok_or(SnapshotError::NotFound { slot })
    }

    /// Whether `slot` holds a snapshot.
    pub fn contains(&self, slot: SnapshotSlot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
