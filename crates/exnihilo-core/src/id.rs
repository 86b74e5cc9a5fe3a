//! Strongly-typed identifiers.
//!
//! [`BodyId`] is generation-scoped: removing a body retires its slot and
//! bumps the generation, so a stale id held by an external collaborator
//! resolves to `None` instead of silently aliasing whichever body now
//! occupies the reused slot.

use std::fmt;

/// Stable, generation-checked identity of a body in a store.
///
/// Dense indices shift on removal; a `BodyId` does not. Resolution
/// through the store is O(1) and fails closed once the body is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId {
    /// Slot index within the store's slot table.
    pub(crate) slot: u32,
    /// Generation of the slot when this id was issued.
    pub(crate) generation: u32,
}

impl BodyId {
    /// Create an id from raw parts. Intended for the owning store.
    pub fn from_raw(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Slot index within the store's slot table.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation of the slot when this id was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BodyId({}v{})", self.slot, self.generation)
    }
}

/// A snapshot slot key, validated to the configured range `1..=MAX`.
///
/// Slots are small positive integers (the original keyboard bindings map
/// them to F1..F4); slot 0 is not a valid key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotSlot(u8);

impl SnapshotSlot {
    /// Number of available snapshot slots.
    pub const MAX: u8 = 4;

    /// Validate a raw slot number. Returns `None` outside `1..=MAX`.
    pub fn new(raw: u8) -> Option<Self> {
        (1..=Self::MAX).contains(&raw).then_some(Self(raw))
    }

    /// The raw slot number, in `1..=MAX`.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for SnapshotSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing update-cycle counter.
///
/// Incremented each time the engine runs one update cycle (whether or
/// not a physics step was applied that cycle).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CycleId(pub u64);

impl CycleId {
    /// The next cycle id.
    pub fn next(self) -> CycleId {
        CycleId(self.0 + 1)
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_id_round_trip() {
        let id = BodyId::from_raw(7, 3);
        assert_eq!(id.slot(), 7);
        assert_eq!(id.generation(), 3);
        assert_eq!(id.to_string(), "BodyId(7v3)");
    }

    #[test]
    fn body_ids_differ_across_generations() {
        assert_ne!(BodyId::from_raw(0, 0), BodyId::from_raw(0, 1));
    }

    #[test]
    fn snapshot_slot_validates_range() {
        assert!(SnapshotSlot::new(0).is_none());
        assert_eq!(SnapshotSlot::new(1).unwrap().get(), 1);
        assert_eq!(SnapshotSlot::new(4).unwrap().get(), 4);
        assert!(SnapshotSlot::new(5).is_none());
    }

    #[test]
    fn cycle_id_advances() {
        assert_eq!(CycleId(0).next(), CycleId(1));
        assert_eq!(CycleId(41).next(), CycleId(42));
    }
}
