//! The insertion-ordered body store.
//!
//! Bodies are addressed two ways:
//!
//! - **Dense index** — position in insertion order. Cheap, but removal
//!   shifts every subsequent index down by one, so indices are only valid
//!   until the next mutation.
//! - **[`BodyId`]** — a generation-checked slot reference that survives
//!   unrelated removals and fails closed (resolves to `None`) once its
//!   body is gone, instead of silently aliasing a reused slot.
//!
//! Every add/remove is recorded in an event journal so index-keyed
//! external caches (a renderer's shape cache, typically) can be kept in
//! sync by draining [`BodyStore::drain_events`] once per published frame.

use exnihilo_core::id::BodyId;

use crate::body::Body;

/// A store mutation, journaled for external index-keyed caches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// A body was appended at `index`.
    Added {
        /// The index assigned to the new body.
        index: usize,
    },
    /// The body at `index` was removed; all higher indices shifted down.
    Removed {
        /// The index the body occupied before removal.
        index: usize,
    },
    /// The whole store was replaced (snapshot load); rebuild everything.
    Reloaded,
}

/// One entry in the slot table backing [`BodyId`] resolution.
#[derive(Clone, Copy, Debug)]
struct Slot {
    generation: u32,
    /// Current dense position, or `None` while the slot is free.
    position: Option<u32>,
}

/// Insertion-ordered collection of [`Body`] values.
#[derive(Clone, Debug, Default)]
pub struct BodyStore {
    bodies: Vec<Body>,
    /// Parallel to `bodies`: the id issued for each dense position.
    ids: Vec<BodyId>,
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    events: Vec<StoreEvent>,
}

impl BodyStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bodies currently stored.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the store holds no bodies.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Append a body. Returns the assigned dense index (= previous len)
    /// and a generation-checked id. Never fails.
    pub fn add(&mut self, body: Body) -> (usize, BodyId) {
        let index = self.bodies.len();
        let slot = match self.free_slots.pop() {
            Some(slot) => {
                self.slots[slot as usize].position = Some(index as u32);
                slot
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    position: Some(index as u32),
                });
                (self.slots.len() - 1) as u32
            }
        };
        let id = BodyId::from_raw(slot, self.slots[slot as usize].generation);
        self.bodies.push(body);
        self.ids.push(id);
        self.events.push(StoreEvent::Added { index });
        (index, id)
    }

    /// Remove the body at `index`, shifting all subsequent bodies down
    /// by one position. The removed body's id is retired: its slot
    /// generation is bumped so stale ids resolve to `None`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()` — an out-of-range index is a
    /// programmer-contract violation, not a recoverable condition.
    pub fn remove(&mut self, index: usize) -> Body {
        assert!(
            index < self.bodies.len(),
            "remove({index}) out of range (len {})",
            self.bodies.len()
        );
        let body = self.bodies.remove(index);
        let id = self.ids.remove(index);

        let slot = &mut self.slots[id.slot() as usize];
        slot.generation = slot.generation.wrapping_add(1);
        slot.position = None;
        self.free_slots.push(id.slot());

        // Re-point slots for everything that shifted down.
        for (pos, shifted) in self.ids.iter().enumerate().skip(index) {
            self.slots[shifted.slot() as usize].position = Some(pos as u32);
        }

        self.events.push(StoreEvent::Removed { index });
        body
    }

    /// The body at a dense index, if in range.
    pub fn get(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    /// Mutable access to the body at a dense index, if in range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Body> {
        self.bodies.get_mut(index)
    }

    /// The id issued for the body at a dense index.
    pub fn id_at(&self, index: usize) -> Option<BodyId> {
        self.ids.get(index).copied()
    }

    /// Resolve a generation-checked id to its current dense index.
    /// Returns `None` for stale ids (body removed since issue).
    pub fn index_of(&self, id: BodyId) -> Option<usize> {
        let slot = self.slots.get(id.slot() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.position.map(|p| p as usize)
    }

    /// Resolve a generation-checked id to its body.
    pub fn resolve(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).and_then(|i| self.bodies.get(i))
    }

    /// Resolve a generation-checked id to its body, mutably.
    pub fn resolve_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        let index = self.index_of(id)?;
        self.bodies.get_mut(index)
    }

    /// Iterate the bodies in store (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = &Body> + Clone {
        self.bodies.iter()
    }

    /// Iterate the bodies mutably in store order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    /// Drain the journal of mutations since the last drain.
    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record that the store contents were replaced wholesale, so cache
    /// holders discard and rebuild rather than replaying a diff.
    pub fn mark_reloaded(&mut self) {
        self.events.clear();
        self.events.push(StoreEvent::Reloaded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodySpec;

    fn body_with_radius(r: f32) -> Body {
        Body::new(BodySpec {
            r,
            ..Default::default()
        })
    }

    #[test]
    fn add_returns_previous_len_as_index() {
        let mut store = BodyStore::new();
        let (i0, _) = store.add(body_with_radius(1.0));
        let (i1, _) = store.add(body_with_radius(2.0));
        assert_eq!((i0, i1), (0, 1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_shifts_subsequent_indices() {
        let mut store = BodyStore::new();
        for r in [1.0, 2.0, 3.0, 4.0] {
            store.add(body_with_radius(r));
        }
        store.remove(1);
        let radii: Vec<f32> = store.iter().map(|b| b.r()).collect();
        assert_eq!(radii, vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn add_remove_all_restores_original_order() {
        let mut store = BodyStore::new();
        store.add(body_with_radius(1.0));
        store.add(body_with_radius(2.0));
        let before: Vec<f32> = store.iter().map(|b| b.r()).collect();

        for r in [10.0, 11.0, 12.0] {
            store.add(body_with_radius(r));
        }
        // Highest index first, as the contract requires.
        for index in (2..5).rev() {
            store.remove(index);
        }

        let after: Vec<f32> = store.iter().map(|b| b.r()).collect();
        assert_eq!(before, after);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn remove_out_of_range_panics() {
        let mut store = BodyStore::new();
        store.add(body_with_radius(1.0));
        store.remove(1);
    }

    #[test]
    fn stale_id_fails_closed() {
        let mut store = BodyStore::new();
        let (_, id_a) = store.add(body_with_radius(1.0));
        let (index_a, _) = (store.index_of(id_a).unwrap(), ());
        store.remove(index_a);

        assert_eq!(store.resolve(id_a), None);
        assert_eq!(store.index_of(id_a), None);

        // Reusing the slot must not resurrect the stale id.
        let (_, id_b) = store.add(body_with_radius(2.0));
        assert_eq!(store.resolve(id_a), None);
        assert_eq!(store.resolve(id_b).unwrap().r(), 2.0);
    }

    #[test]
    fn ids_survive_unrelated_removals() {
        let mut store = BodyStore::new();
        store.add(body_with_radius(1.0));
        let (_, id) = store.add(body_with_radius(2.0));
        store.add(body_with_radius(3.0));

        store.remove(0);
        assert_eq!(store.index_of(id), Some(0));
        assert_eq!(store.resolve(id).unwrap().r(), 2.0);

        store.remove(1); // removes the 3.0 body
        assert_eq!(store.resolve(id).unwrap().r(), 2.0);
    }

    #[test]
    fn journal_records_mutations_in_order() {
        let mut store = BodyStore::new();
        store.add(body_with_radius(1.0));
        store.add(body_with_radius(2.0));
        store.remove(0);
        assert_eq!(
            store.drain_events(),
            vec![
                StoreEvent::Added { index: 0 },
                StoreEvent::Added { index: 1 },
                StoreEvent::Removed { index: 0 },
            ]
        );
        assert!(store.drain_events().is_empty());
    }

    #[test]
    fn mark_reloaded_collapses_pending_events() {
        let mut store = BodyStore::new();
        store.add(body_with_radius(1.0));
        store.mark_reloaded();
        assert_eq!(store.drain_events(), vec![StoreEvent::Reloaded]);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// A random interleaving of adds and (valid) removes never breaks
        /// the dense/slot cross-references: every live id resolves to the
        /// body it was issued for, identified here by radius.
        #[test]
        fn ids_stay_consistent_under_churn() {
            fn run(ops: Vec<u8>) {
                let mut store = BodyStore::new();
                let mut live: Vec<(BodyId, f32)> = Vec::new();
                let mut next_r = 1.0f32;

                for op in ops {
                    if op % 3 == 0 && !live.is_empty() {
                        let victim = (op as usize / 3) % live.len();
                        let (id, _) = live.remove(victim);
                        let index = store.index_of(id).unwrap();
                        store.remove(index);
                        assert_eq!(store.resolve(id), None);
                    } else {
                        let (_, id) = store.add(Body::new(BodySpec {
                            r: next_r,
                            ..Default::default()
                        }));
                        live.push((id, next_r));
                        next_r += 1.0;
                    }
                    for (id, r) in &live {
                        assert_eq!(store.resolve(*id).unwrap().r(), *r);
                    }
                }
            }

            proptest!(|(ops in proptest::collection::vec(any::<u8>(), 0..64))| {
                run(ops);
            });
        }
    }
}
