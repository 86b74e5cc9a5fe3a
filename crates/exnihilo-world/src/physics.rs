//! The physics stepper: gravity, thrust, friction, integration,
//! collision detection, and lifetime accounting.
//!
//! [`World::step`] advances every body by one time slice. The slice may
//! be negative (time reversed) or zero (paused-but-stepping); both
//! integrate through the same code path. The stepper itself never
//! removes or merges bodies — collisions and expiries are *signaled*
//! (hook + report) and the owning application decides the consequences.

use exnihilo_core::id::BodyId;
use exnihilo_core::math::Vec2;
use smallvec::SmallVec;

use crate::body::Body;
use crate::store::BodyStore;

/// Default gravitational constant, m³/(kg·s²).
pub const DEFAULT_G: f32 = 6.673e-11;

/// Default global friction coefficient, 1/s.
pub const DEFAULT_FRICTION: f32 = 0.03;

/// Kind of interaction event dispatched to the hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactKind {
    /// No interaction. Present so hosts can use the kind as a dispatch tag.
    None,
    /// Two body shapes overlap.
    Collision,
}

/// Interaction callback: `(store, kind, index_a, index_b)`.
///
/// Invoked synchronously during [`World::step`], after integration and
/// before the step returns. The host may mutate bodies but must not
/// add or remove them from inside the hook (indices in the pending
/// report would be invalidated).
pub type InteractionHook<'a> = dyn FnMut(&mut BodyStore, ContactKind, usize, usize) + Send + 'a;

/// Global physics parameters.
///
/// All externally supplied; the defaults document the original sandbox's
/// tuning rather than hard-coding behavior anywhere in the stepper.
#[derive(Clone, Copy, Debug)]
pub struct WorldParams {
    /// Gravitational constant.
    pub g: f32,
    /// Uniform friction coefficient applied to every body's velocity.
    pub friction: f32,
    /// Distance floor applied before dividing by d², to keep coincident
    /// bodies from producing singular accelerations.
    pub min_separation: f32,
    /// `true`: pairwise gravity between all bodies, O(n²).
    /// `false`: only the reference body participates pairwise; all other
    /// bodies attract and are attracted by it alone, O(n).
    pub interact_all: bool,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            friction: DEFAULT_FRICTION,
            min_separation: 1.0,
            interact_all: false,
        }
    }
}

/// What one step observed: collisions detected and lifetimes expired.
///
/// Expired bodies are candidates for removal, not removed — the owning
/// application decides.
#[derive(Clone, Debug, Default)]
pub struct StepReport {
    /// Index pairs (a < b) whose circles overlapped this step.
    pub contacts: SmallVec<[(usize, usize); 8]>,
    /// Indices whose lifetime reached zero or below this step.
    pub expired: SmallVec<[usize; 4]>,
}

/// Circle-circle collision predicate with a precomputed distance.
pub fn collides_at(a: &Body, b: &Body, distance: f32) -> bool {
    distance <= a.r() + b.r()
}

/// Shape-aware collision predicate. Placeholder: always reports no
/// collision until shape-aware detection exists. Use [`collides_at`].
pub fn collides(_a: &Body, _b: &Body) -> bool {
    false
}

/// The simulation world: the body store plus physics parameters and the
/// designated reference (player) body.
#[derive(Clone, Debug, Default)]
pub struct World {
    store: BodyStore,
    /// Global physics parameters, mutable at runtime.
    pub params: WorldParams,
    player: Option<BodyId>,
    /// Scratch acceleration buffer, reused across steps.
    scratch_acc: Vec<Vec2>,
}

impl World {
    /// An empty world with the given parameters.
    pub fn new(params: WorldParams) -> Self {
        Self {
            store: BodyStore::new(),
            params,
            player: None,
            scratch_acc: Vec::new(),
        }
    }

    /// The body store.
    pub fn store(&self) -> &BodyStore {
        &self.store
    }

    /// Mutable access to the body store.
    pub fn store_mut(&mut self) -> &mut BodyStore {
        &mut self.store
    }

    /// Designate the reference (player) body for reference-only gravity
    /// and thrust control.
    pub fn set_player(&mut self, id: BodyId) {
        self.player = Some(id);
    }

    /// The designated player's id, if one is set.
    pub fn player(&self) -> Option<BodyId> {
        self.player
    }

    /// The player's current dense index. `None` if unset or stale.
    pub fn player_index(&self) -> Option<usize> {
        self.player.and_then(|id| self.store.index_of(id))
    }

    /// The index gravity references in reference-only mode: the player
    /// if resolvable, else body 0.
    fn reference_index(&self) -> Option<usize> {
        self.player_index()
            .or_else(|| (!self.store.is_empty()).then_some(0))
    }

    /// Advance every body by `dt` seconds (negative reverses the slice).
    ///
    /// Order per the model: gravity accumulation, thrust, velocity
    /// integration, friction, position integration, collision detection,
    /// lifetime decrement, hook dispatch.
    pub fn step(&mut self, dt: f32, hook: &mut InteractionHook<'_>) -> StepReport {
        let n = self.store.len();
        let mut report = StepReport::default();
        if n == 0 {
            return report;
        }

        self.scratch_acc.clear();
        self.scratch_acc.resize(n, Vec2::ZERO);
        self.accumulate_gravity();
        self.accumulate_thrust();

        // Semi-implicit Euler: velocity first, then position from the
        // updated velocity. Friction scales with dt so a reversed slice
        // remains a consistent inverse of a forward one.
        let friction = self.params.friction;
        for (body, acc) in self.store.iter_mut().zip(&self.scratch_acc) {
            body.v += *acc * dt;
            body.v -= body.v * friction * dt;
            body.p += body.v * dt;
        }

        self.detect_collisions(&mut report);

        for (index, body) in self.store.iter_mut().enumerate() {
            body.lifetime -= dt;
            if body.lifetime <= 0.0 {
                report.expired.push(index);
            }
        }

        for &(a, b) in &report.contacts {
            hook(&mut self.store, ContactKind::Collision, a, b);
        }

        report
    }

    /// Gravitational acceleration from `other` felt at `p`, with the
    /// separation floored before the inverse-square division.
    fn gravity_from(&self, p: Vec2, other: &Body) -> Vec2 {
        let offset = other.p - p;
        let d = offset.length().max(self.params.min_separation);
        // a = G·m/d² along the (floored) separation direction.
        offset * (self.params.g * other.mass() / (d * d * d))
    }

    fn accumulate_gravity(&mut self) {
        let mut acc = std::mem::take(&mut self.scratch_acc);
        if self.params.interact_all {
            for (i, body) in self.store.iter().enumerate() {
                if body.gravity_immune {
                    continue;
                }
                let p = body.p;
                for (j, other) in self.store.iter().enumerate() {
                    if i != j {
                        acc[i] += self.gravity_from(p, other);
                    }
                }
            }
        } else if let Some(r) = self.reference_index() {
            let reference = self.store.get(r).expect("reference index in range");
            let ref_p = reference.p;
            let ref_immune = reference.gravity_immune;
            for (i, body) in self.store.iter().enumerate() {
                if i == r {
                    continue;
                }
                if !body.gravity_immune {
                    acc[i] += self.gravity_from(body.p, reference);
                }
                if !ref_immune {
                    acc[r] += self.gravity_from(ref_p, body);
                }
            }
        }
        self.scratch_acc = acc;
    }

    fn accumulate_thrust(&mut self) {
        for (i, body) in self.store.iter().enumerate() {
            if let Some(thrusters) = &body.thrusters {
                self.scratch_acc[i] += thrusters.acceleration();
            }
        }
    }

    /// Scan the same pairs gravity considered: all pairs in
    /// `interact_all` mode, reference-vs-rest otherwise.
    fn detect_collisions(&self, report: &mut StepReport) {
        let n = self.store.len();
        if self.params.interact_all {
            for i in 0..n {
                let a = self.store.get(i).expect("index in range");
                for j in (i + 1)..n {
                    let b = self.store.get(j).expect("index in range");
                    if collides_at(a, b, a.p.distance(b.p)) {
                        report.contacts.push((i, j));
                    }
                }
            }
        } else if let Some(r) = self.reference_index() {
            let reference = self.store.get(r).expect("reference index in range");
            for i in 0..n {
                if i == r {
                    continue;
                }
                let b = self.store.get(i).expect("index in range");
                if collides_at(reference, b, reference.p.distance(b.p)) {
                    report.contacts.push((r.min(i), r.max(i)));
                }
            }
        }
    }
}
