//! The update cycle: intent application, one physics step, event
//! consequences, and frame capture.
//!
//! [`SimEngine`] is single-threaded and owned exclusively by whichever
//! session mode drives it (the updater thread in realtime mode, the
//! caller in lockstep mode). All cross-thread concerns live in the
//! session modules; this one is pure sequencing.

use exnihilo_core::id::CycleId;
use exnihilo_core::intent::Intent;
use exnihilo_world::body::DENSITY_ROCK;
use exnihilo_world::{Body, BodySpec, ContactKind, Spawner, Thrusters, World};

use crate::config::{ConfigError, SimConfig};
use crate::frame::Frame;
use crate::metrics::CycleMetrics;
use crate::snapshot::{SnapshotStore, WorldSnapshot};
use crate::timebase::Timebase;

/// Temperature added to each participant of a collision, K.
pub const COLLISION_HEAT: f32 = 500.0;

/// Pinned display color of the player body.
pub const PLAYER_COLOR: u32 = 0xb0_2000;

/// Everything one update cycle produced.
#[derive(Clone, Debug)]
pub struct CycleResult {
    /// The published view of the cycle.
    pub frame: Frame,
    /// Bookkeeping for the cycle.
    pub metrics: CycleMetrics,
    /// Whether a terminate intent was seen this cycle.
    pub terminate: bool,
}

/// The simulation engine: world, timebase, spawner, and snapshots.
#[derive(Debug)]
pub struct SimEngine {
    world: World,
    timebase: Timebase,
    spawner: Spawner,
    snapshots: SnapshotStore,
    thrust_force: f32,
    cycle: CycleId,
}

impl SimEngine {
    /// Build an engine from a validated config: a player body with idle
    /// thrusters at the origin, plus `initial_bodies` spawned around it.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new(config.params);
        let (_, player_id) = world.store_mut().add(Body::new(BodySpec {
            r: config.player_radius,
            density: DENSITY_ROCK,
            lifetime: f32::INFINITY,
            color: PLAYER_COLOR,
            thrusters: Some(Thrusters::idle()),
            ..Default::default()
        }));
        world.set_player(player_id);

        let mut spawner = Spawner::from_seed(config.seed);
        spawner.ranges = config.spawn_ranges.clone();
        spawner.density = config.default_density;

        let mut engine = Self {
            world,
            timebase: Timebase::new(config.budget()),
            spawner,
            snapshots: SnapshotStore::new(),
            thrust_force: config.thrust_force,
            cycle: CycleId::default(),
        };
        engine.spawn_bodies(config.initial_bodies);
        Ok(engine)
    }

    /// The live world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the live world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The model-time controller.
    pub fn timebase(&self) -> &Timebase {
        &self.timebase
    }

    /// Mutable access to the model-time controller.
    pub fn timebase_mut(&mut self) -> &mut Timebase {
        &mut self.timebase
    }

    /// The snapshot store.
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// The most recently completed cycle.
    pub fn cycle(&self) -> CycleId {
        self.cycle
    }

    /// Run one full update cycle: apply `intents` in order, advance the
    /// timebase, step physics if the timebase permits, remove expired
    /// bodies, and capture the resulting frame.
    pub fn execute_cycle(&mut self, intents: &[Intent], frame_delay: f32) -> CycleResult {
        self.cycle = self.cycle.next();
        let mut metrics = CycleMetrics {
            cycle: self.cycle,
            ..Default::default()
        };

        let mut terminate = false;
        for &intent in intents {
            match self.apply_intent(intent) {
                Ok(true) => terminate = true,
                Ok(false) => {}
                Err(_not_found) => metrics.failed_snapshot_loads += 1,
            }
            metrics.intents_applied += 1;
        }

        match self.timebase.next_dt(frame_delay) {
            Ok(dt) => {
                let report = self.world.step(dt, &mut |store, kind, a, b| {
                    if kind == ContactKind::Collision {
                        if let Some(body) = store.get_mut(a) {
                            body.t += COLLISION_HEAT;
                        }
                        if let Some(body) = store.get_mut(b) {
                            body.t += COLLISION_HEAT;
                        }
                    }
                });
                metrics.model_dt = dt;
                metrics.contacts = report.contacts.len();
                metrics.expired_removed = self.remove_expired(&report.expired);
            }
            Err(hold) => metrics.held = Some(hold),
        }

        metrics.bodies = self.world.store().len();
        let frame = Frame::capture(self.cycle, self.timebase.model_time(), &mut self.world);
        CycleResult {
            frame,
            metrics,
            terminate,
        }
    }

    /// Apply one intent. `Ok(true)` means terminate was requested;
    /// `Err` reports a failed snapshot load (live state untouched).
    pub fn apply_intent(
        &mut self,
        intent: Intent,
    ) -> Result<bool, exnihilo_core::error::SnapshotError> {
        match intent {
            Intent::ThrustStart(dir) => self.set_player_thrust(dir, self.thrust_force),
            Intent::ThrustStop(dir) => self.set_player_thrust(dir, 0.0),
            Intent::SetTimeScale(scale) => self.timebase.set_scale(scale),
            Intent::ScaleTime(factor) => self.timebase.scale_by(factor),
            Intent::ToggleReversed => {
                self.timebase.toggle_reversed();
            }
            Intent::TogglePause => {
                self.timebase.toggle_pause();
            }
            Intent::StepFrames(frames) => self.timebase.step_frames(frames),
            Intent::ToggleFixedDt => {
                self.timebase.toggle_fixed_dt();
            }
            Intent::SetFixedDt(dt) => self.timebase.set_fixed_dt(dt),
            Intent::ToggleInteractAll => {
                self.world.params.interact_all = !self.world.params.interact_all;
            }
            Intent::AdjustFriction(delta) => {
                let friction = (self.world.params.friction + delta).max(0.0);
                self.world.params.friction = friction;
            }
            Intent::SpawnBodies(count) => self.spawn_bodies(count),
            Intent::RemoveBodies(count) => self.remove_bodies(count),
            Intent::SaveSnapshot(slot) => {
                self.snapshots.save(
                    slot,
                    WorldSnapshot {
                        world: self.world.clone(),
                        timebase: self.timebase.shape(),
                    },
                );
            }
            Intent::LoadSnapshot(slot) => {
                let snapshot = self.snapshots.load(slot)?;
                self.world = snapshot.world.clone();
                self.timebase.restore(snapshot.timebase);
                self.world.store_mut().mark_reloaded();
            }
            Intent::Terminate => return Ok(true),
        }
        Ok(false)
    }

    fn set_player_thrust(&mut self, dir: exnihilo_core::intent::ThrustDir, level: f32) {
        if let Some(index) = self.world.player_index() {
            if let Some(body) = self.world.store_mut().get_mut(index) {
                if let Some(thrusters) = &mut body.thrusters {
                    thrusters.set_level(dir, level);
                }
            }
        }
    }

    fn spawn_bodies(&mut self, count: u32) {
        for _ in 0..count {
            let reference = self
                .world
                .player_index()
                .and_then(|i| self.world.store().get(i))
                .cloned();
            let spec = self.spawner.spawn_spec(reference.as_ref());
            self.world.store_mut().add(Body::new(spec));
        }
    }

    /// Remove up to `count` bodies, newest first, never the player.
    fn remove_bodies(&mut self, count: u32) {
        let mut remaining = count;
        let mut index = self.world.store().len();
        while remaining > 0 && index > 0 {
            index -= 1;
            if self.world.player_index() == Some(index) {
                continue;
            }
            self.world.store_mut().remove(index);
            remaining -= 1;
        }
    }

    /// Remove expired bodies, highest index first so earlier indices in
    /// the report stay valid. The player is never expired away.
    fn remove_expired(&mut self, expired: &[usize]) -> usize {
        let mut removed = 0;
        let mut indices: Vec<usize> = expired.to_vec();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        for index in indices {
            if self.world.player_index() == Some(index) {
                continue;
            }
            self.world.store_mut().remove(index);
            removed += 1;
        }
        removed
    }
}
