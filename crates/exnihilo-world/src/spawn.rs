//! Seeded random body generation.
//!
//! The spawner is the only source of randomness in the crate; it owns a
//! seeded ChaCha8 stream so populated worlds are reproducible run to run.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::ops::Range;

use crate::body::{Body, BodySpec, DENSITY_ROCK};
use exnihilo_core::math::Vec2;

/// Scale constant the default ranges are expressed in, m.
pub const GLOBE_RADIUS: f32 = 5.0e7;

/// Sampling ranges for generated bodies.
///
/// Positions and velocities are offsets from a reference body when one
/// is supplied to [`Spawner::spawn_spec`], so a populated cloud travels
/// with the player rather than scattering over absolute space.
#[derive(Clone, Debug)]
pub struct SpawnRanges {
    /// Body radius, m.
    pub radius: Range<f32>,
    /// Position offset from the reference, each axis, m.
    pub offset: Range<f32>,
    /// Velocity offset from the reference, each axis, m/s.
    pub velocity: Range<f32>,
}

impl Default for SpawnRanges {
    fn default() -> Self {
        Self {
            radius: GLOBE_RADIUS / 10.0..GLOBE_RADIUS / 2.0,
            offset: -2.5 * GLOBE_RADIUS..2.5 * GLOBE_RADIUS,
            velocity: -5.0 * GLOBE_RADIUS..5.0 * GLOBE_RADIUS,
        }
    }
}

/// Deterministic random body generator.
#[derive(Clone, Debug)]
pub struct Spawner {
    rng: ChaCha8Rng,
    /// Ranges every generated spec is sampled from.
    pub ranges: SpawnRanges,
    /// Density assigned to every generated body, kg/m³.
    pub density: f32,
}

impl Spawner {
    /// A spawner with the default ranges, seeded for reproducibility.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            ranges: SpawnRanges::default(),
            density: DENSITY_ROCK / 2.0,
        }
    }

    /// Sample one body spec. When `around` is given, position and
    /// velocity are offsets from that body's current state.
    pub fn spawn_spec(&mut self, around: Option<&Body>) -> BodySpec {
        let (base_p, base_v) = match around {
            Some(reference) => (reference.p, reference.v),
            None => (Vec2::ZERO, Vec2::ZERO),
        };
        BodySpec {
            r: self.rng.random_range(self.ranges.radius.clone()),
            density: self.density,
            p: base_p
                + Vec2::new(
                    self.rng.random_range(self.ranges.offset.clone()),
                    self.rng.random_range(self.ranges.offset.clone()),
                ),
            v: base_v
                + Vec2::new(
                    self.rng.random_range(self.ranges.velocity.clone()),
                    self.rng.random_range(self.ranges.velocity.clone()),
                ),
            ..Default::default()
        }
    }
}
