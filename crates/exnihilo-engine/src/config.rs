//! Session configuration, validation, and error types.
//!
//! [`SimConfig`] is the input for constructing a simulation session in
//! either mode. [`validate()`](SimConfig::validate) checks structural
//! invariants at startup so the session constructors can assume a sane
//! shape throughout.

use std::error::Error;
use std::fmt;

use exnihilo_world::body::DENSITY_ROCK;
use exnihilo_world::spawn::GLOBE_RADIUS;
use exnihilo_world::{SpawnRanges, WorldParams};

use crate::timebase::IterationBudget;

/// Default radius of the player reference body, m.
pub const DEFAULT_PLAYER_RADIUS: f32 = GLOBE_RADIUS;

/// Default thrust level applied while a thrust intent is held, m/s².
pub const DEFAULT_THRUST: f32 = 6.0e4;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// frame_rate_hz is NaN, infinite, zero, or negative.
    InvalidFrameRate {
        /// The invalid value.
        value: f64,
    },
    /// Intent queue capacity is zero.
    IntentQueueZero,
    /// A physics parameter is NaN, infinite, or out of range.
    InvalidPhysics {
        /// Which parameter failed.
        field: &'static str,
        /// The invalid value.
        value: f32,
    },
    /// min_separation must be positive (it floors a division).
    NonPositiveSeparation {
        /// The invalid value.
        value: f32,
    },
    /// A spawn range is empty or inverted.
    EmptySpawnRange {
        /// Which range failed.
        field: &'static str,
    },
    /// Engine could not be recovered from the updater thread
    /// (e.g. the thread panicked).
    EngineRecoveryFailed,
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrameRate { value } => {
                write!(f, "frame_rate_hz must be finite and positive, got {value}")
            }
            Self::IntentQueueZero => write!(f, "intent_queue_capacity must be at least 1"),
            Self::InvalidPhysics { field, value } => {
                write!(f, "invalid {field}: {value}")
            }
            Self::NonPositiveSeparation { value } => {
                write!(f, "min_separation must be positive, got {value}")
            }
            Self::EmptySpawnRange { field } => {
                write!(f, "spawn range {field} is empty")
            }
            Self::EngineRecoveryFailed => {
                write!(f, "engine could not be recovered from updater thread")
            }
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── SimConfig ──────────────────────────────────────────────────────

/// Configuration for a simulation session.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Physics parameters handed to the world.
    pub params: WorldParams,
    /// Sampling ranges for spawned bodies.
    pub spawn_ranges: SpawnRanges,
    /// Density given to spawned bodies, kg/m³.
    pub default_density: f32,
    /// Radius of the player reference body, m.
    pub player_radius: f32,
    /// Thrust level engaged by a thrust-start intent, m/s².
    pub thrust_force: f32,
    /// RNG seed for the spawner.
    pub seed: u64,
    /// Number of bodies to populate at startup (besides the player).
    pub initial_bodies: u32,
    /// Cap on physics iterations, `None` for unbounded.
    pub iteration_limit: Option<u64>,
    /// Capacity of the bounded intent channel between the input task
    /// and the updater.
    pub intent_queue_capacity: usize,
    /// Target updater frame rate, Hz (realtime mode pacing).
    pub frame_rate_hz: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            params: WorldParams::default(),
            spawn_ranges: SpawnRanges::default(),
            default_density: DENSITY_ROCK / 2.0,
            player_radius: DEFAULT_PLAYER_RADIUS,
            thrust_force: DEFAULT_THRUST,
            seed: 0,
            initial_bodies: 0,
            iteration_limit: None,
            intent_queue_capacity: 64,
            frame_rate_hz: 30.0,
        }
    }
}

impl SimConfig {
    /// Check structural invariants. Called by both session constructors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.frame_rate_hz.is_finite() || self.frame_rate_hz <= 0.0 {
            return Err(ConfigError::InvalidFrameRate {
                value: self.frame_rate_hz,
            });
        }
        if self.intent_queue_capacity == 0 {
            return Err(ConfigError::IntentQueueZero);
        }
        for (field, value) in [
            ("g", self.params.g),
            ("friction", self.params.friction),
            ("min_separation", self.params.min_separation),
            ("thrust_force", self.thrust_force),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidPhysics { field, value });
            }
        }
        for (field, value) in [
            ("default_density", self.default_density),
            ("player_radius", self.player_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidPhysics { field, value });
            }
        }
        if self.params.min_separation <= 0.0 {
            return Err(ConfigError::NonPositiveSeparation {
                value: self.params.min_separation,
            });
        }
        for (field, range) in [
            ("radius", &self.spawn_ranges.radius),
            ("offset", &self.spawn_ranges.offset),
            ("velocity", &self.spawn_ranges.velocity),
        ] {
            if range.is_empty() {
                return Err(ConfigError::EmptySpawnRange { field });
            }
        }
        Ok(())
    }

    /// The iteration budget this config asks for.
    pub fn budget(&self) -> IterationBudget {
        match self.iteration_limit {
            Some(limit) => IterationBudget::capped(limit),
            None => IterationBudget::unbounded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_frame_rate_rejected() {
        let config = SimConfig {
            frame_rate_hz: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidFrameRate { value: 0.0 })
        );
    }

    #[test]
    fn nan_friction_rejected() {
        let mut config = SimConfig::default();
        config.params.friction = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPhysics {
                field: "friction",
                ..
            })
        ));
    }

    #[test]
    fn zero_player_radius_rejected() {
        let config = SimConfig {
            player_radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPhysics {
                field: "player_radius",
                ..
            })
        ));
    }

    #[test]
    fn zero_separation_rejected() {
        let mut config = SimConfig::default();
        config.params.min_separation = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveSeparation { value: 0.0 })
        );
    }

    #[test]
    fn zero_queue_capacity_rejected() {
        let config = SimConfig {
            intent_queue_capacity: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::IntentQueueZero));
    }

    #[test]
    fn inverted_spawn_range_rejected() {
        let mut config = SimConfig::default();
        config.spawn_ranges.radius = 10.0..1.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptySpawnRange { field: "radius" })
        );
    }

    #[test]
    fn budget_follows_iteration_limit() {
        let unbounded = SimConfig::default();
        assert_eq!(unbounded.budget().limit(), None);

        let capped = SimConfig {
            iteration_limit: Some(100),
            ..Default::default()
        };
        assert_eq!(capped.budget().limit(), Some(100));
    }
}
