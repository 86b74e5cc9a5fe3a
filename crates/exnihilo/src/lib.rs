//! Exnihilo: a real-time 2D gravitational sandbox engine.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all exnihilo sub-crates. For most users, adding `exnihilo` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use exnihilo::prelude::*;
//!
//! // A paused world with a player and three spawned bodies.
//! let config = SimConfig {
//!     initial_bodies: 3,
//!     ..Default::default()
//! };
//! let mut session = LockstepSession::new(&config).unwrap();
//! let result = session.step_sync(&[Intent::TogglePause], 1.0 / 30.0);
//! assert_eq!(result.frame.bodies.len(), 4);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `exnihilo-core` | IDs, intents, vectors, color mapping, error types |
//! | [`world`] | `exnihilo-world` | Bodies, the store, the physics stepper, the spawner |
//! | [`engine`] | `exnihilo-engine` | Timebase, snapshots, frames, session modes |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, intents, and IDs (`exnihilo-core`).
///
/// Contains [`types::Vec2`], [`types::Intent`], generation-checked
/// [`types::BodyId`], snapshot slots, and the error enums.
pub use exnihilo_core as types;

/// Bodies and physics (`exnihilo-world`).
///
/// The [`world::BodyStore`], the [`world::World`] stepper, and the
/// seeded [`world::Spawner`].
pub use exnihilo_world as world;

/// Simulation engine and session modes (`exnihilo-engine`).
///
/// [`engine::LockstepSession`] for synchronous stepping,
/// [`engine::RealtimeSession`] for the threaded interactive mode.
pub use exnihilo_engine as engine;

/// Common imports for typical exnihilo usage.
///
/// ```rust
/// use exnihilo::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use exnihilo_core::{
        BodyId, CycleId, Intent, SnapshotError, SnapshotSlot, SubmitError, ThrustDir, Vec2,
    };

    // World
    pub use exnihilo_world::{
        Body, BodySpec, BodyStore, ContactKind, StepReport, StoreEvent, Thrusters, World,
        WorldParams,
    };

    // Engine
    pub use exnihilo_engine::{
        BodyView, ConfigError, CycleMetrics, Frame, Hold, IntentSource, LockstepSession,
        RealtimeSession, SimConfig, SimEngine,
    };
}
