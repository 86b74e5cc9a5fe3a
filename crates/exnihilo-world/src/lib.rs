//! Body store and physics stepper for the exnihilo sandbox engine.
//!
//! [`World`] owns the set of simulated bodies plus the physics
//! parameters, and advances them one time slice at a time via
//! [`World::step`]. Bodies are addressed by dense index (insertion
//! order, shifting on removal) or by generation-checked
//! [`BodyId`](exnihilo_core::BodyId) for external collaborators that
//! outlive removals.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod body;
pub mod physics;
pub mod spawn;
pub mod store;

pub use body::{Body, BodySpec, Thrusters};
pub use physics::{ContactKind, InteractionHook, StepReport, World, WorldParams};
pub use spawn::{SpawnRanges, Spawner};
pub use store::{BodyStore, StoreEvent};
