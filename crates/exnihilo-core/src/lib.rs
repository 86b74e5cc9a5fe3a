//! Core types for the exnihilo gravitational sandbox engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the workspace: 2D vector
//! math, strongly-typed identifiers, the intent (command) vocabulary,
//! the temperature-to-color mapping, and the shared error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod color;
pub mod error;
pub mod id;
pub mod intent;
pub mod math;

pub use color::temperature_to_rgb;
pub use error::{SnapshotError, SubmitError};
pub use id::{BodyId, CycleId, SnapshotSlot};
pub use intent::{Intent, ThrustDir};
pub use math::Vec2;
