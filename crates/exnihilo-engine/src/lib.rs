//! Simulation engine for the exnihilo gravitational sandbox.
//!
//! Orchestrates the update cycle: intent application, the model-time
//! controller, the physics step, snapshot save/restore, and frame
//! publication. Two session modes drive the engine: synchronous
//! [`LockstepSession`](lockstep::LockstepSession) and threaded
//! [`RealtimeSession`](realtime::RealtimeSession).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod frame;
pub mod lockstep;
pub mod metrics;
pub mod realtime;
pub mod snapshot;
pub mod timebase;

pub use config::{ConfigError, SimConfig};
pub use engine::{CycleResult, SimEngine};
pub use frame::{BodyView, Frame, FrameCell};
pub use lockstep::LockstepSession;
pub use metrics::CycleMetrics;
pub use realtime::{IntentSource, RealtimeSession};
pub use snapshot::{SnapshotStore, WorldSnapshot};
pub use timebase::{DtStats, Hold, IterationBudget, Timebase, TimebaseShape};
