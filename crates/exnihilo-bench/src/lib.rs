//! Shared profiles for exnihilo benchmarks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use exnihilo_engine::SimConfig;
use exnihilo_world::WorldParams;

/// A populated reference-gravity profile: `bodies` bodies around the
/// player, O(n) gravity.
pub fn reference_profile(seed: u64, bodies: u32) -> SimConfig {
    SimConfig {
        seed,
        initial_bodies: bodies,
        ..Default::default()
    }
}

/// The same population with pairwise gravity, O(n²).
pub fn pairwise_profile(seed: u64, bodies: u32) -> SimConfig {
    SimConfig {
        params: WorldParams {
            interact_all: true,
            ..WorldParams::default()
        },
        seed,
        initial_bodies: bodies,
        ..Default::default()
    }
}
