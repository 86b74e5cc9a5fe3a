//! Frame publication: the updater's output to presentation code.
//!
//! Each cycle the updater produces a [`Frame`] — a self-contained view
//! of everything a renderer needs, detached from the live world so the
//! presenting thread never touches simulation state. Frames flow through
//! a [`FrameCell`] with latest-wins semantics: a slow consumer sees the
//! newest frame, never a backlog.

use std::sync::Mutex;

use exnihilo_core::id::CycleId;
use exnihilo_core::math::Vec2;
use exnihilo_world::{StoreEvent, World};

/// One body, as a renderer sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyView {
    /// Position, m.
    pub p: Vec2,
    /// Radius, m.
    pub r: f32,
    /// Presented RGB color (pinned or temperature-derived).
    pub color: u32,
    /// Whether this body is the player.
    pub is_player: bool,
}

/// A published view of one update cycle.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /// The cycle that produced this frame.
    pub cycle: CycleId,
    /// Signed model seconds elapsed over the session.
    pub model_time: f64,
    /// All bodies, in store order.
    pub bodies: Vec<BodyView>,
    /// Store mutations since the previous frame, for index-keyed caches.
    pub events: Vec<StoreEvent>,
}

impl Frame {
    /// Capture a frame from the live world, draining its event journal.
    pub fn capture(cycle: CycleId, model_time: f64, world: &mut World) -> Self {
        let player = world.player_index();
        let bodies = world
            .store()
            .iter()
            .enumerate()
            .map(|(i, body)| BodyView {
                p: body.p,
                r: body.r(),
                color: body.display_color(),
                is_player: player == Some(i),
            })
            .collect();
        Self {
            cycle,
            model_time,
            bodies,
            events: world.store_mut().drain_events(),
        }
    }
}

/// A single-slot, latest-wins frame mailbox.
///
/// The updater overwrites, the consumer takes. Contention is two
/// threads touching one small `Option`; a mutex is plenty.
#[derive(Debug, Default)]
pub struct FrameCell {
    latest: Mutex<Option<Frame>>,
}

impl FrameCell {
    /// An empty cell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a frame, replacing any unconsumed predecessor. Returns
    /// the frame that was displaced, if any.
    pub fn publish(&self, frame: Frame) -> Option<Frame> {
        self.latest
            .lock()
            .expect("frame cell poisoned")
            .replace(frame)
    }

    /// Take the newest frame, leaving the cell empty.
    pub fn take(&self) -> Option<Frame> {
        self.latest.lock().expect("frame cell poisoned").take()
    }
}
