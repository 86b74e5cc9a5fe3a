//! Lockstep (synchronous) simulation session.
//!
//! [`LockstepSession`] is the degraded, single-threaded way to drive the
//! engine: the caller hands intents and a frame delay to
//! [`step_sync()`](LockstepSession::step_sync) and gets the cycle result
//! back before the call returns. No threads, no channels — intent
//! application and physics are strictly serialized, which is exactly
//! what tests and headless batch runs want.

use exnihilo_core::intent::Intent;

use crate::config::{ConfigError, SimConfig};
use crate::engine::{CycleResult, SimEngine};

/// Single-threaded simulation session.
///
/// All mutating methods take `&mut self`; the session is [`Send`] but
/// shares nothing, so there is no state an input task could race with.
pub struct LockstepSession {
    engine: SimEngine,
}

impl LockstepSession {
    /// Build a session from a validated config.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: SimEngine::new(config)?,
        })
    }

    /// Run one update cycle synchronously: apply `intents` in order,
    /// then advance by `frame_delay` (subject to the timebase).
    pub fn step_sync(&mut self, intents: &[Intent], frame_delay: f32) -> CycleResult {
        self.engine.execute_cycle(intents, frame_delay)
    }

    /// The engine, for inspection between cycles.
    pub fn engine(&self) -> &SimEngine {
        &self.engine
    }

    /// Mutable access to the engine between cycles.
    pub fn engine_mut(&mut self) -> &mut SimEngine {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exnihilo_core::id::CycleId;
    use exnihilo_world::WorldParams;

    fn quiet_config() -> SimConfig {
        SimConfig {
            params: WorldParams {
                g: 0.0,
                friction: 0.0,
                ..WorldParams::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn cycles_advance_serially() {
        let mut session = LockstepSession::new(&quiet_config()).unwrap();
        for expected in 1..=5u64 {
            let result = session.step_sync(&[], 0.05);
            assert_eq!(result.frame.cycle, CycleId(expected));
        }
        assert!((session.engine().timebase().real_session_time() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn intents_take_effect_before_the_step() {
        let mut session = LockstepSession::new(&quiet_config()).unwrap();
        // Pause arrives in the same call as the frame delay: the step
        // must already see the pause.
        let result = session.step_sync(&[Intent::TogglePause], 0.1);
        assert_eq!(result.metrics.model_dt, 0.0);
        assert!(result.metrics.held.is_some());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = SimConfig {
            intent_queue_capacity: 0,
            ..Default::default()
        };
        assert!(LockstepSession::new(&config).is_err());
    }
}
