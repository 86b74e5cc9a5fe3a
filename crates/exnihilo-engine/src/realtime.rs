//! Realtime (threaded) simulation session.
//!
//! The primary interactive mode: the engine runs on a dedicated updater
//! thread at a configurable frame rate, while input arrives from other
//! threads through a bounded intent channel. Frames come back through a
//! latest-wins [`FrameCell`].
//!
//! # Architecture
//!
//! ```text
//! Input task / callers         Updater thread
//!     |                            |
//!     |--submit(intent)----------->| intent_rx.try_recv() (drain)
//!     |   [intent_tx: bounded(N)]  | engine.execute_cycle()
//!     |                            | frames.publish(frame)
//!     |                            | sleep(budget - elapsed)
//!     |<--frames.take()------------|
//! ```
//!
//! Every intent crosses the channel whole, so the updater either sees a
//! submitted intent in full or not yet — there is no shared mutable
//! event record for the two sides to half-read. Back-pressure is the
//! channel bound: [`submit()`](RealtimeSession::submit) never blocks and
//! reports a full channel, while the dedicated input task prefers
//! blocking over dropping input.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TrySendError};

use exnihilo_core::error::SubmitError;
use exnihilo_core::intent::Intent;

use crate::config::{ConfigError, SimConfig};
use crate::engine::SimEngine;
use crate::frame::{Frame, FrameCell};

// ── IntentSource ─────────────────────────────────────────────────

/// A blocking producer of intents, driven by the dedicated input task.
///
/// `next_intent` should block until input is available and return
/// `None` when the source is exhausted (its upstream closed), at which
/// point the input task exits.
pub trait IntentSource: Send {
    /// Block for the next intent; `None` ends the input task.
    fn next_intent(&mut self) -> Option<Intent>;
}

/// Any crossbeam receiver of intents is a source: it blocks on `recv`
/// and ends when every sender is dropped.
impl IntentSource for Receiver<Intent> {
    fn next_intent(&mut self) -> Option<Intent> {
        self.recv().ok()
    }
}

// ── Updater thread ───────────────────────────────────────────────

struct UpdaterState {
    engine: SimEngine,
    intent_rx: Receiver<Intent>,
    frames: Arc<FrameCell>,
    shutdown_flag: Arc<AtomicBool>,
    frame_budget: Duration,
}

impl UpdaterState {
    /// Main update loop. Runs until the shutdown flag is set or a
    /// terminate intent arrives. Consumes self and returns the
    /// `SimEngine` so the session can recover it for inspection.
    fn run(mut self) -> SimEngine {
        let mut intents = Vec::new();
        let mut last_cycle = Instant::now();

        loop {
            if self.shutdown_flag.load(Ordering::Acquire) {
                break;
            }

            let cycle_start = Instant::now();

            // 1. Drain the intent channel.
            intents.clear();
            while let Ok(intent) = self.intent_rx.try_recv() {
                intents.push(intent);
            }

            // 2. Execute one cycle against the measured frame delay.
            let frame_delay = cycle_start.duration_since(last_cycle).as_secs_f32();
            last_cycle = cycle_start;
            let result = self.engine.execute_cycle(&intents, frame_delay);

            // 3. Publish, latest-wins.
            self.frames.publish(result.frame);

            if result.terminate {
                self.shutdown_flag.store(true, Ordering::Release);
                break;
            }

            // 4. Sleep for the remaining budget.
            let elapsed = cycle_start.elapsed();
            if let Some(remaining) = self.frame_budget.checked_sub(elapsed) {
                thread::sleep(remaining);
            }
        }

        self.engine
    }
}

// ── RealtimeSession ──────────────────────────────────────────────

/// Realtime simulation session.
///
/// Owns the updater thread and, optionally, one input task. Dropping
/// the session shuts both down; [`shutdown()`](Self::shutdown) does the
/// same but reports errors and makes the engine available through
/// [`recovered_engine()`](Self::recovered_engine).
pub struct RealtimeSession {
    intent_tx: Option<Sender<Intent>>,
    frames: Arc<FrameCell>,
    shutdown_flag: Arc<AtomicBool>,
    updater: Option<JoinHandle<SimEngine>>,
    input_task: Option<JoinHandle<()>>,
    recovered: Option<SimEngine>,
}

impl RealtimeSession {
    /// Validate the config, build the engine, and spawn the updater.
    ///
    /// The engine is constructed on the calling thread so configuration
    /// errors surface here, then moved into the updater thread.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        let engine = SimEngine::new(config)?;

        let frames = Arc::new(FrameCell::new());
        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let (intent_tx, intent_rx) = crossbeam_channel::bounded(config.intent_queue_capacity);

        let state = UpdaterState {
            engine,
            intent_rx,
            frames: Arc::clone(&frames),
            shutdown_flag: Arc::clone(&shutdown_flag),
            frame_budget: Duration::from_secs_f64(1.0 / config.frame_rate_hz),
        };
        let updater = thread::Builder::new()
            .name("exnihilo-updater".into())
            .spawn(move || state.run())
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;

        Ok(Self {
            intent_tx: Some(intent_tx),
            frames,
            shutdown_flag,
            updater: Some(updater),
            input_task: None,
            recovered: None,
        })
    }

    /// Spawn the dedicated input task, forwarding everything `source`
    /// produces into the intent channel.
    ///
    /// The task blocks inside the source between intents and blocks on
    /// the channel when it is full (input is never silently dropped).
    /// It exits when the source is exhausted or the session shuts down.
    pub fn attach_source(
        &mut self,
        mut source: impl IntentSource + 'static,
    ) -> Result<(), ConfigError> {
        let tx = self
            .intent_tx
            .clone()
            .ok_or_else(|| ConfigError::ThreadSpawnFailed {
                reason: "session already shut down".into(),
            })?;
        let handle = thread::Builder::new()
            .name("exnihilo-input".into())
            .spawn(move || {
                while let Some(intent) = source.next_intent() {
                    if tx.send(intent).is_err() {
                        break; // updater gone
                    }
                }
            })
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;
        self.input_task = Some(handle);
        Ok(())
    }

    /// Submit one intent without blocking.
    ///
    /// The intent is applied at the top of the updater's next cycle.
    pub fn submit(&self, intent: Intent) -> Result<(), SubmitError> {
        let tx = self.intent_tx.as_ref().ok_or(SubmitError::Shutdown)?;
        tx.try_send(intent).map_err(|e| match e {
            TrySendError::Full(_) => SubmitError::ChannelFull,
            TrySendError::Disconnected(_) => SubmitError::Shutdown,
        })
    }

    /// Take the newest published frame, if one arrived since the last
    /// take.
    pub fn latest_frame(&self) -> Option<Frame> {
        self.frames.take()
    }

    /// Whether the updater has stopped (terminate intent or shutdown).
    pub fn is_stopped(&self) -> bool {
        self.shutdown_flag.load(Ordering::Acquire)
    }

    /// Stop both threads and recover the engine.
    ///
    /// Idempotent. The input task is joined first (its channel sender
    /// is dropped here, so a source backed by a disconnected upstream
    /// unblocks), then the updater.
    pub fn shutdown(&mut self) -> Result<(), ConfigError> {
        self.shutdown_flag.store(true, Ordering::Release);
        self.intent_tx = None;

        if let Some(handle) = self.input_task.take() {
            if handle.join().is_err() {
                return Err(ConfigError::ThreadSpawnFailed {
                    reason: "input task panicked".into(),
                });
            }
        }
        if let Some(handle) = self.updater.take() {
            match handle.join() {
                Ok(engine) => self.recovered = Some(engine),
                Err(_) => return Err(ConfigError::EngineRecoveryFailed),
            }
        }
        Ok(())
    }

    /// The engine recovered by [`shutdown()`](Self::shutdown), for
    /// post-run inspection.
    pub fn recovered_engine(&self) -> Option<&SimEngine> {
        self.recovered.as_ref()
    }
}

impl Drop for RealtimeSession {
    fn drop(&mut self) {
        // Best-effort: join errors have nowhere to go from a destructor.
        let _ = self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exnihilo_world::WorldParams;
    use std::time::Duration;

    fn fast_config() -> SimConfig {
        SimConfig {
            params: WorldParams {
                g: 0.0,
                friction: 0.0,
                ..WorldParams::default()
            },
            frame_rate_hz: 500.0,
            ..Default::default()
        }
    }

    fn wait_until(mut check: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if check() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn frames_are_published_and_cycles_advance() {
        let mut session = RealtimeSession::new(&fast_config()).unwrap();
        let mut last_cycle = 0;
        assert!(wait_until(|| {
            if let Some(frame) = session.latest_frame() {
                last_cycle = frame.cycle.0;
            }
            last_cycle >= 3
        }));
        session.shutdown().unwrap();
    }

    #[test]
    fn submitted_intent_reaches_the_engine() {
        let mut session = RealtimeSession::new(&fast_config()).unwrap();
        session.submit(Intent::SpawnBodies(3)).unwrap();
        assert!(wait_until(|| {
            session
                .latest_frame()
                .is_some_and(|f| f.bodies.len() == 4)
        }));
        session.shutdown().unwrap();
        let engine = session.recovered_engine().unwrap();
        assert_eq!(engine.world().store().len(), 4);
    }

    #[test]
    fn terminate_intent_stops_the_updater() {
        let mut session = RealtimeSession::new(&fast_config()).unwrap();
        session.submit(Intent::Terminate).unwrap();
        assert!(wait_until(|| session.is_stopped()));
        session.shutdown().unwrap();
        assert!(session.recovered_engine().is_some());
    }

    #[test]
    fn submit_after_shutdown_reports_shutdown() {
        let mut session = RealtimeSession::new(&fast_config()).unwrap();
        session.shutdown().unwrap();
        assert_eq!(
            session.submit(Intent::TogglePause),
            Err(SubmitError::Shutdown)
        );
    }

    #[test]
    fn input_task_forwards_a_channel_source() {
        let mut session = RealtimeSession::new(&fast_config()).unwrap();
        let (tx, rx) = crossbeam_channel::unbounded::<Intent>();
        session.attach_source(rx).unwrap();

        tx.send(Intent::SpawnBodies(2)).unwrap();
        assert!(wait_until(|| {
            session
                .latest_frame()
                .is_some_and(|f| f.bodies.len() == 3)
        }));

        // Closing the upstream ends the input task; shutdown then joins
        // cleanly instead of hanging on a blocked source.
        drop(tx);
        session.shutdown().unwrap();
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut session = RealtimeSession::new(&fast_config()).unwrap();
        session.shutdown().unwrap();
        session.shutdown().unwrap();
    }
}
