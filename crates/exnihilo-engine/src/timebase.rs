//! Model-time control: pause, reverse, scaling, fixed slices, single
//! stepping, and the iteration budget.
//!
//! The timebase converts a wall-clock frame delay into the signed model
//! dt the stepper should integrate, or decides that no step should run
//! at all this cycle. All the time-manipulation controls compose here,
//! in one place, so the stepper itself stays policy-free.

/// Default model-time scale factor.
pub const DEFAULT_TIME_SCALE: f32 = 1.0;

/// Default fixed slice, seconds, when fixed-dt mode is switched on.
pub const DEFAULT_FIXED_DT: f32 = 1.0 / 30.0;

/// Budget of physics iterations for a session.
///
/// `None` limit means unbounded. When the budget is exhausted the
/// simulation freezes, but explicit single-stepping may still proceed:
/// each such step extends the limit by exactly one, so the budget is a
/// soft wall the operator can lean past deliberately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IterationBudget {
    done: u64,
    limit: Option<u64>,
}

impl IterationBudget {
    /// An unbounded budget.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A budget capped at `limit` iterations.
    pub fn capped(limit: u64) -> Self {
        Self {
            done: 0,
            limit: Some(limit),
        }
    }

    /// Iterations performed so far.
    pub fn done(&self) -> u64 {
        self.done
    }

    /// The current cap, if any.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Whether the budget is exhausted.
    pub fn maxed(&self) -> bool {
        self.limit.is_some_and(|l| self.done >= l)
    }

    /// Count one performed iteration.
    pub fn record(&mut self) {
        self.done += 1;
    }

    /// Raise the cap by one. No-op for unbounded budgets.
    pub fn extend_by_one(&mut self) {
        if let Some(limit) = &mut self.limit {
            *limit += 1;
        }
    }
}

/// Running statistics over the model Δt values actually integrated.
///
/// Signed extrema track the rawest view (reversed slices are negative);
/// the unsigned pair answers "how large did a slice ever get" either way.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DtStats {
    /// Number of slices recorded.
    pub count: u64,
    /// Smallest signed slice seen.
    pub min: f32,
    /// Largest signed slice seen.
    pub max: f32,
    /// Smallest magnitude seen.
    pub abs_min: f32,
    /// Largest magnitude seen.
    pub abs_max: f32,
    /// Sum of signed slices.
    pub total: f64,
}

impl DtStats {
    fn record(&mut self, dt: f32) {
        if self.count == 0 {
            self.min = dt;
            self.max = dt;
            self.abs_min = dt.abs();
            self.abs_max = dt.abs();
        } else {
            self.min = self.min.min(dt);
            self.max = self.max.max(dt);
            self.abs_min = self.abs_min.min(dt.abs());
            self.abs_max = self.abs_max.max(dt.abs());
        }
        self.count += 1;
        self.total += f64::from(dt);
    }
}

/// Why [`Timebase::next_dt`] produced no slice this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hold {
    /// Paused with no pending single-step frames.
    Paused,
    /// Iteration budget exhausted and no explicit step requested.
    BudgetExhausted,
}

/// The restorable subset of [`Timebase`] state, as captured into
/// snapshots. Pause state, pending steps, and accumulated counters are
/// deliberately excluded: restoring a snapshot should not yank the
/// operator out of their current pause or rewind their session clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimebaseShape {
    /// Direction of model time.
    pub reversed: bool,
    /// Scale multiplier.
    pub scale: f32,
    /// Whether fixed-dt mode is on.
    pub fixed_dt_enabled: bool,
    /// The fixed slice magnitude.
    pub fixed_dt: f32,
    /// Last dt handed to the stepper before capture.
    pub last_model_dt: f32,
}

/// The model-time controller.
#[derive(Clone, Debug)]
pub struct Timebase {
    paused: bool,
    reversed: bool,
    scale: f32,
    fixed_dt_enabled: bool,
    fixed_dt: f32,
    /// Pending single-step frames: positive steps forward, negative
    /// backward, consumed one per cycle toward zero.
    stepping: i32,
    /// Whether to resume free-running once `stepping` is exhausted
    /// (the state the operator was in when they requested the steps).
    resume_after_steps: bool,
    budget: IterationBudget,
    /// Accumulated wall-clock session time, s.
    real_session_time: f64,
    /// Accumulated model time, s (signed contributions).
    model_time: f64,
    /// The frame delay most recently fed in.
    last_frame_delay: f32,
    /// The last dt actually handed to the stepper.
    last_model_dt: f32,
    stats: DtStats,
}

impl Default for Timebase {
    fn default() -> Self {
        Self::new(IterationBudget::unbounded())
    }
}

impl Timebase {
    /// A running (unpaused), forward, unit-scale timebase.
    pub fn new(budget: IterationBudget) -> Self {
        Self {
            paused: false,
            reversed: false,
            scale: DEFAULT_TIME_SCALE,
            fixed_dt_enabled: false,
            fixed_dt: DEFAULT_FIXED_DT,
            stepping: 0,
            resume_after_steps: false,
            budget,
            real_session_time: 0.0,
            model_time: 0.0,
            last_frame_delay: 0.0,
            last_model_dt: 0.0,
            stats: DtStats::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Whether continuous advancement is suspended.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether model time currently runs backward.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Current scale multiplier.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Whether fixed-dt mode is on, and the slice it would use.
    pub fn fixed_dt(&self) -> (bool, f32) {
        (self.fixed_dt_enabled, self.fixed_dt)
    }

    /// Pending single-step frames (signed).
    pub fn pending_steps(&self) -> i32 {
        self.stepping
    }

    /// The iteration budget.
    pub fn budget(&self) -> IterationBudget {
        self.budget
    }

    /// Wall-clock seconds accumulated over the session.
    pub fn real_session_time(&self) -> f64 {
        self.real_session_time
    }

    /// Signed model seconds accumulated over the session.
    pub fn model_time(&self) -> f64 {
        self.model_time
    }

    /// The frame delay most recently passed to [`next_dt`](Self::next_dt).
    pub fn last_frame_delay(&self) -> f32 {
        self.last_frame_delay
    }

    /// The dt handed to the stepper on the most recent advancing cycle.
    pub fn last_model_dt(&self) -> f32 {
        self.last_model_dt
    }

    /// Statistics over every model Δt integrated this session.
    pub fn dt_stats(&self) -> DtStats {
        self.stats
    }

    // ── Controls ─────────────────────────────────────────────────

    /// Toggle pause. Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        // A stale step request must not fire on some later pause.
        if !self.paused {
            self.stepping = 0;
            self.resume_after_steps = false;
        }
        self.paused
    }

    /// Toggle the direction of model time.
    pub fn toggle_reversed(&mut self) -> bool {
        self.reversed = !self.reversed;
        self.reversed
    }

    /// Set the scale multiplier absolutely. Non-finite or non-positive
    /// values are ignored.
    pub fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        }
    }

    /// Multiply the scale by `factor` (e.g. 2.0 or 0.5), same guards as
    /// [`set_scale`](Self::set_scale).
    pub fn scale_by(&mut self, factor: f32) {
        self.set_scale(self.scale * factor);
    }

    /// Toggle fixed-dt mode. Returns the new enabled state.
    pub fn toggle_fixed_dt(&mut self) -> bool {
        self.fixed_dt_enabled = !self.fixed_dt_enabled;
        self.fixed_dt_enabled
    }

    /// Set the fixed slice magnitude. Ignored unless finite and positive.
    pub fn set_fixed_dt(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.fixed_dt = dt;
        }
    }

    /// Queue `frames` single-step frames (negative steps backward).
    /// Stepping through a running simulation first suspends it; once
    /// the frames are exhausted the prior running/paused state returns.
    pub fn step_frames(&mut self, frames: i32) {
        if frames == 0 {
            return;
        }
        self.resume_after_steps = !self.paused;
        self.paused = true;
        self.stepping = frames;
    }

    /// Restore a previously captured shape (used by snapshot load).
    /// Pending steps and accumulated counters are not part of the shape.
    pub fn restore(&mut self, shape: TimebaseShape) {
        self.reversed = shape.reversed;
        self.scale = shape.scale;
        self.fixed_dt_enabled = shape.fixed_dt_enabled;
        self.fixed_dt = shape.fixed_dt;
        self.last_model_dt = shape.last_model_dt;
    }

    /// Capture the restorable shape of this timebase.
    pub fn shape(&self) -> TimebaseShape {
        TimebaseShape {
            reversed: self.reversed,
            scale: self.scale,
            fixed_dt_enabled: self.fixed_dt_enabled,
            fixed_dt: self.fixed_dt,
            last_model_dt: self.last_model_dt,
        }
    }

    // ── The conversion ───────────────────────────────────────────

    /// Convert a wall-clock frame delay into the signed model dt for
    /// this cycle, or a [`Hold`] explaining why nothing should run.
    ///
    /// Wall time always accrues; model time only on `Ok`. A pending
    /// single-step frame overrides both pause and budget exhaustion —
    /// stepping past an exhausted budget extends the cap by one.
    pub fn next_dt(&mut self, frame_delay: f32) -> Result<f32, Hold> {
        self.last_frame_delay = frame_delay;
        self.real_session_time += f64::from(frame_delay);

        let explicit_step = self.paused && self.stepping != 0;
        if self.budget.maxed() {
            if !explicit_step {
                return Err(Hold::BudgetExhausted);
            }
            self.budget.extend_by_one();
        }
        if self.paused && !explicit_step {
            return Err(Hold::Paused);
        }

        let magnitude = if self.fixed_dt_enabled {
            self.fixed_dt
        } else {
            frame_delay
        } * self.scale;

        let dt = if explicit_step {
            let backward = self.stepping < 0;
            self.stepping -= self.stepping.signum();
            if self.stepping == 0 && self.resume_after_steps {
                self.paused = false;
                self.resume_after_steps = false;
            }
            // Reversal applies to explicit steps too: stepping forward
            // through reversed time still integrates a negative slice.
            if self.reversed || backward {
                -magnitude
            } else {
                magnitude
            }
        } else if self.reversed {
            -magnitude
        } else {
            magnitude
        };

        self.budget.record();
        self.last_model_dt = dt;
        self.model_time += f64::from(dt);
        self.stats.record(dt);
        Ok(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_forward_passes_scaled_frame_delay() {
        let mut tb = Timebase::default();
        assert_eq!(tb.next_dt(0.016), Ok(0.016));
        tb.set_scale(4.0);
        assert_eq!(tb.next_dt(0.016), Ok(0.064));
        assert_eq!(tb.last_model_dt(), 0.064);
    }

    #[test]
    fn pause_freezes_model_time_but_not_wall_time() {
        let mut tb = Timebase::default();
        tb.toggle_pause();
        for _ in 0..5 {
            assert_eq!(tb.next_dt(0.1), Err(Hold::Paused));
        }
        assert_eq!(tb.model_time(), 0.0);
        assert!((tb.real_session_time() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn reversed_negates_dt() {
        let mut tb = Timebase::default();
        tb.toggle_reversed();
        assert_eq!(tb.next_dt(0.25), Ok(-0.25));
        assert_eq!(tb.model_time(), -0.25);
    }

    #[test]
    fn fixed_dt_ignores_frame_delay() {
        let mut tb = Timebase::default();
        tb.toggle_fixed_dt();
        tb.set_fixed_dt(0.01);
        assert_eq!(tb.next_dt(0.5), Ok(0.01));
        assert_eq!(tb.next_dt(0.001), Ok(0.01));
    }

    #[test]
    fn scale_guards_reject_garbage() {
        let mut tb = Timebase::default();
        tb.set_scale(0.0);
        tb.set_scale(-3.0);
        tb.set_scale(f32::NAN);
        assert_eq!(tb.scale(), DEFAULT_TIME_SCALE);
        tb.set_fixed_dt(f32::INFINITY);
        assert_eq!(tb.fixed_dt().1, DEFAULT_FIXED_DT);
    }

    #[test]
    fn step_frames_while_paused_consumes_then_reenters_pause() {
        let mut tb = Timebase::default();
        tb.toggle_pause();
        tb.step_frames(3);
        assert!(tb.is_paused());
        for _ in 0..3 {
            assert_eq!(tb.next_dt(0.1), Ok(0.1));
        }
        assert_eq!(tb.pending_steps(), 0);
        assert_eq!(tb.next_dt(0.1), Err(Hold::Paused));
    }

    #[test]
    fn step_frames_while_running_resumes_after_exhaustion() {
        let mut tb = Timebase::default();
        tb.step_frames(2);
        assert!(tb.is_paused());
        assert_eq!(tb.next_dt(0.1), Ok(0.1));
        assert_eq!(tb.next_dt(0.1), Ok(0.1));
        // Prior state was running, so free-run returns.
        assert!(!tb.is_paused());
        assert_eq!(tb.next_dt(0.1), Ok(0.1));
    }

    #[test]
    fn negative_step_frames_step_backward() {
        let mut tb = Timebase::default();
        tb.toggle_pause();
        tb.step_frames(-2);
        assert_eq!(tb.next_dt(0.1), Ok(-0.1));
        assert_eq!(tb.next_dt(0.1), Ok(-0.1));
        assert_eq!(tb.next_dt(0.1), Err(Hold::Paused));
    }

    #[test]
    fn reversed_single_step_integrates_backward() {
        let mut tb = Timebase::default();
        tb.toggle_reversed();
        tb.toggle_pause();
        tb.step_frames(1);
        assert_eq!(tb.next_dt(0.1), Ok(-0.1));

        tb.step_frames(-1);
        assert_eq!(tb.next_dt(0.1), Ok(-0.1));
    }

    #[test]
    fn unpause_discards_pending_steps() {
        let mut tb = Timebase::default();
        tb.step_frames(5);
        tb.toggle_pause(); // resume
        assert!(!tb.is_paused());
        assert_eq!(tb.pending_steps(), 0);
    }

    #[test]
    fn exhausted_budget_freezes_until_stepped() {
        let mut tb = Timebase::new(IterationBudget::capped(2));
        assert!(tb.next_dt(0.1).is_ok());
        assert!(tb.next_dt(0.1).is_ok());
        assert_eq!(tb.next_dt(0.1), Err(Hold::BudgetExhausted));
        assert_eq!(tb.budget().limit(), Some(2));

        // Explicit stepping leans past the wall, one slice per request.
        tb.step_frames(1);
        assert_eq!(tb.next_dt(0.1), Ok(0.1));
        assert_eq!(tb.budget().limit(), Some(3));
        assert_eq!(tb.budget().done(), 3);
        // The extension covered exactly that one slice.
        assert_eq!(tb.next_dt(0.1), Err(Hold::BudgetExhausted));
    }

    #[test]
    fn shape_round_trips_through_restore() {
        let mut tb = Timebase::default();
        tb.toggle_reversed();
        tb.set_scale(8.0);
        tb.toggle_fixed_dt();
        tb.set_fixed_dt(0.005);
        let _ = tb.next_dt(0.1);
        let shape = tb.shape();

        let mut fresh = Timebase::default();
        fresh.restore(shape);
        assert!(fresh.is_reversed());
        assert_eq!(fresh.scale(), 8.0);
        assert_eq!(fresh.fixed_dt(), (true, 0.005));
        assert_eq!(fresh.last_model_dt(), tb.last_model_dt());
        // Counters are session-local, not part of the shape.
        assert_eq!(fresh.model_time(), 0.0);
    }

    #[test]
    fn model_time_sums_signed_slices() {
        let mut tb = Timebase::default();
        let _ = tb.next_dt(0.5);
        tb.toggle_reversed();
        let _ = tb.next_dt(0.2);
        assert!((tb.model_time() - 0.3).abs() < 1e-7);
        assert_eq!(tb.last_frame_delay(), 0.2);
    }

    #[test]
    fn dt_stats_track_signed_and_unsigned_extrema() {
        let mut tb = Timebase::default();
        let _ = tb.next_dt(0.5);
        tb.toggle_reversed();
        let _ = tb.next_dt(0.2);

        let stats = tb.dt_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, -0.2);
        assert_eq!(stats.max, 0.5);
        assert_eq!(stats.abs_min, 0.2);
        assert_eq!(stats.abs_max, 0.5);
        assert!((stats.total - 0.3).abs() < 1e-7);

        // Held cycles record nothing.
        tb.toggle_pause();
        assert!(tb.next_dt(9.0).is_err());
        assert_eq!(tb.dt_stats().count, 2);
    }
}
