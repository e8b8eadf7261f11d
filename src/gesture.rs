//! Press-and-hold gesture interpretation
//!
//! The recognizer feeds one [`GestureSample`] per pointer update. The
//! interpreter turns that stream into a continuous lock `progress`, a
//! slide-to-cancel fade, and at most one terminal outcome per gesture.
//!
//! ```text
//! Idle --began--> Dragging --progress>=1--> Locked
//! Dragging --ended--> Finished
//! Dragging --cancelled | slid past cancel distance--> Cancelled
//! Locked --ended | cancelled--> Locked
//! ```
//!
//! The lock is a one-way latch: once closed, further samples of the same
//! gesture cannot reopen it. Only a new `Began` or [`GestureInterpreter::reset`]
//! clears it.

use crate::config::LockConfig;
use crate::geometry::clamp_progress;
use egui::Pos2;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Phase reported by the platform recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    /// Pointer is down but the press is not recognized yet
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    /// Recognition failed (tap, or moved too far before the hold delay)
    Failed,
}

/// One pointer update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub phase: GesturePhase,
    pub position: Pos2,
}

impl GestureSample {
    pub fn new(phase: GesturePhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            position: Pos2::new(x, y),
        }
    }

    pub fn began(x: f32, y: f32) -> Self {
        Self::new(GesturePhase::Began, x, y)
    }

    pub fn changed(x: f32, y: f32) -> Self {
        Self::new(GesturePhase::Changed, x, y)
    }

    pub fn ended(x: f32, y: f32) -> Self {
        Self::new(GesturePhase::Ended, x, y)
    }

    pub fn cancelled(x: f32, y: f32) -> Self {
        Self::new(GesturePhase::Cancelled, x, y)
    }

    pub fn is_finite(&self) -> bool {
        self.position.x.is_finite() && self.position.y.is_finite()
    }
}

/// Terminal result of a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionOutcome {
    /// Latched into hands-free recording
    Locked,
    /// Released before locking: stop and keep the recording
    Finished,
    /// Cancelled before locking: discard the recording
    Cancelled,
}

impl std::fmt::Display for InteractionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionOutcome::Locked => write!(f, "Locked"),
            InteractionOutcome::Finished => write!(f, "Finished"),
            InteractionOutcome::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Discrete state of the current gesture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionState {
    /// No gesture in progress
    #[default]
    Idle,
    /// Finger down, lock not reached
    Dragging,
    /// Lock latched; recording continues hands-free
    Locked,
    /// Released before locking
    Finished,
    /// Cancelled before locking
    Cancelled,
}

impl InteractionState {
    pub fn is_locked(&self) -> bool {
        matches!(self, InteractionState::Locked)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionState::Dragging)
    }

    /// Terminal outcome reached by the gesture, if any
    pub fn outcome(&self) -> Option<InteractionOutcome> {
        match self {
            InteractionState::Locked => Some(InteractionOutcome::Locked),
            InteractionState::Finished => Some(InteractionOutcome::Finished),
            InteractionState::Cancelled => Some(InteractionOutcome::Cancelled),
            InteractionState::Idle | InteractionState::Dragging => None,
        }
    }
}

impl std::fmt::Display for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionState::Idle => write!(f, "Idle"),
            InteractionState::Dragging => write!(f, "Dragging"),
            InteractionState::Locked => write!(f, "Locked"),
            InteractionState::Finished => write!(f, "Finished"),
            InteractionState::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// What a single sample produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureUpdate {
    /// Lock progress in `[0, 1]`
    pub progress: f32,
    /// Whether the lock is latched
    pub locked: bool,
    /// Opacity of the slide-to-cancel hint in `[0, 1]`
    pub cancel_alpha: f32,
    /// Finished or Cancelled, emitted once per gesture
    pub outcome: Option<InteractionOutcome>,
    /// The latch closed on this sample; the confirmation animation is due
    pub lock_latched: bool,
}

/// Reducer from gesture samples to lock progress and outcomes
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    lock_distance: f32,
    cancel_distance: f32,
    began_point: Pos2,
    progress: f32,
    cancel_alpha: f32,
    state: InteractionState,
}

impl GestureInterpreter {
    /// Create an interpreter for `config`
    ///
    /// A distance that is not a positive number falls back to the default,
    /// so a config built without [`LockConfig::validate`] still divides safely.
    pub fn new(config: &LockConfig) -> Self {
        let defaults = LockConfig::default();
        Self {
            lock_distance: usable_distance(
                "lock_distance",
                config.lock_distance,
                defaults.lock_distance,
            ),
            cancel_distance: usable_distance(
                "cancel_distance",
                config.cancel_distance,
                defaults.cancel_distance,
            ),
            began_point: Pos2::ZERO,
            progress: 0.0,
            cancel_alpha: 1.0,
            state: InteractionState::Idle,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    pub fn cancel_alpha(&self) -> f32 {
        self.cancel_alpha
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn began_point(&self) -> Pos2 {
        self.began_point
    }

    /// Terminal outcome of the current gesture, including `Locked`
    pub fn terminal_outcome(&self) -> Option<InteractionOutcome> {
        self.state.outcome()
    }

    /// Drop the current gesture, including a closed latch
    pub fn reset(&mut self) {
        debug!("[GESTURE] reset from {}", self.state);
        self.progress = 0.0;
        self.cancel_alpha = 1.0;
        self.state = InteractionState::Idle;
    }

    /// Close the latch without reaching the lock distance
    ///
    /// Used when something other than the vertical drag decides the lock,
    /// such as a dragged record button reaching the top of its travel.
    /// Only a live drag can latch.
    pub fn latch(&mut self) -> bool {
        if !self.state.is_dragging() {
            return false;
        }
        self.progress = 1.0;
        self.state = InteractionState::Locked;
        info!("[GESTURE] lock latched externally");
        true
    }

    /// Consume one sample
    pub fn handle(&mut self, sample: GestureSample) -> GestureUpdate {
        let mut outcome = None;
        let mut lock_latched = false;

        match sample.phase {
            GesturePhase::Began if !sample.is_finite() => {
                debug!("[GESTURE] ignoring began at a non-finite position");
            }
            GesturePhase::Began => {
                self.began_point = sample.position;
                self.progress = 0.0;
                self.cancel_alpha = 1.0;
                self.state = InteractionState::Dragging;
                debug!(
                    "[GESTURE] began at ({:.1}, {:.1})",
                    sample.position.x, sample.position.y
                );
            }
            GesturePhase::Changed => {
                if self.state.is_dragging() {
                    (outcome, lock_latched) = self.handle_changed(sample.position);
                }
            }
            GesturePhase::Ended => {
                if self.state.is_dragging() {
                    self.state = InteractionState::Finished;
                    outcome = Some(InteractionOutcome::Finished);
                    info!("[GESTURE] released before lock, finishing");
                }
            }
            GesturePhase::Cancelled => {
                if self.state.is_dragging() {
                    self.state = InteractionState::Cancelled;
                    outcome = Some(InteractionOutcome::Cancelled);
                    info!("[GESTURE] cancelled by recognizer");
                }
            }
            GesturePhase::Possible | GesturePhase::Failed => {}
        }

        GestureUpdate {
            progress: self.progress,
            locked: self.is_locked(),
            cancel_alpha: self.cancel_alpha,
            outcome,
            lock_latched,
        }
    }

    fn handle_changed(&mut self, position: Pos2) -> (Option<InteractionOutcome>, bool) {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return (None, false);
        }

        // Vertical lock is checked first and wins over a simultaneous cancel
        let vertical_distance = self.began_point.y - position.y;
        let raw_progress = vertical_distance / self.lock_distance;
        if raw_progress >= 1.0 {
            self.progress = 1.0;
            self.state = InteractionState::Locked;
            info!("[GESTURE] lock latched at {:.2}", raw_progress);
            return (None, true);
        }
        self.progress = clamp_progress(raw_progress);

        let horizontal_distance = self.began_point.x - position.x;
        self.cancel_alpha = clamp_progress(1.0 - horizontal_distance / self.cancel_distance);
        if horizontal_distance >= self.cancel_distance {
            self.state = InteractionState::Cancelled;
            info!("[GESTURE] slid past cancel distance");
            return (Some(InteractionOutcome::Cancelled), false);
        }

        (None, false)
    }
}

fn usable_distance(name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!("[GESTURE] {} {} is not positive, using {}", name, value, fallback);
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> GestureInterpreter {
        GestureInterpreter::new(&LockConfig::default())
    }

    #[test]
    fn test_half_way_then_latch() {
        let mut gesture = interpreter();
        gesture.handle(GestureSample::began(0.0, 500.0));

        let update = gesture.handle(GestureSample::changed(0.0, 450.0));
        assert_eq!(update.progress, 0.5);
        assert!(!update.locked);
        assert!(!update.lock_latched);

        let update = gesture.handle(GestureSample::changed(0.0, 395.0));
        assert_eq!(update.progress, 1.0);
        assert!(update.locked);
        assert!(update.lock_latched);
        assert_eq!(update.outcome, None);
    }

    #[test]
    fn test_latch_ignores_further_changes() {
        let mut gesture = interpreter();
        gesture.handle(GestureSample::began(0.0, 500.0));
        gesture.handle(GestureSample::changed(0.0, 380.0));

        for y in [500.0, 450.0, 700.0, 100.0] {
            let update = gesture.handle(GestureSample::changed(-400.0, y));
            assert_eq!(update.progress, 1.0);
            assert!(update.locked);
            assert!(!update.lock_latched);
            assert_eq!(update.outcome, None);
        }
    }

    #[test]
    fn test_downward_drag_clamps_to_zero() {
        let mut gesture = interpreter();
        gesture.handle(GestureSample::began(0.0, 500.0));
        let update = gesture.handle(GestureSample::changed(0.0, 650.0));
        assert_eq!(update.progress, 0.0);
    }

    #[test]
    fn test_ended_before_lock_finishes() {
        let mut gesture = interpreter();
        gesture.handle(GestureSample::began(0.0, 500.0));
        gesture.handle(GestureSample::changed(0.0, 470.0));
        let update = gesture.handle(GestureSample::ended(0.0, 470.0));
        assert_eq!(update.outcome, Some(InteractionOutcome::Finished));
        assert_eq!(gesture.state(), InteractionState::Finished);

        // A second end is not a second outcome
        let update = gesture.handle(GestureSample::ended(0.0, 470.0));
        assert_eq!(update.outcome, None);
    }

    #[test]
    fn test_locked_absorbs_end_and_cancel() {
        let mut gesture = interpreter();
        gesture.handle(GestureSample::began(0.0, 500.0));
        gesture.handle(GestureSample::changed(0.0, 390.0));

        assert_eq!(gesture.handle(GestureSample::cancelled(0.0, 390.0)).outcome, None);
        assert_eq!(gesture.handle(GestureSample::ended(0.0, 390.0)).outcome, None);
        assert_eq!(gesture.state(), InteractionState::Locked);
        assert_eq!(gesture.terminal_outcome(), Some(InteractionOutcome::Locked));
    }

    #[test]
    fn test_began_resets_latch() {
        let mut gesture = interpreter();
        gesture.handle(GestureSample::began(0.0, 500.0));
        gesture.handle(GestureSample::changed(0.0, 300.0));
        assert!(gesture.is_locked());

        let update = gesture.handle(GestureSample::began(10.0, 200.0));
        assert_eq!(update.progress, 0.0);
        assert!(!update.locked);
        assert_eq!(gesture.began_point(), Pos2::new(10.0, 200.0));
    }

    #[test]
    fn test_slide_to_cancel_fades_then_cancels() {
        let mut gesture = interpreter();
        gesture.handle(GestureSample::began(300.0, 500.0));

        let update = gesture.handle(GestureSample::changed(225.0, 500.0));
        assert!((update.cancel_alpha - 0.5).abs() < 1e-6);
        assert_eq!(update.outcome, None);

        // Reversible while the finger is down
        let update = gesture.handle(GestureSample::changed(300.0, 500.0));
        assert_eq!(update.cancel_alpha, 1.0);

        let update = gesture.handle(GestureSample::changed(140.0, 500.0));
        assert_eq!(update.cancel_alpha, 0.0);
        assert_eq!(update.outcome, Some(InteractionOutcome::Cancelled));

        // Inert until the next press
        let update = gesture.handle(GestureSample::ended(140.0, 500.0));
        assert_eq!(update.outcome, None);
    }

    #[test]
    fn test_lock_wins_over_simultaneous_cancel() {
        let mut gesture = interpreter();
        gesture.handle(GestureSample::began(300.0, 500.0));
        let update = gesture.handle(GestureSample::changed(0.0, 300.0));
        assert!(update.locked);
        assert_eq!(update.outcome, None);
    }

    #[test]
    fn test_samples_before_began_are_ignored() {
        let mut gesture = interpreter();
        let update = gesture.handle(GestureSample::changed(0.0, -1000.0));
        assert_eq!(update.progress, 0.0);
        assert_eq!(update.outcome, None);
        assert_eq!(gesture.handle(GestureSample::ended(0.0, 0.0)).outcome, None);
        assert_eq!(gesture.state(), InteractionState::Idle);
    }

    #[test]
    fn test_non_finite_positions_keep_previous_progress() {
        let mut gesture = interpreter();
        gesture.handle(GestureSample::began(0.0, 500.0));
        gesture.handle(GestureSample::changed(0.0, 440.0));
        let update = gesture.handle(GestureSample::changed(f32::NAN, f32::INFINITY));
        assert!((update.progress - 0.6).abs() < 1e-6);
        assert!(!update.locked);
    }

    #[test]
    fn test_non_finite_began_is_ignored() {
        let mut gesture = interpreter();
        let update = gesture.handle(GestureSample::began(f32::NAN, f32::NAN));
        assert_eq!(gesture.state(), InteractionState::Idle);
        assert_eq!(update.progress, 0.0);

        let update = gesture.handle(GestureSample::changed(0.0, 450.0));
        assert_eq!(update.progress, 0.0);
        assert_eq!(update.cancel_alpha, 1.0);
        assert!(!update.locked);
    }

    #[test]
    fn test_zero_distances_fall_back_to_defaults() {
        let config = LockConfig::default()
            .with_lock_distance(0.0)
            .with_cancel_distance(f32::NAN);
        let mut gesture = GestureInterpreter::new(&config);
        gesture.handle(GestureSample::began(0.0, 500.0));

        let update = gesture.handle(GestureSample::changed(0.0, 500.0));
        assert_eq!(update.progress, 0.0);
        assert_eq!(update.cancel_alpha, 1.0);

        let update = gesture.handle(GestureSample::changed(-75.0, 450.0));
        assert!((update.progress - 0.5).abs() < 1e-6);
        assert!((update.cancel_alpha - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_external_latch_needs_live_drag() {
        let mut gesture = interpreter();
        assert!(!gesture.latch());

        gesture.handle(GestureSample::began(0.0, 500.0));
        gesture.handle(GestureSample::changed(0.0, 470.0));
        assert!(gesture.latch());
        assert_eq!(gesture.progress(), 1.0);
        assert_eq!(gesture.handle(GestureSample::ended(0.0, 470.0)).outcome, None);
        assert!(!gesture.latch());
    }

    #[test]
    fn test_possible_and_failed_are_noops() {
        let mut gesture = interpreter();
        gesture.handle(GestureSample::began(0.0, 500.0));
        gesture.handle(GestureSample::changed(0.0, 480.0));
        let update = gesture.handle(GestureSample::new(GesturePhase::Failed, 0.0, 0.0));
        assert!((update.progress - 0.2).abs() < 1e-6);
        assert_eq!(gesture.state(), InteractionState::Dragging);
    }
}
