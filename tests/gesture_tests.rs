//! Gesture reducer tests
//!
//! Drive the interpreter with raw samples and check progress, latching and
//! terminal outcomes.

use swipelock::gesture::{GestureInterpreter, GestureSample, InteractionState};
use swipelock::{InteractionOutcome, LockConfig};

fn interpreter() -> GestureInterpreter {
    GestureInterpreter::new(&LockConfig::default())
}

#[test]
fn test_progress_follows_finger_both_ways() {
    let mut gesture = interpreter();
    gesture.handle(GestureSample::began(40.0, 600.0));

    assert_eq!(gesture.handle(GestureSample::changed(40.0, 540.0)).progress, 0.6);
    assert_eq!(gesture.handle(GestureSample::changed(40.0, 580.0)).progress, 0.2);
    // Dragging below the start point clamps at 0
    assert_eq!(gesture.handle(GestureSample::changed(40.0, 700.0)).progress, 0.0);
    assert_eq!(gesture.state(), InteractionState::Dragging);
}

#[test]
fn test_exact_lock_distance_latches() {
    let mut gesture = interpreter();
    gesture.handle(GestureSample::began(0.0, 500.0));

    let update = gesture.handle(GestureSample::changed(0.0, 400.0));
    assert!(update.lock_latched);
    assert!(gesture.is_locked());
    assert_eq!(gesture.terminal_outcome(), Some(InteractionOutcome::Locked));
}

#[test]
fn test_release_after_latch_has_no_outcome() {
    let mut gesture = interpreter();
    gesture.handle(GestureSample::began(0.0, 500.0));
    gesture.handle(GestureSample::changed(0.0, 350.0));

    let update = gesture.handle(GestureSample::ended(0.0, 350.0));
    assert_eq!(update.outcome, None);
    assert!(update.locked);
    assert_eq!(update.progress, 1.0);
}

#[test]
fn test_release_before_latch_finishes() {
    let mut gesture = interpreter();
    gesture.handle(GestureSample::began(0.0, 500.0));
    gesture.handle(GestureSample::changed(0.0, 470.0));

    let update = gesture.handle(GestureSample::ended(0.0, 470.0));
    assert_eq!(update.outcome, Some(InteractionOutcome::Finished));
    assert_eq!(gesture.state(), InteractionState::Finished);

    // Outcome is reported once
    let update = gesture.handle(GestureSample::ended(0.0, 470.0));
    assert_eq!(update.outcome, None);
}

#[test]
fn test_slide_left_fades_then_cancels() {
    let mut gesture = interpreter();
    gesture.handle(GestureSample::began(300.0, 500.0));

    let update = gesture.handle(GestureSample::changed(225.0, 500.0));
    assert!((update.cancel_alpha - 0.5).abs() < 1e-6);
    assert_eq!(update.outcome, None);

    let update = gesture.handle(GestureSample::changed(150.0, 500.0));
    assert_eq!(update.outcome, Some(InteractionOutcome::Cancelled));
    assert_eq!(update.cancel_alpha, 0.0);

    // Later samples are ignored until the next press
    let update = gesture.handle(GestureSample::changed(150.0, 300.0));
    assert!(!update.locked);
    assert_eq!(update.outcome, None);
}

#[test]
fn test_slide_right_does_not_cancel() {
    let mut gesture = interpreter();
    gesture.handle(GestureSample::began(0.0, 500.0));

    let update = gesture.handle(GestureSample::changed(400.0, 500.0));
    assert_eq!(update.cancel_alpha, 1.0);
    assert_eq!(update.outcome, None);
}

#[test]
fn test_diagonal_past_both_thresholds_locks() {
    let mut gesture = interpreter();
    gesture.handle(GestureSample::began(300.0, 500.0));

    let update = gesture.handle(GestureSample::changed(100.0, 380.0));
    assert!(update.lock_latched);
    assert_eq!(update.outcome, None);
}

#[test]
fn test_non_finite_positions_are_ignored() {
    let mut gesture = interpreter();
    gesture.handle(GestureSample::began(0.0, 500.0));
    gesture.handle(GestureSample::changed(0.0, 450.0));

    let update = gesture.handle(GestureSample::changed(f32::NAN, f32::INFINITY));
    assert_eq!(update.progress, 0.5);
    assert!(!update.locked);
    assert_eq!(update.outcome, None);
}

#[test]
fn test_samples_before_began_are_ignored() {
    let mut gesture = interpreter();

    let update = gesture.handle(GestureSample::changed(0.0, -1000.0));
    assert_eq!(update.progress, 0.0);
    assert!(!update.locked);

    let update = gesture.handle(GestureSample::ended(0.0, 0.0));
    assert_eq!(update.outcome, None);
    assert_eq!(gesture.state(), InteractionState::Idle);
}

#[test]
fn test_new_press_restarts_after_latch() {
    let mut gesture = interpreter();
    gesture.handle(GestureSample::began(0.0, 500.0));
    gesture.handle(GestureSample::changed(0.0, 300.0));
    assert!(gesture.is_locked());

    gesture.handle(GestureSample::began(10.0, 200.0));
    assert!(!gesture.is_locked());
    assert_eq!(gesture.progress(), 0.0);
    assert_eq!(gesture.began_point(), egui::pos2(10.0, 200.0));
}

#[test]
fn test_custom_distances() {
    let config = LockConfig::default()
        .with_lock_distance(40.0)
        .with_cancel_distance(60.0);
    let mut gesture = GestureInterpreter::new(&config);
    gesture.handle(GestureSample::began(100.0, 100.0));

    assert_eq!(gesture.handle(GestureSample::changed(100.0, 80.0)).progress, 0.5);
    let update = gesture.handle(GestureSample::changed(40.0, 100.0));
    assert_eq!(update.outcome, Some(InteractionOutcome::Cancelled));
}

#[test]
fn test_reset_clears_latch() {
    let mut gesture = interpreter();
    gesture.handle(GestureSample::began(0.0, 500.0));
    gesture.handle(GestureSample::changed(0.0, 300.0));

    gesture.reset();
    assert_eq!(gesture.state(), InteractionState::Idle);
    assert_eq!(gesture.progress(), 0.0);
    assert_eq!(gesture.cancel_alpha(), 1.0);
}
