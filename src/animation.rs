//! Frame-driven animations for the lock view
//!
//! Nothing here owns a clock. The host calls [`LockAnimator::advance`] once
//! per frame with the elapsed time, which keeps every animation
//! deterministic under test.

use crate::config::LockConfig;
use crate::geometry::{clamp_progress, AnimationGeometry, Lerp, LockLayout};
use std::time::Duration;
use tracing::debug;

/// Timing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Apply the curve to a linear fraction in `[0, 1]`
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::Linear => fraction.clamp(0.0, 1.0),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
        }
    }
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 || fraction.is_nan() {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample = |a: f32, b: f32, c: f32, t: f32| ((a * t + b) * t + c) * t;
    let derivative = |a: f32, b: f32, c: f32, t: f32| (3.0 * a * t + 2.0 * b) * t + c;

    // Newton-Raphson first, bisection when the slope flattens out
    let mut t = fraction;
    let mut solved = false;
    for _ in 0..8 {
        let x = sample(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            solved = true;
            break;
        }
        let dx = derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !solved {
        let (mut lo, mut hi) = (0.0f32, 1.0f32);
        t = fraction;
        for _ in 0..32 {
            let x = sample(ax, bx, cx, t);
            if (x - fraction).abs() < 1e-6 {
                break;
            }
            if x < fraction {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
    }

    sample(ay, by, cy, t).clamp(0.0, 1.0)
}

/// A single value moving from `from` to `to` over `duration`
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Advance by `dt`, returning the time left over once finished
    pub fn advance(&mut self, dt: Duration) -> Duration {
        let remaining = self.duration.saturating_sub(self.elapsed);
        if dt >= remaining {
            self.elapsed = self.duration;
            dt - remaining
        } else {
            self.elapsed += dt;
            Duration::ZERO
        }
    }

    pub fn fraction(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn value(&self) -> f32 {
        Lerp::lerp(&self.from, &self.to, self.easing.transform(self.fraction()))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Phase of the confirmation zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomPhase {
    ZoomIn,
    ZoomOut,
    Done,
}

/// Two-phase zoom on the closed-lock glyph
///
/// Zoom out starts only after zoom in has completed, and the completion
/// callback runs once, after zoom out. Cancelling drops the callback
/// without running it.
pub struct ConfirmationAnimation {
    zoom_in: Tween,
    zoom_out: Tween,
    phase: ZoomPhase,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl std::fmt::Debug for ConfirmationAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationAnimation")
            .field("phase", &self.phase)
            .field("scale", &self.scale())
            .field("pending_completion", &self.on_complete.is_some())
            .finish()
    }
}

impl ConfirmationAnimation {
    pub fn new(peak_scale: f32, phase_duration: Duration, on_complete: impl FnOnce() + 'static) -> Self {
        Self {
            zoom_in: Tween::new(1.0, peak_scale, phase_duration, Easing::EaseIn),
            zoom_out: Tween::new(peak_scale, 1.0, phase_duration, Easing::EaseOut),
            phase: ZoomPhase::ZoomIn,
            on_complete: Some(Box::new(on_complete)),
        }
    }

    pub fn phase(&self) -> ZoomPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == ZoomPhase::Done
    }

    pub fn scale(&self) -> f32 {
        match self.phase {
            ZoomPhase::ZoomIn => self.zoom_in.value(),
            ZoomPhase::ZoomOut => self.zoom_out.value(),
            ZoomPhase::Done => 1.0,
        }
    }

    /// Advance by `dt`; returns true on the frame the chain completes
    pub fn advance(&mut self, dt: Duration) -> bool {
        let mut dt = dt;
        if self.phase == ZoomPhase::ZoomIn {
            dt = self.zoom_in.advance(dt);
            if !self.zoom_in.is_finished() {
                return false;
            }
            debug!("[ANIM] confirmation zoom in finished");
            self.phase = ZoomPhase::ZoomOut;
        }

        if self.phase == ZoomPhase::ZoomOut {
            self.zoom_out.advance(dt);
            if !self.zoom_out.is_finished() {
                return false;
            }
            debug!("[ANIM] confirmation zoom out finished");
            self.phase = ZoomPhase::Done;
            if let Some(on_complete) = self.on_complete.take() {
                on_complete();
            }
            return true;
        }

        false
    }

    /// Stop the chain without running the completion
    pub fn cancel(&mut self) {
        if self.on_complete.take().is_some() {
            debug!("[ANIM] confirmation cancelled in {:?}", self.phase);
        }
        self.phase = ZoomPhase::Done;
    }
}

/// Things that finished during one [`LockAnimator::advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimatorTick {
    pub confirmation_finished: bool,
    pub fade_finished: bool,
    pub settle_finished: bool,
}

/// Presentation state of the lock view
#[derive(Debug)]
pub struct LockAnimator {
    layout: LockLayout,
    progress: f32,
    locked: bool,
    view_alpha: f32,
    cancel_alpha: f32,
    restore_alpha_after_fade: bool,
    zoom_scale: f32,
    zoom_duration: Duration,
    confirmation: Option<ConfirmationAnimation>,
    fade: Option<Tween>,
    settle: Option<Tween>,
}

impl LockAnimator {
    pub fn new(config: &LockConfig) -> Self {
        Self {
            layout: LockLayout::new(config),
            progress: 0.0,
            locked: false,
            view_alpha: 1.0,
            cancel_alpha: 1.0,
            restore_alpha_after_fade: config.variant.restore_alpha_after_fade,
            zoom_scale: config.zoom_scale,
            zoom_duration: config.zoom_duration(),
            confirmation: None,
            fade: None,
            settle: None,
        }
    }

    pub fn layout(&self) -> &LockLayout {
        &self.layout
    }

    /// Glyph frames at `progress`, ignoring the latch
    pub fn geometry(&self, progress: f32) -> AnimationGeometry {
        self.layout.geometry(progress)
    }

    /// Glyph frames for the current progress and latch
    pub fn current_geometry(&self) -> AnimationGeometry {
        self.layout.geometry_for(self.progress, self.locked)
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Jump to `progress`, interrupting any settle animation
    pub fn set_progress(&mut self, progress: f32) {
        self.settle = None;
        self.progress = clamp_progress(progress);
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn view_alpha(&self) -> f32 {
        self.view_alpha
    }

    pub fn cancel_alpha(&self) -> f32 {
        self.cancel_alpha
    }

    pub fn set_cancel_alpha(&mut self, alpha: f32) {
        self.cancel_alpha = clamp_progress(alpha);
    }

    /// Scale of the closed-lock glyph
    pub fn locked_scale(&self) -> f32 {
        self.confirmation
            .as_ref()
            .map(ConfirmationAnimation::scale)
            .unwrap_or(1.0)
    }

    pub fn is_confirming(&self) -> bool {
        self.confirmation
            .as_ref()
            .is_some_and(|c| !c.is_finished())
    }

    pub fn is_animating(&self) -> bool {
        self.is_confirming() || self.fade.is_some() || self.settle.is_some()
    }

    /// Start the two-phase zoom on the closed-lock glyph
    ///
    /// Returns false and drops `on_complete` when a chain is already in
    /// flight.
    pub fn play_lock_confirmation(&mut self, on_complete: impl FnOnce() + 'static) -> bool {
        if self.is_confirming() {
            debug!("[ANIM] confirmation already running, ignoring");
            return false;
        }
        self.confirmation = Some(ConfirmationAnimation::new(
            self.zoom_scale,
            self.zoom_duration,
            on_complete,
        ));
        true
    }

    /// Abort an in-flight confirmation; its completion never runs
    pub fn cancel_confirmation(&mut self) {
        if let Some(mut confirmation) = self.confirmation.take() {
            confirmation.cancel();
        }
    }

    /// Fade the whole view out
    pub fn fade_out(&mut self, duration: Duration) {
        self.fade = Some(Tween::new(self.view_alpha, 0.0, duration, Easing::EaseInOut));
    }

    /// Animate progress back to 0
    pub fn settle(&mut self, duration: Duration) {
        if self.progress <= 0.0 {
            self.settle = None;
            return;
        }
        self.settle = Some(Tween::new(self.progress, 0.0, duration, Easing::EaseInOut));
    }

    /// Leave the latched look and animate back to rest
    pub fn unlock(&mut self, duration: Duration) {
        self.cancel_confirmation();
        self.fade = None;
        self.view_alpha = 1.0;
        self.locked = false;
        self.settle(duration);
    }

    /// Snap back to the idle look: unlocked, at rest, fully opaque
    pub fn reset(&mut self) {
        self.cancel_confirmation();
        self.fade = None;
        self.settle = None;
        self.progress = 0.0;
        self.locked = false;
        self.view_alpha = 1.0;
        self.cancel_alpha = 1.0;
    }

    /// Advance every running animation by `dt`
    pub fn advance(&mut self, dt: Duration) -> AnimatorTick {
        let mut tick = AnimatorTick::default();

        if let Some(confirmation) = self.confirmation.as_mut() {
            tick.confirmation_finished = confirmation.advance(dt);
            if confirmation.is_finished() {
                self.confirmation = None;
            }
        }

        if let Some(fade) = self.fade.as_mut() {
            fade.advance(dt);
            self.view_alpha = fade.value();
            if fade.is_finished() {
                self.fade = None;
                tick.fade_finished = true;
                if self.restore_alpha_after_fade {
                    self.view_alpha = 1.0;
                }
            }
        }

        if let Some(settle) = self.settle.as_mut() {
            settle.advance(dt);
            self.progress = settle.value();
            if settle.is_finished() {
                self.settle = None;
                tick.settle_finished = true;
            }
        }

        tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const FRAME: Duration = Duration::from_millis(16);

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = count.clone();
        (count, move || handle.set(handle.get() + 1))
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert_eq!(easing.transform(0.0), 0.0);
            assert_eq!(easing.transform(1.0), 1.0);
        }
        assert!(Easing::EaseIn.transform(0.5) < 0.5);
        assert!(Easing::EaseOut.transform(0.5) > 0.5);
    }

    #[test]
    fn test_tween_carries_overflow() {
        let mut tween = Tween::new(0.0, 10.0, Duration::from_millis(100), Easing::Linear);
        assert_eq!(tween.advance(Duration::from_millis(40)), Duration::ZERO);
        assert!((tween.value() - 4.0).abs() < 1e-4);
        assert_eq!(tween.advance(Duration::from_millis(90)), Duration::from_millis(30));
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 10.0);
    }

    #[test]
    fn test_confirmation_phases_in_order() {
        let (count, on_complete) = counter();
        let mut zoom = ConfirmationAnimation::new(1.3, Duration::from_millis(200), on_complete);

        assert!(!zoom.advance(Duration::from_millis(100)));
        assert_eq!(zoom.phase(), ZoomPhase::ZoomIn);
        assert!(zoom.scale() > 1.0 && zoom.scale() < 1.3);

        assert!(!zoom.advance(Duration::from_millis(100)));
        assert_eq!(zoom.phase(), ZoomPhase::ZoomOut);
        assert!((zoom.scale() - 1.3).abs() < 1e-4);
        assert_eq!(count.get(), 0);

        assert!(!zoom.advance(Duration::from_millis(199)));
        assert_eq!(count.get(), 0);

        assert!(zoom.advance(Duration::from_millis(1)));
        assert_eq!(count.get(), 1);
        assert_eq!(zoom.scale(), 1.0);

        assert!(!zoom.advance(Duration::from_secs(1)));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_confirmation_large_step_still_completes_once() {
        let (count, on_complete) = counter();
        let mut zoom = ConfirmationAnimation::new(1.3, Duration::from_millis(200), on_complete);
        assert!(zoom.advance(Duration::from_secs(5)));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cancelled_confirmation_never_completes() {
        let (count, on_complete) = counter();
        let mut zoom = ConfirmationAnimation::new(1.3, Duration::from_millis(200), on_complete);
        zoom.advance(Duration::from_millis(250));
        zoom.cancel();
        assert!(!zoom.advance(Duration::from_secs(1)));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_animator_ignores_reentrant_confirmation() {
        let mut animator = LockAnimator::new(&LockConfig::default());
        let (first, on_first) = counter();
        let (second, on_second) = counter();

        assert!(animator.play_lock_confirmation(on_first));
        assert!(!animator.play_lock_confirmation(on_second));

        let mut finished = 0;
        for _ in 0..40 {
            if animator.advance(FRAME).confirmation_finished {
                finished += 1;
            }
        }
        assert_eq!(finished, 1);
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
        assert_eq!(animator.locked_scale(), 1.0);
    }

    #[test]
    fn test_animator_fade_restores_alpha() {
        let mut animator = LockAnimator::new(&LockConfig::default());
        animator.fade_out(Duration::from_millis(200));
        animator.advance(Duration::from_millis(100));
        assert!(animator.view_alpha() < 1.0 && animator.view_alpha() > 0.0);

        let tick = animator.advance(Duration::from_millis(100));
        assert!(tick.fade_finished);
        assert_eq!(animator.view_alpha(), 1.0);
    }

    #[test]
    fn test_animator_fade_keeps_alpha_when_not_restoring() {
        let mut config = LockConfig::default();
        config.variant.restore_alpha_after_fade = false;
        let mut animator = LockAnimator::new(&config);
        animator.fade_out(Duration::from_millis(200));
        animator.advance(Duration::from_millis(300));
        assert_eq!(animator.view_alpha(), 0.0);
    }

    #[test]
    fn test_settle_returns_to_rest() {
        let mut animator = LockAnimator::new(&LockConfig::default());
        animator.set_progress(0.8);
        animator.settle(Duration::from_millis(200));
        animator.advance(Duration::from_millis(100));
        assert!(animator.progress() < 0.8 && animator.progress() > 0.0);

        let tick = animator.advance(Duration::from_millis(100));
        assert!(tick.settle_finished);
        assert_eq!(animator.progress(), 0.0);
        assert_eq!(animator.current_geometry(), animator.geometry(0.0));
    }

    #[test]
    fn test_unlock_settles_from_locked() {
        let mut animator = LockAnimator::new(&LockConfig::default());
        animator.set_progress(1.0);
        animator.set_locked(true);
        animator.fade_out(Duration::from_millis(200));
        animator.advance(Duration::from_millis(50));

        animator.unlock(Duration::from_millis(200));
        assert!(!animator.is_locked());
        assert_eq!(animator.view_alpha(), 1.0);
        assert!(animator.is_animating());

        animator.advance(Duration::from_millis(200));
        assert_eq!(animator.progress(), 0.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_set_progress_interrupts_settle() {
        let mut animator = LockAnimator::new(&LockConfig::default());
        animator.set_progress(0.8);
        animator.settle(Duration::from_millis(200));
        animator.set_progress(0.3);
        animator.advance(Duration::from_millis(100));
        assert_eq!(animator.progress(), 0.3);
    }
}
