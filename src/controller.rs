//! The swipe-lock control
//!
//! [`SwipeLockController`] is the single component behind every screen that
//! hosts the recorder lock. It feeds gesture samples through the
//! [`GestureInterpreter`], mirrors the result into the [`LockAnimator`],
//! keeps the shared [`LockFlag`] in sync and pushes the resulting layout to
//! a [`LockRenderer`] after every input and every frame.

use crate::animation::{AnimatorTick, LockAnimator};
use crate::config::LockConfig;
use crate::drag::DragButton;
use crate::gesture::{
    GesturePhase, GestureInterpreter, GestureSample, GestureUpdate, InteractionOutcome,
    InteractionState,
};
use crate::render::{Glyph, LockRenderer};
use crate::state::{LockEvent, LockFlag, RecorderState};
use crossbeam_channel::Receiver;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use egui::Pos2;
use tracing::{debug, info, warn};

pub struct SwipeLockController<R: LockRenderer> {
    config: LockConfig,
    interpreter: GestureInterpreter,
    animator: LockAnimator,
    drag: DragButton,
    renderer: R,
    flag: LockFlag,
    flag_rx: Receiver<LockEvent>,
    /// Last flag value seen, to detect an external unlock edge
    previous_locked: bool,
    recorder: RecorderState,
    last_outcome: Option<InteractionOutcome>,
    confirmations: Rc<Cell<u32>>,
    on_confirmed: Option<Rc<dyn Fn()>>,
}

impl<R: LockRenderer> SwipeLockController<R> {
    pub fn new(config: LockConfig, flag: LockFlag, renderer: R) -> Self {
        let flag_rx = flag.subscribe();
        let previous_locked = flag.get();
        let mut controller = Self {
            interpreter: GestureInterpreter::new(&config),
            animator: LockAnimator::new(&config),
            drag: DragButton::new(&config),
            config,
            renderer,
            flag,
            flag_rx,
            previous_locked,
            recorder: RecorderState::Idle,
            last_outcome: None,
            confirmations: Rc::new(Cell::new(0)),
            on_confirmed: None,
        };
        controller.animator.set_locked(previous_locked);
        controller.prepare();
        controller
    }

    /// Run `hook` each time a lock confirmation animation completes
    pub fn with_confirmation_hook(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_confirmed = Some(Rc::new(hook));
        self
    }

    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn animator(&self) -> &LockAnimator {
        &self.animator
    }

    pub fn drag_button(&self) -> &DragButton {
        &self.drag
    }

    pub fn flag(&self) -> &LockFlag {
        &self.flag
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interpreter.state()
    }

    pub fn recorder_state(&self) -> RecorderState {
        self.recorder
    }

    pub fn is_locked(&self) -> bool {
        self.interpreter.is_locked()
    }

    /// Progress currently displayed, including settle animations
    pub fn progress(&self) -> f32 {
        self.animator.progress()
    }

    pub fn last_outcome(&self) -> Option<InteractionOutcome> {
        self.last_outcome
    }

    /// Number of confirmation animations that ran to completion
    pub fn confirmations_completed(&self) -> u32 {
        self.confirmations.get()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating() || self.drag.is_returning() || self.drag.is_pressed()
    }

    /// Feed one gesture sample
    pub fn handle_sample(&mut self, sample: GestureSample) -> GestureUpdate {
        if sample.phase == GesturePhase::Began && sample.is_finite() {
            self.begin_gesture();
        }

        let mut update = self.interpreter.handle(sample);
        if self.config.variant.drag_button_follows_finger {
            self.follow_finger(sample, &mut update);
        }

        // Only a live drag moves the glyphs; a latched or finished gesture is frozen
        let live = self.interpreter.state().is_dragging() || update.outcome.is_some();
        if sample.phase == GesturePhase::Changed && live && !update.locked {
            self.animator.set_progress(update.progress);
            self.animator.set_cancel_alpha(update.cancel_alpha);
        }

        if update.lock_latched {
            self.latch();
        }

        if let Some(outcome) = update.outcome {
            self.stop(outcome);
        }

        self.render();
        update
    }

    /// Advance animations by one frame
    pub fn advance(&mut self, dt: Duration) -> AnimatorTick {
        self.poll_lock_flag();

        self.drag.advance(dt);
        let tick = self.animator.advance(dt);
        if tick.confirmation_finished && self.config.variant.fade_out_after_lock {
            self.animator.fade_out(self.config.animation_duration());
        }

        self.render();
        tick
    }

    /// Explicit stop of a hands-free recording (the Cancel control)
    pub fn release(&mut self) {
        self.flag.set(false);
        self.poll_lock_flag();
        self.render();
    }

    /// React to changes of the shared flag made by the host
    pub fn poll_lock_flag(&mut self) {
        while let Ok(event) = self.flag_rx.try_recv() {
            let locked = event.is_locked();
            if self.previous_locked && !locked {
                info!("[LOCK] unlocked externally, resetting lock view");
                self.interpreter.reset();
                self.animator.unlock(self.config.animation_duration());
                self.drag.return_to_rest();
                self.recorder = RecorderState::Idle;
            } else {
                self.animator.set_locked(locked);
            }
            self.previous_locked = locked;
        }
    }

    /// Write our own transition to the shared flag without reacting to its echo
    fn publish(&mut self, locked: bool) {
        // Apply anything the host changed before overwriting it
        self.poll_lock_flag();
        self.previous_locked = locked;
        if self.flag.set(locked) {
            match self.flag_rx.try_recv() {
                Ok(event) if event.is_locked() == locked => {}
                Ok(event) => warn!("[LOCK] drained {:?} while publishing {}", event, locked),
                Err(_) => warn!("[LOCK] no echo after publishing {}", locked),
            }
        }
    }

    /// Move the record button with the finger and latch near the top of its travel
    fn follow_finger(&mut self, sample: GestureSample, update: &mut GestureUpdate) {
        match sample.phase {
            GesturePhase::Began if sample.is_finite() => self.drag.press(sample.position.y),
            GesturePhase::Changed if self.interpreter.state().is_dragging() => {
                if self.drag.drag(sample.position.y) && self.interpreter.latch() {
                    update.progress = 1.0;
                    update.locked = true;
                    update.lock_latched = true;
                }
            }
            GesturePhase::Ended | GesturePhase::Cancelled => {
                self.drag.release(self.interpreter.is_locked());
            }
            _ => {}
        }
    }

    fn begin_gesture(&mut self) {
        if self.animator.is_confirming() {
            debug!("[LOCK] press began during confirmation, cancelling it");
        }
        self.animator.reset();
        self.drag.reset();
        self.publish(false);
        self.recorder = RecorderState::Recording;
        self.last_outcome = None;
    }

    fn latch(&mut self) {
        info!("[LOCK] latched, recording hands-free");
        self.animator.set_progress(1.0);
        self.animator.set_locked(true);
        self.publish(true);
        self.recorder = RecorderState::Locked;
        self.last_outcome = Some(InteractionOutcome::Locked);

        let confirmations = self.confirmations.clone();
        let hook = self.on_confirmed.clone();
        self.animator.play_lock_confirmation(move || {
            confirmations.set(confirmations.get() + 1);
            if let Some(hook) = hook {
                hook();
            }
        });
    }

    fn stop(&mut self, outcome: InteractionOutcome) {
        info!("[LOCK] gesture {}, returning to rest", outcome);
        self.animator.settle(self.config.animation_duration());
        self.animator.set_cancel_alpha(1.0);
        self.drag.return_to_rest();
        self.recorder = RecorderState::Idle;
        self.last_outcome = Some(outcome);
    }

    /// Initial layout of every glyph
    fn prepare(&mut self) {
        let geometry = self.animator.current_geometry();
        for (glyph, frame) in [
            (Glyph::Background, geometry.background),
            (Glyph::Shackle, geometry.shackle),
            (Glyph::Body, geometry.body),
            (Glyph::DirectionArrow, geometry.direction),
            (Glyph::Locked, geometry.locked),
        ] {
            self.renderer.set_frame(glyph, frame.rect);
        }
        self.render();
    }

    fn render(&mut self) {
        let geometry = self.animator.current_geometry();
        let r = &mut self.renderer;

        r.set_frame(Glyph::Background, geometry.background.rect);
        r.set_hidden(Glyph::Background, geometry.background.hidden);

        r.set_center(Glyph::Shackle, geometry.shackle.center());
        r.set_hidden(Glyph::Shackle, geometry.shackle.hidden);

        r.set_center(Glyph::Body, geometry.body.center());
        r.set_hidden(Glyph::Body, geometry.body.hidden);

        r.set_center(Glyph::DirectionArrow, geometry.direction.center());
        r.set_alpha(Glyph::DirectionArrow, geometry.direction.alpha);
        r.set_hidden(Glyph::DirectionArrow, geometry.direction.hidden);

        r.set_hidden(Glyph::Locked, geometry.locked.hidden);
        r.set_scale(Glyph::Locked, self.animator.locked_scale());

        r.set_alpha(Glyph::CancelHint, self.animator.cancel_alpha());
        r.set_hidden(Glyph::CancelHint, self.recorder != RecorderState::Recording);

        r.set_view_alpha(self.animator.view_alpha());

        let follows = self.config.variant.drag_button_follows_finger;
        r.set_frame(Glyph::DragButton, self.drag.button_rect(Pos2::ZERO));
        r.set_hidden(Glyph::DragButton, !follows);
        r.set_frame(Glyph::StatusIcon, self.drag.status_rect(Pos2::ZERO));
        r.set_hidden(Glyph::StatusIcon, !follows);
        r.set_status_locked(self.previous_locked);
        match self.drag.shimmer_rect(Pos2::ZERO) {
            Some(band) if follows => {
                r.set_frame(Glyph::Shimmer, band);
                r.set_hidden(Glyph::Shimmer, false);
            }
            _ => r.set_hidden(Glyph::Shimmer, true),
        }
    }
}
