//! Drag-to-lock record button
//!
//! In this variant the record button itself follows the finger upward. Its
//! travel is capped at a fraction of the host height, and pulling it within
//! the lock margin of the top latches the lock. Released early, it eases
//! back to rest. A shimmer band sweeps upward across the button while it is
//! pressed, and a status icon above it shows whether the lock is open.
//!
//! Offsets are in points, negative upward, relative to the button's rest
//! position.

use crate::animation::{Easing, Tween};
use crate::config::LockConfig;
use egui::{pos2, Pos2, Rect, Vec2};
use std::time::Duration;
use tracing::debug;

/// Diameter of the record button
pub const BUTTON_SIZE: f32 = 60.0;
/// Side of the open/closed status icon
pub const STATUS_ICON_SIZE: f32 = 30.0;
/// Gap between the status icon and the top of the button
pub const STATUS_ICON_GAP: f32 = 10.0;
/// One upward sweep of the shimmer band
pub const SHIMMER_PERIOD: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone)]
pub struct DragButton {
    max_travel: f32,
    lock_margin: f32,
    return_duration: Duration,
    offset: f32,
    last_y: Option<f32>,
    shimmer: Option<Duration>,
    returning: Option<Tween>,
}

impl DragButton {
    pub fn new(config: &LockConfig) -> Self {
        Self {
            max_travel: config.drag_max_travel(),
            lock_margin: config.drag_lock_margin,
            return_duration: config.drag_return_duration(),
            offset: 0.0,
            last_y: None,
            shimmer: None,
            returning: None,
        }
    }

    /// Current offset from rest, in `[-max_travel, 0]`
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_travel(&self) -> f32 {
        self.max_travel
    }

    pub fn is_pressed(&self) -> bool {
        self.last_y.is_some()
    }

    pub fn is_returning(&self) -> bool {
        self.returning.is_some()
    }

    /// Position of the shimmer sweep in `[0, 1)`, while pressed
    pub fn shimmer_phase(&self) -> Option<f32> {
        self.shimmer.map(|elapsed| {
            let period = SHIMMER_PERIOD.as_secs_f32();
            (elapsed.as_secs_f32() % period) / period
        })
    }

    pub fn press(&mut self, y: f32) {
        self.last_y = Some(y);
        self.shimmer = Some(Duration::ZERO);
        self.returning = None;
    }

    /// Follow the finger; returns true once the button is within the lock margin of the top
    pub fn drag(&mut self, y: f32) -> bool {
        let Some(last_y) = self.last_y else {
            return false;
        };
        if !y.is_finite() {
            return false;
        }
        self.offset = (self.offset + y - last_y).clamp(-self.max_travel, 0.0);
        self.last_y = Some(y);
        self.offset <= -self.max_travel + self.lock_margin
    }

    /// Finger lifted; an unlocked button returns to rest
    pub fn release(&mut self, locked: bool) {
        if self.last_y.take().is_none() {
            return;
        }
        self.shimmer = None;
        if !locked {
            self.return_to_rest();
        }
    }

    pub fn return_to_rest(&mut self) {
        self.last_y = None;
        self.shimmer = None;
        if self.offset < 0.0 && self.returning.is_none() {
            debug!("[DRAG] returning from {:.1}", self.offset);
            self.returning = Some(Tween::new(
                self.offset,
                0.0,
                self.return_duration,
                Easing::EaseInOut,
            ));
        }
    }

    /// Snap back to rest and drop any press
    pub fn reset(&mut self) {
        self.offset = 0.0;
        self.last_y = None;
        self.shimmer = None;
        self.returning = None;
    }

    pub fn advance(&mut self, dt: Duration) {
        if let Some(elapsed) = self.shimmer.as_mut() {
            *elapsed += dt;
        }
        if let Some(tween) = self.returning.as_mut() {
            tween.advance(dt);
            self.offset = tween.value();
            if tween.is_finished() {
                self.returning = None;
            }
        }
    }

    /// Button rect around `rest`, the center of the button at rest
    pub fn button_rect(&self, rest: Pos2) -> Rect {
        Rect::from_center_size(pos2(rest.x, rest.y + self.offset), Vec2::splat(BUTTON_SIZE))
    }

    /// Status icon rect, riding above the button
    pub fn status_rect(&self, rest: Pos2) -> Rect {
        let button = self.button_rect(rest);
        Rect::from_center_size(
            pos2(
                button.center().x,
                button.top() - STATUS_ICON_GAP - STATUS_ICON_SIZE / 2.0,
            ),
            Vec2::splat(STATUS_ICON_SIZE),
        )
    }

    /// Shimmer band, sweeping from below the button to above it
    pub fn shimmer_rect(&self, rest: Pos2) -> Option<Rect> {
        let phase = self.shimmer_phase()?;
        let button = self.button_rect(rest);
        let band = BUTTON_SIZE / 3.0;
        let center_y = button.bottom() + band / 2.0 - phase * (BUTTON_SIZE + band);
        Some(Rect::from_center_size(
            pos2(button.center().x, center_y),
            Vec2::new(BUTTON_SIZE, band),
        ))
    }
}
