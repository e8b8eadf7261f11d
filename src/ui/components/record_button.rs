//! Record button component
//!
//! The button is a press-and-hold control. [`PressRecognizer`] turns raw
//! pointer input into gesture samples the way a long-press recognizer
//! does: nothing happens until the pointer has been held for the minimum
//! duration without drifting, then every move becomes a `Changed` sample
//! until release.
//!
//! When the drag-to-lock variant is on, the button is painted where the
//! controller placed [`Glyph::DragButton`], with the shimmer band and the
//! open/closed status icon riding along. The hit area stays at rest.

use crate::config::LockConfig;
use crate::gesture::GestureSample;
use crate::render::{Glyph, GlyphCanvas};
use crate::state::RecorderState;
use crate::ui::theme::Theme;
use egui::{pos2, Color32, Key, Painter, Pos2, Rect, Sense, Stroke, Vec2};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PressState {
    Idle,
    /// Pointer down, waiting for the minimum press duration
    Pending { origin: Pos2, held: Duration },
    /// Gesture began; samples are flowing
    Active,
    /// Pointer drifted before the press was recognized
    Failed,
}

/// Long-press recognizer producing [`GestureSample`]s
#[derive(Debug, Clone)]
pub struct PressRecognizer {
    min_press: Duration,
    allowable_movement: f32,
    state: PressState,
    last: Pos2,
}

impl PressRecognizer {
    pub fn new(config: &LockConfig) -> Self {
        Self {
            min_press: config.min_press_duration(),
            allowable_movement: config.allowable_movement,
            state: PressState::Idle,
            last: Pos2::ZERO,
        }
    }

    /// Whether the pointer is down on the button
    pub fn is_tracking(&self) -> bool {
        !matches!(self.state, PressState::Idle)
    }

    /// Whether a gesture has begun and not yet ended
    pub fn is_active(&self) -> bool {
        matches!(self.state, PressState::Active)
    }

    pub fn press(&mut self, position: Pos2) -> Option<GestureSample> {
        self.last = position;
        if self.min_press.is_zero() {
            self.state = PressState::Active;
            return Some(GestureSample::began(position.x, position.y));
        }
        self.state = PressState::Pending {
            origin: position,
            held: Duration::ZERO,
        };
        None
    }

    pub fn moved(&mut self, position: Pos2) -> Option<GestureSample> {
        self.last = position;
        match self.state {
            PressState::Pending { origin, .. } => {
                if origin.distance(position) > self.allowable_movement {
                    debug!("[PRESS] moved before recognition, failing");
                    self.state = PressState::Failed;
                }
                None
            }
            PressState::Active => Some(GestureSample::changed(position.x, position.y)),
            PressState::Idle | PressState::Failed => None,
        }
    }

    /// Let time pass while the pointer is held
    pub fn tick(&mut self, dt: Duration) -> Option<GestureSample> {
        if let PressState::Pending { origin, held } = self.state {
            let held = held + dt;
            if held >= self.min_press {
                debug!("[PRESS] recognized after {:?}", held);
                self.state = PressState::Active;
                return Some(GestureSample::began(self.last.x, self.last.y));
            }
            self.state = PressState::Pending { origin, held };
        }
        None
    }

    pub fn release(&mut self, position: Pos2) -> Option<GestureSample> {
        let was_active = self.is_active();
        self.state = PressState::Idle;
        self.last = position;
        was_active.then(|| GestureSample::ended(position.x, position.y))
    }

    /// Abort the press, e.g. on Escape or when the window loses the pointer
    pub fn cancel(&mut self) -> Option<GestureSample> {
        let was_active = self.is_active();
        self.state = PressState::Idle;
        was_active.then(|| GestureSample::cancelled(self.last.x, self.last.y))
    }
}

/// Samples produced by the button during one frame
pub struct RecordButtonOutput {
    pub response: egui::Response,
    pub samples: Vec<GestureSample>,
}

/// Press-and-hold record button
pub struct RecordButton<'a> {
    recognizer: &'a mut PressRecognizer,
    recorder: RecorderState,
    theme: &'a Theme,
    follower: Option<&'a GlyphCanvas>,
}

impl<'a> RecordButton<'a> {
    pub fn new(recognizer: &'a mut PressRecognizer, recorder: RecorderState, theme: &'a Theme) -> Self {
        Self {
            recognizer,
            recorder,
            theme,
            follower: None,
        }
    }

    /// Paint the button where `canvas` holds it, once the drag glyph is visible
    pub fn following(mut self, canvas: &'a GlyphCanvas) -> Self {
        self.follower = Some(canvas);
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> RecordButtonOutput {
        let size = Vec2::new(60.0, 60.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Record")
        });

        if ui.is_rect_visible(rect) {
            self.paint_button(ui, rect, &response);
        }

        let samples = self.handle_pointer(ui, &response);
        RecordButtonOutput { response, samples }
    }

    fn handle_pointer(self, ui: &egui::Ui, response: &egui::Response) -> Vec<GestureSample> {
        let (primary_down, pointer, dt, escape) = ui.input(|i| {
            (
                i.pointer.primary_down(),
                i.pointer.interact_pos(),
                Duration::from_secs_f32(i.stable_dt.max(0.0)),
                i.key_pressed(Key::Escape),
            )
        });

        let recognizer = self.recognizer;
        let mut samples = Vec::new();

        if !recognizer.is_tracking() {
            if response.is_pointer_button_down_on() {
                if let Some(pos) = pointer {
                    samples.extend(recognizer.press(pos));
                }
            }
            return samples;
        }

        if escape {
            samples.extend(recognizer.cancel());
            return samples;
        }

        let pos = pointer.unwrap_or(recognizer.last);
        if primary_down {
            samples.extend(recognizer.moved(pos));
            samples.extend(recognizer.tick(dt));
            if recognizer.is_tracking() && !recognizer.is_active() {
                ui.ctx().request_repaint();
            }
        } else {
            samples.extend(recognizer.release(pos));
        }
        samples
    }

    fn paint_button(&self, ui: &egui::Ui, rect: Rect, response: &egui::Response) {
        let painter = ui.painter();
        let bg_color = match self.recorder {
            RecorderState::Recording => self.theme.recording,
            RecorderState::Locked => self.theme.locked,
            RecorderState::Idle if response.hovered() => self.theme.primary.gamma_multiply(1.2),
            RecorderState::Idle => self.theme.primary,
        };

        let Some(canvas) = self.follower.filter(|c| !c.glyph(Glyph::DragButton).hidden) else {
            self.paint_face(painter, rect.center(), bg_color);
            return;
        };

        // Glyph rects are relative to the button's rest center
        let origin = rect.center().to_vec2();
        let center = canvas.glyph(Glyph::DragButton).rect.center() + origin;
        self.paint_face(painter, center, bg_color);

        if !canvas.glyph(Glyph::Shimmer).hidden {
            let band = canvas.glyph(Glyph::Shimmer).rect.translate(origin);
            paint_shimmer(painter, center, band);
        }
        if !canvas.glyph(Glyph::StatusIcon).hidden {
            let icon = canvas.glyph(Glyph::StatusIcon).rect.translate(origin);
            paint_status_icon(painter, icon, canvas.status_locked(), self.theme.lock_glyph);
        }
    }

    fn paint_face(&self, painter: &Painter, center: Pos2, bg_color: Color32) {
        painter.circle_filled(center, BUTTON_RADIUS, bg_color);

        if self.recorder.is_recording() {
            painter.rect_filled(
                Rect::from_center_size(center, Vec2::splat(16.0)),
                2.0,
                Color32::WHITE,
            );
        } else {
            // Microphone capsule
            painter.rect_filled(
                Rect::from_center_size(center, Vec2::new(8.0, 14.0)),
                4.0,
                Color32::WHITE,
            );
        }
    }
}

const BUTTON_RADIUS: f32 = 28.0;

/// Light chord across the button face at the band's height
fn paint_shimmer(painter: &Painter, center: Pos2, band: Rect) {
    let dy = band.center().y - center.y;
    if dy.abs() >= BUTTON_RADIUS {
        return;
    }
    let half_width = (BUTTON_RADIUS * BUTTON_RADIUS - dy * dy).sqrt();
    let y = band.center().y;
    painter.line_segment(
        [pos2(center.x - half_width, y), pos2(center.x + half_width, y)],
        Stroke::new(band.height() * 0.5, Color32::from_white_alpha(60)),
    );
}

/// Padlock whose shackle swings open while unlocked
fn paint_status_icon(painter: &Painter, rect: Rect, locked: bool, color: Color32) {
    let body = Rect::from_min_max(
        pos2(rect.left() + rect.width() * 0.2, rect.center().y),
        pos2(rect.right() - rect.width() * 0.2, rect.bottom()),
    );
    painter.rect_filled(body, 2.0, color);

    let stroke = Stroke::new(2.0, color);
    let left = body.left() + body.width() * 0.2;
    let right = body.right() - body.width() * 0.2;
    let top = rect.top() + rect.height() * 0.1;
    if locked {
        painter.line_segment([pos2(left, body.top()), pos2(left, top)], stroke);
        painter.line_segment([pos2(left, top), pos2(right, top)], stroke);
        painter.line_segment([pos2(right, top), pos2(right, body.top())], stroke);
    } else {
        // Swung up and to the right, with only the hinge side attached
        let lift = rect.height() * 0.1;
        let shift = body.width() * 0.3;
        painter.line_segment([pos2(right, body.top()), pos2(right, top - lift)], stroke);
        painter.line_segment(
            [pos2(right, top - lift), pos2(right + shift, top - lift)],
            stroke,
        );
        painter.line_segment(
            [pos2(right + shift, top - lift), pos2(right + shift, top)],
            stroke,
        );
    }
}
