//! Painter for the lock view
//!
//! Reads the retained [`GlyphCanvas`] and draws each glyph with egui shapes.
//! Canvas coordinates are relative to the lock view's origin; the
//! background travels above that origin while dragging, so the allocated
//! area reserves the travel distance on top.

use crate::config::LockConfig;
use crate::render::{Glyph, GlyphCanvas};
use crate::ui::theme::Theme;
use egui::{pos2, vec2, Painter, Pos2, Rect, Sense, Shape, Stroke, Vec2};

pub struct LockView<'a> {
    canvas: &'a GlyphCanvas,
    config: &'a LockConfig,
    theme: &'a Theme,
}

impl<'a> LockView<'a> {
    pub fn new(canvas: &'a GlyphCanvas, config: &'a LockConfig, theme: &'a Theme) -> Self {
        Self {
            canvas,
            config,
            theme,
        }
    }

    /// Size reserved in the layout
    pub fn desired_size(config: &LockConfig) -> Vec2 {
        vec2(
            config.view_width,
            config.background_start_height + config.vertical_travel,
        )
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) =
            ui.allocate_exact_size(Self::desired_size(self.config), Sense::hover());

        if ui.is_rect_visible(rect) {
            let origin = rect.min + vec2(0.0, self.config.vertical_travel);
            self.paint(ui.painter(), origin);

            if self.config.variant.show_debug_border {
                ui.painter()
                    .rect_stroke(rect, 0.0, Stroke::new(1.0, self.theme.debug_border));
            }
        }

        response
    }

    fn paint(&self, painter: &Painter, origin: Pos2) {
        let view_alpha = self.canvas.view_alpha();
        let place = |glyph: Glyph| {
            let state = self.canvas.glyph(glyph);
            (
                state.scaled_rect().translate(origin.to_vec2()),
                state.effective_alpha(view_alpha),
            )
        };

        let (rect, alpha) = place(Glyph::Background);
        if alpha > 0.0 {
            painter.rect_filled(
                rect,
                rect.width() / 2.0,
                self.theme.lock_background.gamma_multiply(alpha),
            );
        }

        let (rect, alpha) = place(Glyph::Shackle);
        if alpha > 0.0 {
            paint_shackle(painter, rect, Stroke::new(2.0, self.theme.glyph_color(alpha)));
        }

        let (rect, alpha) = place(Glyph::Body);
        if alpha > 0.0 {
            painter.rect_filled(rect, 2.0, self.theme.glyph_color(alpha));
        }

        let (rect, alpha) = place(Glyph::DirectionArrow);
        if alpha > 0.0 {
            paint_chevron(painter, rect, Stroke::new(2.0, self.theme.glyph_color(alpha)));
        }

        let (rect, alpha) = place(Glyph::Locked);
        if alpha > 0.0 {
            paint_closed_lock(painter, rect, alpha, self.theme);
        }
    }
}

/// Upper half of a ring spanning the rect
fn paint_shackle(painter: &Painter, rect: Rect, stroke: Stroke) {
    let radius = rect.width() / 2.0;
    let center = pos2(rect.center().x, rect.bottom());
    let segments = 12;
    let points: Vec<Pos2> = (0..=segments)
        .map(|i| {
            let angle = std::f32::consts::PI * (i as f32 / segments as f32);
            pos2(
                center.x - radius * angle.cos(),
                center.y - rect.height() * angle.sin(),
            )
        })
        .collect();
    painter.add(Shape::line(points, stroke));
}

/// Upward chevron
fn paint_chevron(painter: &Painter, rect: Rect, stroke: Stroke) {
    painter.add(Shape::line(
        vec![rect.left_bottom(), rect.center_top(), rect.right_bottom()],
        stroke,
    ));
}

/// Background pill with a closed padlock in the middle
fn paint_closed_lock(painter: &Painter, rect: Rect, alpha: f32, theme: &Theme) {
    painter.rect_filled(rect, rect.width() / 2.0, theme.locked.gamma_multiply(alpha));

    let glyph = theme.text_primary.gamma_multiply(alpha);
    let body = Rect::from_center_size(
        rect.center() + vec2(0.0, rect.height() * 0.12),
        rect.size() * vec2(0.42, 0.3),
    );
    painter.rect_filled(body, 2.0, glyph);

    let shackle = Rect::from_min_max(
        pos2(body.left() + body.width() * 0.2, body.top() - rect.height() * 0.2),
        pos2(body.right() - body.width() * 0.2, body.top()),
    );
    paint_shackle(painter, shackle, Stroke::new(2.0, glyph));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desired_size_reserves_travel() {
        let config = LockConfig::default();
        assert_eq!(LockView::desired_size(&config), vec2(150.0, 200.0));
    }
}
