//! Theme and styling for the recorder screen

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Primary accent color
    pub primary: Color32,
    /// Recording indicator color
    pub recording: Color32,
    /// Color of the latched lock
    pub locked: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Lock view pill fill
    pub lock_background: Color32,
    /// Shackle, body and arrow strokes
    pub lock_glyph: Color32,
    /// Outline drawn when the debug border variant is on
    pub debug_border: Color32,

    pub button_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(99, 102, 241),    // Indigo
            recording: Color32::from_rgb(239, 68, 68),   // Red
            locked: Color32::from_rgb(34, 197, 94),      // Green

            bg_primary: Color32::from_rgb(17, 24, 39),
            bg_secondary: Color32::from_rgb(31, 41, 55),
            bg_tertiary: Color32::from_rgb(55, 65, 81),

            text_primary: Color32::from_rgb(249, 250, 251),
            text_secondary: Color32::from_rgb(209, 213, 219),
            text_muted: Color32::from_rgb(156, 163, 175),

            lock_background: Color32::from_rgb(55, 65, 81),
            lock_glyph: Color32::from_rgb(209, 213, 219),
            debug_border: Color32::from_rgb(234, 179, 8), // Yellow

            button_rounding: Rounding::same(8.0),

            spacing: 16.0,
            spacing_sm: 8.0,
        }
    }

    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(79, 70, 229),
            recording: Color32::from_rgb(220, 38, 38),
            locked: Color32::from_rgb(22, 163, 74),

            bg_primary: Color32::from_rgb(255, 255, 255),
            bg_secondary: Color32::from_rgb(243, 244, 246),
            bg_tertiary: Color32::from_rgb(229, 231, 235),

            text_primary: Color32::from_rgb(17, 24, 39),
            text_secondary: Color32::from_rgb(55, 65, 81),
            text_muted: Color32::from_rgb(107, 114, 128),

            lock_background: Color32::from_rgb(229, 231, 235),
            lock_glyph: Color32::from_rgb(55, 65, 81),
            debug_border: Color32::from_rgb(202, 138, 4),

            button_rounding: Rounding::same(8.0),

            spacing: 16.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_tertiary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_muted);

        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.primary;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.button_padding = Vec2::new(self.spacing, self.spacing_sm);
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );
        ctx.set_style(style);
    }

    /// Glyph color with the given opacity applied
    pub fn glyph_color(&self, alpha: f32) -> Color32 {
        self.lock_glyph.gamma_multiply(alpha.clamp(0.0, 1.0))
    }
}
