//! Recorder screen and eframe integration

use crate::config::LockConfig;
use crate::controller::SwipeLockController;
use crate::render::{Glyph, GlyphCanvas};
use crate::state::{LockFlag, RecorderState};
use crate::ui::components::{LockView, PressRecognizer, RecordButton};
use crate::ui::theme::Theme;
use egui::{CentralPanel, RichText};
use std::time::Duration;
use tracing::info;

/// Recorder screen with the swipe-lock control
pub struct SwipeLockApp {
    controller: SwipeLockController<GlyphCanvas>,
    recognizer: PressRecognizer,
    theme: Theme,
    /// Host-side handle to the shared lock flag
    flag: LockFlag,
}

impl SwipeLockApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: LockConfig) -> Self {
        let app = Self::from_config(config);
        app.theme.apply(&cc.egui_ctx);
        info!("[UI] recorder screen initialized");
        app
    }

    /// Build the screen without an eframe context
    pub fn from_config(config: LockConfig) -> Self {
        let flag = LockFlag::new();
        let recognizer = PressRecognizer::new(&config);
        Self {
            controller: SwipeLockController::new(config, flag.clone(), GlyphCanvas::new()),
            recognizer,
            theme: Theme::dark(),
            flag,
        }
    }

    pub fn controller(&self) -> &SwipeLockController<GlyphCanvas> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SwipeLockController<GlyphCanvas> {
        &mut self.controller
    }

    pub fn flag(&self) -> &LockFlag {
        &self.flag
    }

    /// Render one frame
    pub fn ui(&mut self, ctx: &egui::Context) {
        let dt = ctx.input(|i| Duration::from_secs_f32(i.stable_dt.max(0.0)));
        self.controller.advance(dt);

        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(self.theme.spacing);

                let status = status_text(self.controller.recorder_state());
                let response = ui.label(
                    RichText::new(status)
                        .size(14.0)
                        .color(self.theme.text_secondary),
                );
                response.widget_info(|| {
                    egui::WidgetInfo::labeled(
                        egui::WidgetType::Label,
                        true,
                        format!("Status: {}", status),
                    )
                });

                ui.add_space(self.theme.spacing);
                LockView::new(
                    self.controller.renderer(),
                    self.controller.config(),
                    &self.theme,
                )
                .show(ui);

                ui.add_space(self.theme.spacing_sm);
                show_cancel_hint(ui, self.controller.renderer(), &self.theme);

                let output = RecordButton::new(
                    &mut self.recognizer,
                    self.controller.recorder_state(),
                    &self.theme,
                )
                .following(self.controller.renderer())
                .show(ui);
                for sample in output.samples {
                    self.controller.handle_sample(sample);
                }

                if self.flag.get() {
                    ui.add_space(self.theme.spacing);
                    let response = ui.button("Cancel");
                    response.widget_info(|| {
                        egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Cancel")
                    });
                    if response.clicked() {
                        info!("[UI] cancel pressed, releasing lock");
                        self.controller.release();
                    }
                }
            });
        });

        if self.controller.is_animating() || self.recognizer.is_tracking() {
            ctx.request_repaint();
        }
    }
}

fn show_cancel_hint(ui: &mut egui::Ui, canvas: &GlyphCanvas, theme: &Theme) {
    let alpha = canvas.glyph(Glyph::CancelHint).effective_alpha(1.0);
    let text = RichText::new("< Slide to cancel")
        .size(12.0)
        .color(theme.text_muted.gamma_multiply(alpha));
    // Keep the row height stable while hidden
    ui.add_visible(alpha > 0.0, egui::Label::new(text));
}

fn status_text(state: RecorderState) -> &'static str {
    match state {
        RecorderState::Idle => "Hold to record",
        RecorderState::Recording => "Recording...",
        RecorderState::Locked => "Recording hands-free",
    }
}

impl eframe::App for SwipeLockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}
