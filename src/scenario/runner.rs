//! Headless scenario execution
//!
//! The runner owns a controller drawing into a [`GlyphCanvas`] and a virtual
//! clock. Before each step it advances the controller frame by frame until
//! the step's time, then applies the action and checks its assertion.

use super::{Assertion, Scenario, StepAction};
use crate::config::LockConfig;
use crate::controller::SwipeLockController;
use crate::render::GlyphCanvas;
use crate::state::LockFlag;
use std::time::Duration;
use tracing::{debug, error, info};

/// Virtual frame length used between steps
pub const FRAME: Duration = Duration::from_millis(16);

/// A failed assertion
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub step: usize,
    pub time_ms: u64,
    pub reason: String,
}

/// Outcome of a whole scenario run
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: String,
    pub steps_run: usize,
    pub failures: Vec<StepFailure>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        let status = if self.passed() { "PASSED" } else { "FAILED" };
        format!(
            "[SCENARIO] '{}' {}: {} steps, {} failed assertions",
            self.name,
            status,
            self.steps_run,
            self.failures.len()
        )
    }
}

pub struct ScenarioRunner {
    scenario: Scenario,
    controller: SwipeLockController<GlyphCanvas>,
    clock: Duration,
}

impl ScenarioRunner {
    pub fn new(scenario: Scenario, config: LockConfig) -> Self {
        info!("[SCENARIO] Loaded scenario: {}", scenario.scenario.name);
        if !scenario.scenario.description.is_empty() {
            info!("[SCENARIO] Description: {}", scenario.scenario.description);
        }
        info!("[SCENARIO] Total steps: {}", scenario.steps.len());

        Self {
            scenario,
            controller: SwipeLockController::new(config, LockFlag::new(), GlyphCanvas::new()),
            clock: Duration::ZERO,
        }
    }

    pub fn controller(&self) -> &SwipeLockController<GlyphCanvas> {
        &self.controller
    }

    /// Virtual time elapsed since the start of the run
    pub fn elapsed(&self) -> Duration {
        self.clock
    }

    /// Execute every step and collect failed assertions
    pub fn run(&mut self) -> ScenarioReport {
        let mut failures = Vec::new();
        let steps = self.scenario.steps.clone();

        for (index, step) in steps.iter().enumerate() {
            self.advance_to(step.at());
            debug!("[SCENARIO] step {} at {}ms: {:?}", index, step.time_ms, step.action);
            self.apply(&step.action);

            if let Some(assertion) = &step.assert {
                match self.check(assertion) {
                    Ok(()) => info!("[SCENARIO] PASS: {:?}", assertion),
                    Err(reason) => {
                        error!("[SCENARIO] FAIL: {:?} - {}", assertion, reason);
                        failures.push(StepFailure {
                            step: index,
                            time_ms: step.time_ms,
                            reason,
                        });
                    }
                }
            }
        }

        let report = ScenarioReport {
            name: self.scenario.scenario.name.clone(),
            steps_run: steps.len(),
            failures,
        };
        info!("{}", report.summary());
        report
    }

    fn advance_to(&mut self, target: Duration) {
        while self.clock < target {
            let dt = (target - self.clock).min(FRAME);
            self.controller.advance(dt);
            self.clock += dt;
        }
    }

    fn apply(&mut self, action: &StepAction) {
        match action {
            StepAction::Gesture { .. } => {
                if let Some(sample) = action.sample() {
                    self.controller.handle_sample(sample);
                }
            }
            StepAction::Release => self.controller.release(),
            StepAction::Wait => {}
            StepAction::Log { message } => info!("[SCENARIO] Log: {}", message),
        }
    }

    /// Check an assertion against the controller as it is now
    pub fn check(&self, assertion: &Assertion) -> Result<(), String> {
        let c = &self.controller;
        let canvas = c.renderer();

        match assertion {
            Assertion::Progress { value, tolerance } => {
                ensure_close("progress", c.progress(), *value, *tolerance)
            }
            Assertion::IsLocked => ensure(c.is_locked(), "expected the gesture to be locked"),
            Assertion::IsUnlocked => {
                ensure(!c.is_locked(), "expected the gesture to be unlocked")
            }
            Assertion::Flag { locked } => {
                let actual = c.flag().get();
                ensure(
                    actual == *locked,
                    format!("expected lock flag {}, got {}", locked, actual),
                )
            }
            Assertion::Outcome { outcome } => match c.last_outcome() {
                Some(actual) if actual == *outcome => Ok(()),
                Some(actual) => Err(format!("expected outcome {}, got {}", outcome, actual)),
                None => Err(format!("expected outcome {}, got none", outcome)),
            },
            Assertion::NoOutcome => match c.last_outcome() {
                None => Ok(()),
                Some(actual) => Err(format!("expected no outcome, got {}", actual)),
            },
            Assertion::RecorderState { state } => {
                let actual = c.recorder_state();
                ensure(
                    actual == *state,
                    format!("expected recorder {}, got {}", state, actual),
                )
            }
            Assertion::ConfirmationsCompleted { count } => {
                let actual = c.confirmations_completed();
                ensure(
                    actual == *count,
                    format!("expected {} confirmations, got {}", count, actual),
                )
            }
            Assertion::ViewAlpha { value, tolerance } => {
                ensure_close("view alpha", canvas.view_alpha(), *value, *tolerance)
            }
            Assertion::GlyphVisible { glyph } => ensure(
                canvas.is_visible(*glyph),
                format!("expected {:?} to be visible", glyph),
            ),
            Assertion::GlyphHidden { glyph } => ensure(
                !canvas.is_visible(*glyph),
                format!("expected {:?} to be hidden", glyph),
            ),
        }
    }
}

fn ensure(ok: bool, reason: impl Into<String>) -> Result<(), String> {
    if ok {
        Ok(())
    } else {
        Err(reason.into())
    }
}

fn ensure_close(what: &str, actual: f32, expected: f32, tolerance: f32) -> Result<(), String> {
    ensure(
        (actual - expected).abs() <= tolerance,
        format!("expected {} {:.3}, got {:.3}", what, expected, actual),
    )
}
