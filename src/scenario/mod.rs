//! Scripted gesture scenarios
//!
//! A scenario is a TOML file listing timed actions (gesture samples, the
//! external Cancel control) with optional assertions checked right after
//! each action. Scenarios run headless against a [`GlyphCanvas`], so the
//! whole control can be exercised without a window.
//!
//! [`GlyphCanvas`]: crate::render::GlyphCanvas

mod runner;

pub use runner::{ScenarioReport, ScenarioRunner, StepFailure};

use crate::error::{Result, SwipeLockError};
use crate::gesture::{GesturePhase, GestureSample, InteractionOutcome};
use crate::render::Glyph;
use crate::state::RecorderState;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// A scenario loaded from a TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Scenario metadata
    pub scenario: ScenarioMetadata,
    /// Timed steps, in time order
    pub steps: Vec<ScenarioStep>,
}

/// Metadata about the scenario
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A single action with timing
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioStep {
    /// Time in milliseconds after scenario start
    pub time_ms: u64,
    pub action: StepAction,
    /// Checked right after the action
    #[serde(default)]
    pub assert: Option<Assertion>,
}

impl ScenarioStep {
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.time_ms)
    }
}

/// Actions a step can perform
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    /// Deliver a gesture sample
    Gesture { phase: GesturePhase, x: f32, y: f32 },
    /// Press the external Cancel control
    Release,
    /// Only let time pass
    Wait,
    /// Log a message
    Log { message: String },
}

impl StepAction {
    pub fn sample(&self) -> Option<GestureSample> {
        match self {
            StepAction::Gesture { phase, x, y } => Some(GestureSample::new(*phase, *x, *y)),
            _ => None,
        }
    }
}

fn default_tolerance() -> f32 {
    1e-3
}

/// Conditions checked after a step
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Displayed lock progress
    Progress {
        value: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    /// Gesture is latched
    IsLocked,
    /// Gesture is not latched
    IsUnlocked,
    /// Value of the shared lock flag
    Flag { locked: bool },
    /// Last outcome of the gesture
    Outcome { outcome: InteractionOutcome },
    /// No outcome yet for the current gesture
    NoOutcome,
    RecorderState { state: RecorderState },
    /// Number of completed confirmation animations
    ConfirmationsCompleted { count: u32 },
    /// Opacity of the whole lock view
    ViewAlpha {
        value: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    GlyphVisible { glyph: Glyph },
    GlyphHidden { glyph: Glyph },
}

impl Scenario {
    /// Load a scenario from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SwipeLockError::IOError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            SwipeLockError::ScenarioError(msg) => {
                SwipeLockError::ScenarioError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse and validate a scenario from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: Scenario =
            toml::from_str(content).map_err(|e| SwipeLockError::ScenarioError(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(SwipeLockError::ScenarioError(
                "scenario must have at least one step".to_string(),
            ));
        }

        let mut last_time = 0;
        for step in &self.steps {
            if step.time_ms < last_time {
                return Err(SwipeLockError::ScenarioError(format!(
                    "steps must be ordered by time, found {}ms after {}ms",
                    step.time_ms, last_time
                )));
            }
            last_time = step.time_ms;
        }

        Ok(())
    }
}
