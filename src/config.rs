//! Configuration for the swipe-lock control
//!
//! Every constant the control depends on lives here: drag thresholds,
//! animation timings, the sizes of the glyph images the layout is derived
//! from, and the variant flags that distinguish the hosting screens.
//! Defaults reproduce the stock chat recorder.

use crate::error::{Result, SwipeLockError};
use egui::Vec2;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Image sizes of the glyphs drawn by the lock view, in points
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlyphSizes {
    /// Background pill at its fully extended size
    pub background: [f32; 2],
    /// Lock shackle
    pub shackle: [f32; 2],
    /// Lock body
    pub body: [f32; 2],
    /// Closed lock shown once latched
    pub locked: [f32; 2],
    /// Upward chevron under the lock
    pub direction: [f32; 2],
}

impl Default for GlyphSizes {
    fn default() -> Self {
        Self {
            background: [38.0, 86.0],
            shackle: [12.0, 10.0],
            body: [16.0, 13.0],
            locked: [38.0, 38.0],
            direction: [10.0, 6.0],
        }
    }
}

impl GlyphSizes {
    pub fn background(&self) -> Vec2 {
        Vec2::from(self.background)
    }

    pub fn shackle(&self) -> Vec2 {
        Vec2::from(self.shackle)
    }

    pub fn body(&self) -> Vec2 {
        Vec2::from(self.body)
    }

    pub fn locked(&self) -> Vec2 {
        Vec2::from(self.locked)
    }

    pub fn direction(&self) -> Vec2 {
        Vec2::from(self.direction)
    }

    fn validate(&self) -> Result<()> {
        let all = [
            ("background", self.background),
            ("shackle", self.shackle),
            ("body", self.body),
            ("locked", self.locked),
            ("direction", self.direction),
        ];
        for (name, [w, h]) in all {
            if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
                return Err(SwipeLockError::ConfigError(format!(
                    "glyph size '{}' must be positive, got {}x{}",
                    name, w, h
                )));
            }
        }
        Ok(())
    }
}

/// Behavior switches that used to be separate screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Variant {
    /// Fade the whole lock view out once the confirmation zoom finishes
    pub fade_out_after_lock: bool,
    /// Put the alpha back to 1 after the fade-out completes
    pub restore_alpha_after_fade: bool,
    /// Center the background horizontally inside the host view
    pub center_horizontally: bool,
    /// Outline the host view (layout debugging)
    pub show_debug_border: bool,
    /// The record button follows the finger and latches near the top of its travel
    pub drag_button_follows_finger: bool,
}

impl Default for Variant {
    fn default() -> Self {
        Self {
            fade_out_after_lock: true,
            restore_alpha_after_fade: true,
            center_horizontally: true,
            show_debug_border: false,
            drag_button_follows_finger: false,
        }
    }
}

/// Swipe-lock configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Upward drag distance that latches the lock
    pub lock_distance: f32,
    /// Leftward drag distance that cancels the recording
    pub cancel_distance: f32,
    /// Duration of the fade and settle animations, in milliseconds
    pub animation_duration_ms: u64,
    /// Duration of each half of the confirmation zoom, in milliseconds
    pub zoom_duration_ms: u64,
    /// Peak scale of the confirmation zoom
    pub zoom_scale: f32,
    /// How far the background travels upward while dragging
    pub vertical_travel: f32,
    /// Height of the background pill at rest
    pub background_start_height: f32,
    /// Width of the host view the lock view is laid out in
    pub view_width: f32,
    /// Press duration before the record button starts recording, in milliseconds
    pub min_press_duration_ms: u64,
    /// Pointer slop allowed before the press is recognized
    pub allowable_movement: f32,
    /// Height of the host screen, in points
    pub host_height: f32,
    /// Maximum upward travel of a dragged record button, as a fraction of `host_height`
    pub drag_travel_fraction: f32,
    /// Distance from the top of the travel at which a dragged button latches
    pub drag_lock_margin: f32,
    /// Duration of the dragged button's return to rest, in milliseconds
    pub drag_return_duration_ms: u64,
    /// Glyph image sizes
    pub glyphs: GlyphSizes,
    /// Variant flags
    pub variant: Variant,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            lock_distance: 100.0,
            cancel_distance: 150.0,
            animation_duration_ms: 200,
            zoom_duration_ms: 200,
            zoom_scale: 1.3,
            vertical_travel: 50.0,
            background_start_height: 150.0,
            view_width: 150.0,
            min_press_duration_ms: 500,
            allowable_movement: 10.0,
            host_height: 560.0,
            drag_travel_fraction: 0.1,
            drag_lock_margin: 10.0,
            drag_return_duration_ms: 300,
            glyphs: GlyphSizes::default(),
            variant: Variant::default(),
        }
    }
}

impl LockConfig {
    /// Load a configuration from a TOML file
    ///
    /// Missing keys take their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SwipeLockError::IOError(format!("{}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            SwipeLockError::ConfigError(msg) => {
                SwipeLockError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LockConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the lock distance
    pub fn with_lock_distance(mut self, distance: f32) -> Self {
        self.lock_distance = distance;
        self
    }

    /// Set the slide-to-cancel distance
    pub fn with_cancel_distance(mut self, distance: f32) -> Self {
        self.cancel_distance = distance;
        self
    }

    /// Set the variant flags
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Recognize the press immediately, without a hold delay
    pub fn without_press_delay(mut self) -> Self {
        self.min_press_duration_ms = 0;
        self
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn zoom_duration(&self) -> Duration {
        Duration::from_millis(self.zoom_duration_ms)
    }

    pub fn min_press_duration(&self) -> Duration {
        Duration::from_millis(self.min_press_duration_ms)
    }

    pub fn drag_return_duration(&self) -> Duration {
        Duration::from_millis(self.drag_return_duration_ms)
    }

    /// Upward travel available to a dragged record button
    pub fn drag_max_travel(&self) -> f32 {
        self.host_height * self.drag_travel_fraction
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("lock_distance", self.lock_distance),
            ("cancel_distance", self.cancel_distance),
            ("zoom_scale", self.zoom_scale),
            ("background_start_height", self.background_start_height),
            ("view_width", self.view_width),
            ("host_height", self.host_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SwipeLockError::ConfigError(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        if !self.vertical_travel.is_finite() || self.vertical_travel < 0.0 {
            return Err(SwipeLockError::ConfigError(format!(
                "vertical_travel must not be negative, got {}",
                self.vertical_travel
            )));
        }

        if !self.allowable_movement.is_finite() || self.allowable_movement < 0.0 {
            return Err(SwipeLockError::ConfigError(format!(
                "allowable_movement must not be negative, got {}",
                self.allowable_movement
            )));
        }

        if !(self.drag_travel_fraction > 0.0 && self.drag_travel_fraction <= 1.0) {
            return Err(SwipeLockError::ConfigError(format!(
                "drag_travel_fraction must be in (0, 1], got {}",
                self.drag_travel_fraction
            )));
        }

        if !self.drag_lock_margin.is_finite() || self.drag_lock_margin < 0.0 {
            return Err(SwipeLockError::ConfigError(format!(
                "drag_lock_margin must not be negative, got {}",
                self.drag_lock_margin
            )));
        }

        self.glyphs.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LockConfig::default();
        assert_eq!(config.lock_distance, 100.0);
        assert_eq!(config.animation_duration(), Duration::from_millis(200));
        assert_eq!(config.zoom_scale, 1.3);
        assert!(config.variant.fade_out_after_lock);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = LockConfig::default()
            .with_lock_distance(80.0)
            .with_cancel_distance(120.0)
            .without_press_delay();

        assert_eq!(config.lock_distance, 80.0);
        assert_eq!(config.cancel_distance, 120.0);
        assert_eq!(config.min_press_duration(), Duration::ZERO);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            lock_distance = 120.0

            [glyphs]
            background = [40.0, 90.0]

            [variant]
            fade_out_after_lock = false
        "#;

        let config = LockConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.lock_distance, 120.0);
        assert_eq!(config.cancel_distance, 150.0);
        assert_eq!(config.glyphs.background, [40.0, 90.0]);
        assert_eq!(config.glyphs.shackle, GlyphSizes::default().shackle);
        assert!(!config.variant.fade_out_after_lock);
        assert!(config.variant.restore_alpha_after_fade);
    }

    #[test]
    fn test_rejects_zero_lock_distance() {
        let err = LockConfig::from_toml_str("lock_distance = 0.0").unwrap_err();
        assert!(matches!(err, SwipeLockError::ConfigError(_)));
    }

    #[test]
    fn test_builder_skips_validation() {
        let config = LockConfig::default().with_lock_distance(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_drag_travel_is_fraction_of_host_height() {
        let config = LockConfig::from_toml_str(
            "host_height = 800.0\n[variant]\ndrag_button_follows_finger = true",
        )
        .unwrap();
        assert!(config.variant.drag_button_follows_finger);
        assert_eq!(config.drag_max_travel(), 80.0);
        assert_eq!(config.drag_return_duration(), Duration::from_millis(300));

        let err = LockConfig::from_toml_str("drag_travel_fraction = 1.5").unwrap_err();
        assert!(err.to_string().contains("drag_travel_fraction"));
    }

    #[test]
    fn test_rejects_bad_glyph_size() {
        let err = LockConfig::from_toml_str("[glyphs]\nbody = [0.0, 13.0]").unwrap_err();
        assert!(err.to_string().contains("body"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = LockConfig::from_toml_str("lock_distance = \"far\"").unwrap_err();
        assert!(matches!(err, SwipeLockError::ConfigError(_)));
    }
}
