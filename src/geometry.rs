//! Lock view layout
//!
//! The lock affordance is four overlaid glyphs (background pill, shackle,
//! body, direction arrow) plus a closed-lock glyph shown once latched. Each
//! glyph moves on a straight line between a `start` keyframe (at rest) and an
//! `end` keyframe (fully dragged); all keyframes are derived from the glyph
//! image sizes in [`LockConfig`].

use crate::config::LockConfig;
use egui::{Pos2, Rect, Vec2};

/// Types that can be linearly interpolated
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for Vec2 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        *self + (*target - *self) * fraction
    }
}

impl Lerp for Pos2 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        *self + (*target - *self) * fraction
    }
}

/// Clamp a progress value into `[0, 1]`; NaN counts as 0
pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// A start/end pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe<T> {
    pub start: T,
    pub end: T,
}

impl<T: Lerp> Keyframe<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    /// Value at `progress`, clamped to the segment
    pub fn at(&self, progress: f32) -> T {
        self.start.lerp(&self.end, clamp_progress(progress))
    }
}

/// Placement of a single glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphFrame {
    pub rect: Rect,
    pub alpha: f32,
    pub hidden: bool,
}

impl GlyphFrame {
    fn visible(rect: Rect) -> Self {
        Self {
            rect,
            alpha: 1.0,
            hidden: false,
        }
    }

    pub fn center(&self) -> Pos2 {
        self.rect.center()
    }

    pub fn origin(&self) -> Pos2 {
        self.rect.min
    }

    pub fn size(&self) -> Vec2 {
        self.rect.size()
    }
}

/// Frames of every glyph at one progress value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationGeometry {
    pub background: GlyphFrame,
    pub shackle: GlyphFrame,
    pub body: GlyphFrame,
    pub direction: GlyphFrame,
    pub locked: GlyphFrame,
}

/// Keyframes of the lock view
#[derive(Debug, Clone, PartialEq)]
pub struct LockLayout {
    pub background_origin: Keyframe<Pos2>,
    pub background_size: Keyframe<Vec2>,
    pub body_center: Keyframe<Pos2>,
    pub shackle_center: Keyframe<Pos2>,
    pub direction_center: Keyframe<Pos2>,
    pub locked_origin: Pos2,
    shackle_size: Vec2,
    body_size: Vec2,
    direction_size: Vec2,
    locked_size: Vec2,
    x_offset: f32,
}

const DIRECTION_TOP_MARGIN: (f32, f32) = (20.0, 8.0);
const SHACKLE_BOTTOM_MARGIN: (f32, f32) = (-1.0, -5.0);
const BODY_RAISE: f32 = 20.0;

impl LockLayout {
    pub fn new(config: &LockConfig) -> Self {
        let glyphs = &config.glyphs;
        let shackle = glyphs.shackle();
        let body = glyphs.body();
        let direction = glyphs.direction();
        let travel = config.vertical_travel;

        let bg_start = Vec2::new(glyphs.background().x, config.background_start_height);
        let bg_end = glyphs.background();

        // Closed lock: shackle stacked on the body, overlapping by the end margin
        let closed_height = shackle.y + body.y + SHACKLE_BOTTOM_MARGIN.1;
        let closed_top = (bg_end.y - closed_height) / 2.0;

        let background_origin = Keyframe::new(Pos2::ZERO, Pos2::new(0.0, -travel));

        let body_center = Keyframe::new(
            Pos2::new(bg_start.x / 2.0, bg_start.y / 2.0 - BODY_RAISE),
            Pos2::new(
                bg_end.x / 2.0,
                bg_end.y - closed_top - body.y / 2.0 - travel,
            ),
        );

        let shackle_center = Keyframe::new(
            Pos2::new(
                bg_start.x / 2.0,
                body_center.start.y - shackle.y / 2.0 - body.y / 2.0 - SHACKLE_BOTTOM_MARGIN.0,
            ),
            Pos2::new(bg_end.x / 2.0, closed_top + shackle.y / 2.0 - travel),
        );

        let direction_center = Keyframe::new(
            Pos2::new(
                bg_start.x / 2.0,
                body_center.start.y + DIRECTION_TOP_MARGIN.0 + direction.y / 2.0,
            ),
            Pos2::new(
                bg_end.x / 2.0,
                body_center.end.y + DIRECTION_TOP_MARGIN.1 + direction.y / 2.0,
            ),
        );

        let x_offset = if config.variant.center_horizontally {
            (config.view_width - bg_start.x) / 2.0
        } else {
            0.0
        };

        Self {
            background_origin,
            background_size: Keyframe::new(bg_start, bg_end),
            body_center,
            shackle_center,
            direction_center,
            locked_origin: background_origin.end,
            shackle_size: shackle,
            body_size: body,
            direction_size: direction,
            locked_size: glyphs.locked(),
            x_offset,
        }
    }

    /// Size of the lock view at rest
    pub fn intrinsic_size(&self) -> Vec2 {
        self.background_size.start
    }

    /// Horizontal shift applied to every glyph
    pub fn x_offset(&self) -> f32 {
        self.x_offset
    }

    /// Glyph frames for an unlocked view at `progress`
    pub fn geometry(&self, progress: f32) -> AnimationGeometry {
        let p = clamp_progress(progress);
        let shift = Vec2::new(self.x_offset, 0.0);

        let background = Rect::from_min_size(
            self.background_origin.at(p) + shift,
            self.background_size.at(p),
        );
        let shackle = Rect::from_center_size(self.shackle_center.at(p) + shift, self.shackle_size);
        let body = Rect::from_center_size(self.body_center.at(p) + shift, self.body_size);
        let direction =
            Rect::from_center_size(self.direction_center.at(p) + shift, self.direction_size);

        let mut direction = GlyphFrame::visible(direction);
        direction.alpha = 1.0 - p;

        let mut locked =
            GlyphFrame::visible(Rect::from_min_size(self.locked_origin + shift, self.locked_size));
        locked.hidden = true;

        AnimationGeometry {
            background: GlyphFrame::visible(background),
            shackle: GlyphFrame::visible(shackle),
            body: GlyphFrame::visible(body),
            direction,
            locked,
        }
    }

    /// Glyph frames taking the latch into account
    ///
    /// Locking is a discrete swap: the four base glyphs are hidden and the
    /// closed-lock glyph is shown.
    pub fn geometry_for(&self, progress: f32, locked: bool) -> AnimationGeometry {
        if !locked {
            return self.geometry(progress);
        }

        let mut geometry = self.geometry(1.0);
        geometry.background.hidden = true;
        geometry.shackle.hidden = true;
        geometry.body.hidden = true;
        geometry.direction.hidden = true;
        geometry.locked.hidden = false;
        geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LockLayout {
        LockLayout::new(&LockConfig::default())
    }

    fn approx(a: Pos2, b: Pos2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_geometry_endpoints_match_keyframes() {
        let layout = layout();
        let shift = Vec2::new(layout.x_offset(), 0.0);

        let start = layout.geometry(0.0);
        assert!(approx(start.background.origin(), layout.background_origin.start + shift));
        assert_eq!(start.background.size(), layout.background_size.start);
        assert!(approx(start.body.center(), layout.body_center.start + shift));
        assert!(approx(start.shackle.center(), layout.shackle_center.start + shift));
        assert!(approx(start.direction.center(), layout.direction_center.start + shift));
        assert_eq!(start.direction.alpha, 1.0);

        let end = layout.geometry(1.0);
        assert!(approx(end.background.origin(), layout.background_origin.end + shift));
        assert_eq!(end.background.size(), layout.background_size.end);
        assert!(approx(end.body.center(), layout.body_center.end + shift));
        assert!(approx(end.shackle.center(), layout.shackle_center.end + shift));
        assert!(approx(end.direction.center(), layout.direction_center.end + shift));
        assert_eq!(end.direction.alpha, 0.0);
    }

    #[test]
    fn test_geometry_stays_on_keyframe_line() {
        let layout = layout();
        let start = layout.geometry(0.0);
        let end = layout.geometry(1.0);

        for step in 0..=20 {
            let p = step as f32 / 20.0;
            let g = layout.geometry(p);
            for (from, to, at) in [
                (start.background.origin(), end.background.origin(), g.background.origin()),
                (start.body.center(), end.body.center(), g.body.center()),
                (start.shackle.center(), end.shackle.center(), g.shackle.center()),
                (start.direction.center(), end.direction.center(), g.direction.center()),
            ] {
                assert!(approx(at, Lerp::lerp(&from, &to, p)), "off the line at progress {}", p);
            }
            assert!((g.direction.alpha - (1.0 - p)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_progress_is_clamped() {
        let layout = layout();
        assert_eq!(layout.geometry(-3.0), layout.geometry(0.0));
        assert_eq!(layout.geometry(7.5), layout.geometry(1.0));
        assert_eq!(layout.geometry(f32::NAN), layout.geometry(0.0));
    }

    #[test]
    fn test_background_travels_up_and_shrinks() {
        let layout = layout();
        assert_eq!(layout.background_origin.end, Pos2::new(0.0, -50.0));
        assert_eq!(layout.background_size.start.y, 150.0);
        assert_eq!(layout.background_size.end, Vec2::new(38.0, 86.0));
        assert_eq!(layout.intrinsic_size(), Vec2::new(38.0, 150.0));
    }

    #[test]
    fn test_locked_swaps_glyphs() {
        let layout = layout();
        let unlocked = layout.geometry_for(0.4, false);
        assert!(unlocked.locked.hidden);
        assert!(!unlocked.background.hidden);

        let locked = layout.geometry_for(0.4, true);
        assert!(!locked.locked.hidden);
        assert!(locked.background.hidden);
        assert!(locked.shackle.hidden);
        assert!(locked.body.hidden);
        assert!(locked.direction.hidden);
    }

    #[test]
    fn test_centering_offset() {
        let centered = layout();
        assert_eq!(centered.x_offset(), (150.0 - 38.0) / 2.0);

        let mut config = LockConfig::default();
        config.variant.center_horizontally = false;
        let flush = LockLayout::new(&config);
        assert_eq!(flush.x_offset(), 0.0);
        assert_eq!(flush.geometry(0.0).background.origin(), Pos2::ZERO);
    }
}
