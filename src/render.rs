//! Rendering collaborator
//!
//! The controller never draws. It pushes frames, alphas and visibility to a
//! [`LockRenderer`], the same small imperative surface a retained view
//! hierarchy would expose. [`GlyphCanvas`] is the retained implementation
//! used by the egui front end and by tests.

use egui::{Pos2, Rect};
use serde::Deserialize;

/// The visual elements of the lock control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    Background,
    Shackle,
    Body,
    DirectionArrow,
    Locked,
    /// "Slide to cancel" hint next to the record button
    CancelHint,
    /// Record button, when it follows the finger
    DragButton,
    /// Open or closed lock above a dragged record button
    StatusIcon,
    /// Band sweeping across a pressed drag button
    Shimmer,
}

const GLYPH_COUNT: usize = 9;

impl Glyph {
    pub const ALL: [Glyph; GLYPH_COUNT] = [
        Glyph::Background,
        Glyph::Shackle,
        Glyph::Body,
        Glyph::DirectionArrow,
        Glyph::Locked,
        Glyph::CancelHint,
        Glyph::DragButton,
        Glyph::StatusIcon,
        Glyph::Shimmer,
    ];

    fn index(self) -> usize {
        match self {
            Glyph::Background => 0,
            Glyph::Shackle => 1,
            Glyph::Body => 2,
            Glyph::DirectionArrow => 3,
            Glyph::Locked => 4,
            Glyph::CancelHint => 5,
            Glyph::DragButton => 6,
            Glyph::StatusIcon => 7,
            Glyph::Shimmer => 8,
        }
    }
}

/// Imperative drawing surface driven by the controller
pub trait LockRenderer {
    fn set_frame(&mut self, glyph: Glyph, rect: Rect);
    fn set_center(&mut self, glyph: Glyph, center: Pos2);
    fn set_alpha(&mut self, glyph: Glyph, alpha: f32);
    fn set_hidden(&mut self, glyph: Glyph, hidden: bool);
    fn set_scale(&mut self, glyph: Glyph, scale: f32);
    /// Opacity of the whole lock view
    fn set_view_alpha(&mut self, alpha: f32);
    /// Closed or open artwork for [`Glyph::StatusIcon`]
    fn set_status_locked(&mut self, locked: bool);
}

/// Last known state of one glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphState {
    pub rect: Rect,
    pub alpha: f32,
    pub hidden: bool,
    pub scale: f32,
}

impl Default for GlyphState {
    fn default() -> Self {
        Self {
            rect: Rect::ZERO,
            alpha: 1.0,
            hidden: false,
            scale: 1.0,
        }
    }
}

impl GlyphState {
    /// Rect after applying the scale around its center
    pub fn scaled_rect(&self) -> Rect {
        Rect::from_center_size(self.rect.center(), self.rect.size() * self.scale)
    }

    /// Alpha after combining with the view alpha; 0 when hidden
    pub fn effective_alpha(&self, view_alpha: f32) -> f32 {
        if self.hidden {
            0.0
        } else {
            self.alpha * view_alpha
        }
    }
}

/// Retained glyph state, read back by painters and assertions
#[derive(Debug, Clone)]
pub struct GlyphCanvas {
    glyphs: [GlyphState; GLYPH_COUNT],
    view_alpha: f32,
    status_locked: bool,
    writes: u64,
}

impl Default for GlyphCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphCanvas {
    pub fn new() -> Self {
        Self {
            glyphs: [GlyphState::default(); GLYPH_COUNT],
            view_alpha: 1.0,
            status_locked: false,
            writes: 0,
        }
    }

    pub fn glyph(&self, glyph: Glyph) -> &GlyphState {
        &self.glyphs[glyph.index()]
    }

    pub fn view_alpha(&self) -> f32 {
        self.view_alpha
    }

    pub fn status_locked(&self) -> bool {
        self.status_locked
    }

    /// Number of setter calls received
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn is_visible(&self, glyph: Glyph) -> bool {
        self.glyph(glyph).effective_alpha(self.view_alpha) > 0.0
    }

    fn glyph_mut(&mut self, glyph: Glyph) -> &mut GlyphState {
        self.writes += 1;
        &mut self.glyphs[glyph.index()]
    }
}

impl LockRenderer for GlyphCanvas {
    fn set_frame(&mut self, glyph: Glyph, rect: Rect) {
        self.glyph_mut(glyph).rect = rect;
    }

    fn set_center(&mut self, glyph: Glyph, center: Pos2) {
        let state = self.glyph_mut(glyph);
        state.rect = Rect::from_center_size(center, state.rect.size());
    }

    fn set_alpha(&mut self, glyph: Glyph, alpha: f32) {
        self.glyph_mut(glyph).alpha = alpha;
    }

    fn set_hidden(&mut self, glyph: Glyph, hidden: bool) {
        self.glyph_mut(glyph).hidden = hidden;
    }

    fn set_scale(&mut self, glyph: Glyph, scale: f32) {
        self.glyph_mut(glyph).scale = scale;
    }

    fn set_view_alpha(&mut self, alpha: f32) {
        self.writes += 1;
        self.view_alpha = alpha;
    }

    fn set_status_locked(&mut self, locked: bool) {
        self.writes += 1;
        self.status_locked = locked;
    }
}
