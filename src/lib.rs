//! Swipe-to-lock control for a hold-to-record voice button
//!
//! While the record button is held, sliding up latches a lock so recording
//! continues hands-free, and sliding left cancels. The crate is split into a
//! pure gesture reducer ([`gesture`]), layout keyframes ([`geometry`]),
//! frame-driven animations ([`animation`]) and the [`controller`] tying them
//! to a shared [`state::LockFlag`] and a [`render::LockRenderer`].

pub mod animation;
pub mod config;
pub mod controller;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod render;
pub mod scenario;
pub mod state;
pub mod ui;

pub use config::{LockConfig, Variant};
pub use controller::SwipeLockController;
pub use drag::DragButton;
pub use error::{Result, SwipeLockError};
pub use gesture::{GesturePhase, GestureSample, InteractionOutcome, InteractionState};
pub use render::{Glyph, GlyphCanvas, LockRenderer};
pub use state::{LockEvent, LockFlag, RecorderState};
