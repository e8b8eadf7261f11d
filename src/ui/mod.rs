//! egui/eframe front end hosting the swipe-lock control

mod app;
pub mod components;
mod theme;

pub use app::SwipeLockApp;
pub use components::{LockView, PressRecognizer, RecordButton};
pub use theme::Theme;
