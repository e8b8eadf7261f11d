//! Reusable UI components for the recorder screen

pub mod lock_view;
pub mod record_button;

pub use lock_view::LockView;
pub use record_button::{PressRecognizer, RecordButton, RecordButtonOutput};
