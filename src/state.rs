//! Shared lock state
//!
//! The "is locked" flag is owned by the hosting app, not by the control:
//! the control latches it from a gesture, while a Cancel button elsewhere
//! clears it. [`LockFlag`] is a cloneable handle to that cell that publishes
//! every change to its subscribers over crossbeam channels.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Change notification from a [`LockFlag`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockEvent {
    Locked,
    Unlocked,
}

impl LockEvent {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockEvent::Locked)
    }
}

impl From<bool> for LockEvent {
    fn from(locked: bool) -> Self {
        if locked {
            LockEvent::Locked
        } else {
            LockEvent::Unlocked
        }
    }
}

/// Observable boolean cell shared between the control and its host
#[derive(Clone, Default)]
pub struct LockFlag {
    value: Arc<RwLock<bool>>,
    subscribers: Arc<Mutex<Vec<Sender<LockEvent>>>>,
}

impl std::fmt::Debug for LockFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockFlag")
            .field("locked", &self.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl LockFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        *self.value.read()
    }

    /// Set the flag, notifying subscribers only when the value changes
    ///
    /// Returns true when the value changed.
    pub fn set(&self, locked: bool) -> bool {
        {
            let mut value = self.value.write();
            if *value == locked {
                return false;
            }
            *value = locked;
        }

        let event = LockEvent::from(locked);
        debug!("[LOCK] flag -> {:?}", event);
        // Drop subscribers whose receiver has gone away
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event).is_ok());
        true
    }

    /// Receive every future change of the flag
    pub fn subscribe(&self) -> Receiver<LockEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

/// What the recorder is doing, as shown by the host app
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderState {
    /// Not recording
    #[default]
    Idle,
    /// Recording while the finger is down
    Recording,
    /// Recording hands-free after the lock latched
    Locked,
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, RecorderState::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, RecorderState::Recording | RecorderState::Locked)
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, RecorderState::Locked)
    }
}

impl std::fmt::Display for RecorderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecorderState::Idle => write!(f, "Idle"),
            RecorderState::Recording => write!(f, "Recording"),
            RecorderState::Locked => write!(f, "Locked"),
        }
    }
}
