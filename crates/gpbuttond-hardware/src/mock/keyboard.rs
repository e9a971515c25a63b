//! Mock keyboard implementation for testing and development.
//!
//! Records every key press and release with its timestamp so tests can check
//! what was typed, when, and that the two halves of a keystroke were never
//! interleaved with another keystroke.

use crate::{HardwareError, Result, traits::KeyboardDevice, types::DeviceInfo};
use gpbuttond_core::KeyCode;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::Instant;

/// Half of a keystroke as seen by the virtual device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Key went down.
    Press,
    /// Key went up.
    Release,
}

/// One recorded key action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRecord {
    /// Key involved.
    pub key: KeyCode,
    /// Press or release.
    pub action: KeyAction,
    /// When it was written.
    pub at: Instant,
}

/// A complete press+release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    /// Key typed.
    pub key: KeyCode,
    /// When the press half was written.
    pub at: Instant,
}

#[derive(Debug, Default)]
struct Recorder {
    records: Vec<KeyRecord>,
    pending_failures: usize,
}

/// Mock keyboard device.
///
/// # Examples
///
/// ```
/// use gpbuttond_core::KeyCode;
/// use gpbuttond_hardware::mock::MockKeyboard;
/// use gpbuttond_hardware::traits::KeyboardDevice;
///
/// #[tokio::main]
/// async fn main() -> gpbuttond_hardware::Result<()> {
///     let (mut keyboard, handle) = MockKeyboard::new();
///
///     keyboard.emit(KeyCode::new(103).unwrap()).await?;
///
///     assert_eq!(handle.keys(), vec![KeyCode::new(103).unwrap()]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeyboard {
    /// Shared record of everything typed
    recorder: Arc<Mutex<Recorder>>,

    /// Device name
    name: String,
}

impl MockKeyboard {
    /// Create a new mock keyboard with the default name.
    pub fn new() -> (Self, MockKeyboardHandle) {
        Self::with_name("Mock Keyboard".to_string())
    }

    /// Create a new mock keyboard with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeyboardHandle) {
        let recorder = Arc::new(Mutex::new(Recorder::default()));

        let keyboard = Self {
            recorder: Arc::clone(&recorder),
            name,
        };

        (keyboard, MockKeyboardHandle { recorder })
    }

    fn record(&self, key: KeyCode, action: KeyAction) {
        lock(&self.recorder).records.push(KeyRecord {
            key,
            action,
            at: Instant::now(),
        });
    }
}

impl Default for MockKeyboard {
    fn default() -> Self {
        Self::new().0
    }
}

impl KeyboardDevice for MockKeyboard {
    async fn emit(&mut self, key: KeyCode) -> Result<()> {
        {
            let mut recorder = lock(&self.recorder);
            if recorder.pending_failures > 0 {
                recorder.pending_failures -= 1;
                return Err(HardwareError::emit_failed(key, "injected failure"));
            }
        }

        self.record(key, KeyAction::Press);
        // Give other tasks a chance to run between the two halves, so a
        // missing lock in the caller shows up as interleaved records.
        tokio::task::yield_now().await;
        self.record(key, KeyAction::Release);

        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Keyboard v1.0"))
    }
}

/// Handle for inspecting a mock keyboard.
///
/// Can be cloned and kept after the keyboard has been moved into the engine.
#[derive(Debug, Clone)]
pub struct MockKeyboardHandle {
    recorder: Arc<Mutex<Recorder>>,
}

impl MockKeyboardHandle {
    /// Every press and release recorded so far.
    pub fn records(&self) -> Vec<KeyRecord> {
        lock(&self.recorder).records.clone()
    }

    /// Completed keystrokes, in the order they were typed.
    pub fn keystrokes(&self) -> Vec<Keystroke> {
        lock(&self.recorder)
            .records
            .iter()
            .filter(|record| record.action == KeyAction::Press)
            .map(|record| Keystroke {
                key: record.key,
                at: record.at,
            })
            .collect()
    }

    /// Keys typed, in order.
    pub fn keys(&self) -> Vec<KeyCode> {
        self.keystrokes().into_iter().map(|stroke| stroke.key).collect()
    }

    /// Keystrokes of a single key.
    pub fn keystrokes_of(&self, key: KeyCode) -> Vec<Keystroke> {
        self.keystrokes()
            .into_iter()
            .filter(|stroke| stroke.key == key)
            .collect()
    }

    /// Number of completed keystrokes.
    pub fn count(&self) -> usize {
        self.keystrokes().len()
    }

    /// Make the next `n` emissions fail without recording anything.
    pub fn fail_next(&self, n: usize) {
        lock(&self.recorder).pending_failures = n;
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        lock(&self.recorder).records.clear();
    }

    /// Whether every press is immediately followed by the release of the
    /// same key.
    pub fn is_serialized(&self) -> bool {
        lock(&self.recorder).records.chunks(2).all(|pair| {
            matches!(
                pair,
                [press, release]
                    if press.action == KeyAction::Press
                        && release.action == KeyAction::Release
                        && press.key == release.key
            )
        })
    }
}

fn lock(recorder: &Mutex<Recorder>) -> MutexGuard<'_, Recorder> {
    // A panicking test thread must not hide the records from the others.
    recorder.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
