//! Mock device implementations for testing and development.
//!
//! This module provides simulated devices that can be controlled
//! programmatically without GPIO lines or `/dev/uinput`.

pub mod edges;
pub mod keyboard;

// Re-export commonly used types
pub use edges::{MockEdgeHandle, MockEdgeSource};
pub use keyboard::{KeyAction, KeyRecord, Keystroke, MockKeyboard, MockKeyboardHandle};
