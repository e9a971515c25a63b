//! Press engine for gpbuttond.
//!
//! Turns debounced button edges into keystrokes. Each bound line gets a
//! [`LineDispatcher`] that starts a worker on button-down and cancels it on
//! button-up. Workers either repeat the primary key while the button is held,
//! or (when the binding has a long keycode) decide between a tap and a long
//! press. Every keystroke goes through one [`SharedKeyboard`], so keystrokes
//! from different lines never interleave.
//!
//! Each press has its own cancellation channel ([`session::CancelSignal`]),
//! so releasing one button can only ever stop the worker of that button.
//!
//! [`LineDispatcher`]: dispatcher::LineDispatcher
//! [`SharedKeyboard`]: keyboard::SharedKeyboard

pub mod daemon;
pub mod dispatcher;
pub mod error;
pub mod keyboard;
pub mod session;
pub mod worker;

pub use daemon::{ButtonDaemon, DaemonHandle, LineExit};
pub use dispatcher::{LineDispatcher, Transition};
pub use error::{EngineError, Result};
pub use keyboard::SharedKeyboard;
pub use session::{CancelSignal, Cancellation, PressSession};
pub use worker::PressOutcome;
